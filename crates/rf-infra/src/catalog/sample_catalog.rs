//! In-memory catalog that also plays the engagement backend.
//! 内存视频目录，同时充当点赞/分享后端。

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use rf_core::error::RawError;
use rf_core::feed::Video;
use rf_core::ids::VideoId;
use rf_core::ports::{EngagementPort, VideoCatalogPort};

use super::sample_data::sample_videos;

pub struct SampleCatalog {
    videos: RwLock<Vec<Video>>,
    latency: Duration,
    // Failures handed out (front first) before calls start succeeding.
    scripted_failures: Mutex<VecDeque<RawError>>,
}

impl SampleCatalog {
    pub fn new(videos: Vec<Video>) -> Self {
        Self {
            videos: RwLock::new(videos),
            latency: Duration::ZERO,
            scripted_failures: Mutex::new(VecDeque::new()),
        }
    }

    /// The built-in demo feed.
    pub fn with_sample_videos() -> Self {
        Self::new(sample_videos())
    }

    /// Simulated round-trip time for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next calls fail with `errors`, in order.
    pub async fn fail_next(&self, errors: impl IntoIterator<Item = RawError>) {
        self.scripted_failures.lock().await.extend(errors);
    }

    pub async fn video(&self, id: &VideoId) -> Option<Video> {
        self.videos
            .read()
            .await
            .iter()
            .find(|video| &video.id == id)
            .cloned()
    }

    async fn round_trip(&self) -> Result<(), RawError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.scripted_failures.lock().await.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn mutate(&self, id: &VideoId, f: impl FnOnce(&mut Video) -> bool) -> bool {
        let mut videos = self.videos.write().await;
        match videos.iter_mut().find(|video| &video.id == id) {
            Some(video) => f(video),
            None => false,
        }
    }
}

#[async_trait]
impl VideoCatalogPort for SampleCatalog {
    async fn fetch_videos(&self) -> Result<Vec<Video>, RawError> {
        self.round_trip().await?;
        Ok(self.videos.read().await.clone())
    }
}

#[async_trait]
impl EngagementPort for SampleCatalog {
    async fn like(&self, id: &VideoId) -> Result<bool, RawError> {
        self.round_trip().await?;
        let ok = self
            .mutate(id, |video| {
                video.stats.likes += 1;
                true
            })
            .await;
        debug!(video_id = %id, ok, "like");
        Ok(ok)
    }

    async fn unlike(&self, id: &VideoId) -> Result<bool, RawError> {
        self.round_trip().await?;
        let ok = self
            .mutate(id, |video| {
                if video.stats.likes == 0 {
                    return false;
                }
                video.stats.likes -= 1;
                true
            })
            .await;
        debug!(video_id = %id, ok, "unlike");
        Ok(ok)
    }

    async fn share(&self, id: &VideoId) -> Result<bool, RawError> {
        self.round_trip().await?;
        let ok = self
            .mutate(id, |video| {
                video.stats.shares += 1;
                true
            })
            .await;
        debug!(video_id = %id, ok, "share");
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn like_and_unlike_move_the_count() {
        let catalog = SampleCatalog::with_sample_videos();
        let id = VideoId::from("1");
        let before = catalog.video(&id).await.unwrap().stats.likes;

        assert!(catalog.like(&id).await.unwrap());
        assert_eq!(catalog.video(&id).await.unwrap().stats.likes, before + 1);

        assert!(catalog.unlike(&id).await.unwrap());
        assert_eq!(catalog.video(&id).await.unwrap().stats.likes, before);
    }

    #[tokio::test]
    async fn unknown_video_is_refused() {
        let catalog = SampleCatalog::with_sample_videos();
        assert!(!catalog.like(&VideoId::from("nope")).await.unwrap());
        assert!(!catalog.share(&VideoId::from("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn unlike_at_zero_is_refused() {
        let mut videos = sample_videos();
        videos.truncate(1);
        videos[0].stats.likes = 0;
        let catalog = SampleCatalog::new(videos);

        assert!(!catalog.unlike(&VideoId::from("1")).await.unwrap());
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let catalog = SampleCatalog::with_sample_videos();
        catalog
            .fail_next([RawError::new("first"), RawError::new("second")])
            .await;

        assert_eq!(catalog.fetch_videos().await.unwrap_err().message, "first");
        assert_eq!(catalog.fetch_videos().await.unwrap_err().message, "second");
        assert_eq!(catalog.fetch_videos().await.unwrap().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated_on_the_tokio_clock() {
        let catalog = SampleCatalog::with_sample_videos().with_latency(Duration::from_millis(300));
        let start = tokio::time::Instant::now();
        catalog.fetch_videos().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
