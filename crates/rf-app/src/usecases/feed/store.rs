//! Feed view state owned by one [`FeedSession`](super::FeedSession).
//!
//! The lock is never held across an `.await` on a port.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use rf_core::error::ClassifiedError;
use rf_core::feed::{ActivationState, LikeSnapshot, Video};
use rf_core::ids::VideoId;
use rf_core::persistence::{UserPreferences, VideoState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub videos: Vec<Video>,
    /// Bumped every time `videos` is replaced.
    pub generation: u64,
    pub activation: ActivationState,
    /// Current index, liked set and watch history (the persisted part).
    pub video_state: VideoState,
    pub preferences: UserPreferences,
    pub is_loading: bool,
    pub error: Option<ClassifiedError>,
    pub media_errors: HashMap<VideoId, ClassifiedError>,
    pub pending_likes: HashSet<VideoId>,
    pub manual_reload_attempts: u32,
    pub detached: bool,
}

impl FeedState {
    pub fn index_of(&self, id: &VideoId) -> Option<usize> {
        self.videos.iter().position(|video| &video.id == id)
    }

    pub fn video_id_at(&self, index: usize) -> Option<&VideoId> {
        self.videos.get(index).map(|video| &video.id)
    }

    pub fn active_video(&self) -> Option<&Video> {
        self.activation
            .active_index
            .and_then(|index| self.videos.get(index))
    }

    pub fn is_liked(&self, id: &VideoId) -> bool {
        self.video_state.is_liked(id)
    }

    pub fn like_snapshot(&self, id: &VideoId) -> Option<LikeSnapshot> {
        let index = self.index_of(id)?;
        Some(LikeSnapshot::new(
            self.is_liked(id),
            self.videos[index].stats.likes,
        ))
    }

    /// Write `snapshot` back into the liked set and the video's like count.
    pub fn set_like_snapshot(&mut self, id: &VideoId, snapshot: LikeSnapshot) {
        self.video_state.set_liked(id, snapshot.liked);
        if let Some(index) = self.index_of(id) {
            self.videos[index].stats.likes = snapshot.like_count;
        }
    }
}

#[derive(Debug, Default)]
pub struct FeedStore {
    state: Mutex<FeedState>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> FeedState {
        self.state.lock().await.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&FeedState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut FeedState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    pub async fn is_detached(&self) -> bool {
        self.state.lock().await.detached
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rf_core::feed::{Creator, VideoStats};

    use super::*;

    fn video(id: &str, likes: u64) -> Video {
        Video {
            id: VideoId::from(id),
            url: format!("https://cdn.example.com/{id}.mp4"),
            thumbnail_url: String::new(),
            title: id.to_string(),
            description: String::new(),
            creator: Creator {
                username: "creator".into(),
                avatar_url: String::new(),
                verified: false,
            },
            stats: VideoStats {
                likes,
                ..VideoStats::default()
            },
            music: None,
            duration_secs: 15,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn like_snapshot_round_trips_through_state() {
        let store = FeedStore::new();
        let id = VideoId::from("v1");
        store
            .update(|state| state.videos = vec![video("v1", 10)])
            .await;

        let before = store.read(|state| state.like_snapshot(&id)).await;
        assert_eq!(before, Some(LikeSnapshot::new(false, 10)));

        store
            .update(|state| state.set_like_snapshot(&id, LikeSnapshot::new(true, 11)))
            .await;

        let state = store.snapshot().await;
        assert!(state.is_liked(&id));
        assert_eq!(state.videos[0].stats.likes, 11);
    }

    #[tokio::test]
    async fn unknown_video_has_no_snapshot() {
        let store = FeedStore::new();
        assert_eq!(
            store
                .read(|state| state.like_snapshot(&VideoId::from("missing")))
                .await,
            None
        );
    }
}
