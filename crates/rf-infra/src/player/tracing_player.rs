//! Stand-in media player: logs and records commands, decodes nothing.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use rf_core::error::RawError;
use rf_core::ids::VideoId;
use rf_core::ports::MediaPlayerPort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCall {
    Play(VideoId),
    Pause(VideoId),
}

/// Commands kept for [`TracingPlayer::calls`]; older ones are dropped.
pub const DEFAULT_CALL_HISTORY: usize = 100;

pub struct TracingPlayer {
    capacity: usize,
    calls: Mutex<VecDeque<PlayerCall>>,
    // Items whose next `play` fails with the given error.
    broken: Mutex<HashMap<VideoId, RawError>>,
}

impl Default for TracingPlayer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CALL_HISTORY)
    }
}

impl TracingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            calls: Mutex::new(VecDeque::with_capacity(capacity)),
            broken: Mutex::new(HashMap::new()),
        }
    }

    /// The most recent commands, oldest first.
    pub async fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().await.iter().cloned().collect()
    }

    async fn record(&self, call: PlayerCall) {
        let mut calls = self.calls.lock().await;
        calls.push_back(call);
        while calls.len() > self.capacity {
            calls.pop_front();
        }
    }

    /// Make the next `play(id)` fail with `error`.
    pub async fn fail_next_play(&self, id: VideoId, error: RawError) {
        self.broken.lock().await.insert(id, error);
    }
}

#[async_trait]
impl MediaPlayerPort for TracingPlayer {
    async fn play(&self, id: &VideoId) -> Result<(), RawError> {
        self.record(PlayerCall::Play(id.clone())).await;
        if let Some(err) = self.broken.lock().await.remove(id) {
            return Err(err);
        }
        info!(video_id = %id, "play");
        Ok(())
    }

    async fn pause(&self, id: &VideoId) -> Result<(), RawError> {
        self.record(PlayerCall::Pause(id.clone())).await;
        info!(video_id = %id, "pause");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_history_keeps_only_the_newest_commands() {
        let player = TracingPlayer::with_capacity(3);

        for n in 0..10 {
            player.play(&VideoId::from(format!("v{n}"))).await.unwrap();
        }
        player.pause(&VideoId::from("v9")).await.unwrap();

        assert_eq!(
            player.calls().await,
            vec![
                PlayerCall::Play(VideoId::from("v8")),
                PlayerCall::Play(VideoId::from("v9")),
                PlayerCall::Pause(VideoId::from("v9")),
            ]
        );
    }

    #[tokio::test]
    async fn scripted_failure_applies_to_one_play_only() {
        let player = TracingPlayer::new();
        let id = VideoId::from("v1");
        player
            .fail_next_play(id.clone(), RawError::new("decoder missing"))
            .await;

        assert!(player.play(&id).await.is_err());
        assert!(player.play(&id).await.is_ok());
        assert_eq!(player.calls().await.len(), 2);
    }
}
