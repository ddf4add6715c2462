//! Snapshot of client state checkpointed to the device key-value store.
//!
//! 持久化快照：当前索引、点赞集合、观看历史与用户偏好。

use serde::{Deserialize, Serialize};

use crate::ids::VideoId;

/// Key the snapshot is stored under.
pub const APP_STATE_KEY: &str = "@reelfeed:app_state";

pub const WATCH_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoState {
    pub current_index: usize,
    pub liked_videos: Vec<VideoId>,
    /// Most recent first.
    pub watch_history: Vec<VideoId>,
}

impl VideoState {
    /// Move `id` to the front of the watch history, dropping entries past the cap.
    pub fn record_watch(&mut self, id: &VideoId) {
        self.watch_history.retain(|existing| existing != id);
        self.watch_history.insert(0, id.clone());
        self.watch_history.truncate(WATCH_HISTORY_LIMIT);
    }

    pub fn set_liked(&mut self, id: &VideoId, liked: bool) {
        if liked {
            if !self.liked_videos.contains(id) {
                self.liked_videos.push(id.clone());
            }
        } else {
            self.liked_videos.retain(|existing| existing != id);
        }
    }

    pub fn is_liked(&self, id: &VideoId) -> bool {
        self.liked_videos.contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataUsageMode {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub autoplay: bool,
    pub sound_enabled: bool,
    pub data_usage_mode: DataUsageMode,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            autoplay: true,
            sound_enabled: true,
            data_usage_mode: DataUsageMode::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSnapshot {
    pub video_state: VideoState,
    pub user_preferences: UserPreferences,
    pub last_active_time_ms: i64,
}

impl AppSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_history_is_mru_deduplicated_and_capped() {
        let mut state = VideoState::default();
        for i in 0..120 {
            state.record_watch(&VideoId::from(format!("v{i}")));
        }
        state.record_watch(&VideoId::from("v50"));

        assert_eq!(state.watch_history.len(), WATCH_HISTORY_LIMIT);
        assert_eq!(state.watch_history[0], VideoId::from("v50"));
        assert_eq!(state.watch_history[1], VideoId::from("v119"));
        assert_eq!(
            state
                .watch_history
                .iter()
                .filter(|id| id.as_str() == "v50")
                .count(),
            1
        );
    }

    #[test]
    fn liked_set_has_no_duplicates() {
        let mut state = VideoState::default();
        let id = VideoId::from("v1");
        state.set_liked(&id, true);
        state.set_liked(&id, true);
        assert_eq!(state.liked_videos.len(), 1);

        state.set_liked(&id, false);
        assert!(!state.is_liked(&id));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let snapshot = AppSnapshot::from_json(r#"{"video_state":{"current_index":4}}"#).unwrap();
        assert_eq!(snapshot.video_state.current_index, 4);
        assert!(snapshot.user_preferences.autoplay);
        assert_eq!(
            snapshot.user_preferences.data_usage_mode,
            DataUsageMode::Normal
        );
    }
}
