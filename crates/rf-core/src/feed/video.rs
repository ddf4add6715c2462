use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::VideoId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub username: String,
    pub avatar_url: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoStats {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    #[serde(default)]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicInfo {
    pub title: String,
    pub artist: String,
}

/// One item of the vertically paging feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub creator: Creator,
    pub stats: VideoStats,
    #[serde(default)]
    pub music: Option<MusicInfo>,
    pub duration_secs: u32,
    pub created_at: DateTime<Utc>,
}
