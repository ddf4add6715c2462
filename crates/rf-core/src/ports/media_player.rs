use async_trait::async_trait;

use crate::error::RawError;
use crate::ids::VideoId;

/// Opaque playback capability. Decoding and buffering are its own business.
#[async_trait]
pub trait MediaPlayerPort: Send + Sync {
    async fn play(&self, id: &VideoId) -> Result<(), RawError>;
    async fn pause(&self, id: &VideoId) -> Result<(), RawError>;
}
