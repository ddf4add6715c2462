use async_trait::async_trait;

use crate::error::RawError;
use crate::feed::Video;

#[async_trait]
pub trait VideoCatalogPort: Send + Sync {
    /// The full feed, in display order.
    async fn fetch_videos(&self) -> Result<Vec<Video>, RawError>;
}
