use async_trait::async_trait;

use crate::error::RawError;
use crate::ids::VideoId;

/// Entity-mutation backend for likes and shares.
///
/// `Ok(false)` means the backend refused the mutation (unknown entity,
/// nothing to unlike).
#[async_trait]
pub trait EngagementPort: Send + Sync {
    async fn like(&self, id: &VideoId) -> Result<bool, RawError>;
    async fn unlike(&self, id: &VideoId) -> Result<bool, RawError>;
    async fn share(&self, id: &VideoId) -> Result<bool, RawError>;
}
