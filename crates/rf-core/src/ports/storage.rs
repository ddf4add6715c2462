use async_trait::async_trait;

use crate::error::RawError;

/// Device key-value store.
///
/// Failures are classified as `storage` and never retried.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RawError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), RawError>;
    async fn remove(&self, key: &str) -> Result<(), RawError>;
}
