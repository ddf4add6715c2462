use async_trait::async_trait;

#[async_trait]
pub trait ConnectivityPort: Send + Sync {
    /// `true` only when connectivity could be positively confirmed.
    async fn is_connected(&self) -> bool;
}
