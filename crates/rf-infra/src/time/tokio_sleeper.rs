use std::time::Duration;

use async_trait::async_trait;
use rf_core::ports::SleeperPort;

/// Real backoff waits on the tokio timer.
///
/// Under `tokio::time::pause()` the waits auto-advance, so tests stay fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl SleeperPort for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
