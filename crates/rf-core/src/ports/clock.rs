use std::time::Duration;

use async_trait::async_trait;

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Suspends the caller between retry attempts.
#[async_trait]
pub trait SleeperPort: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
