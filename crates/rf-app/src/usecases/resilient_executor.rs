//! Generic retry-with-backoff around fallible async operations.
//! 带线性退避的通用重试执行器。
//!
//! Each [`ResilientExecutor::execute`] call owns its own
//! [`MutationAttempt`]; nothing is shared between calls, so concurrent
//! mutations on different entities never share backoff state.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use rf_core::error::{classify, ClassifiedError, ErrorOrigin, RawError};
use rf_core::ports::{ConnectivityPort, SleeperPort};
use rf_core::retry::{MutationAttempt, RetryDecision, RetryPolicy};

/// Terminal outcome of [`ResilientExecutor::execute`].
///
/// `raw` is the final attempt's error, unchanged; `classified` is what callers
/// surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{classified} (after {attempts_made} attempt(s))")]
pub struct MutationFailure {
    pub raw: RawError,
    pub classified: ClassifiedError,
    pub attempts_made: u32,
}

impl MutationFailure {
    pub fn into_classified(self) -> ClassifiedError {
        self.classified
    }
}

pub struct ResilientExecutor {
    connectivity: Arc<dyn ConnectivityPort>,
    sleeper: Arc<dyn SleeperPort>,
}

impl ResilientExecutor {
    pub fn new(connectivity: Arc<dyn ConnectivityPort>, sleeper: Arc<dyn SleeperPort>) -> Self {
        Self {
            connectivity,
            sleeper,
        }
    }

    /// Run `operation` up to `policy.max_attempts()` times.
    ///
    /// After a failure the error is classified with `origin`. A retry happens
    /// when attempts remain and the failure is recoverable, or when it is
    /// terminal but connectivity cannot be confirmed. The wait before attempt
    /// `k + 1` is `base_delay_ms * k`.
    pub async fn execute<T, F, Fut>(
        &self,
        operation_name: &str,
        policy: RetryPolicy,
        origin: ErrorOrigin,
        mut operation: F,
    ) -> Result<T, MutationFailure>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, RawError>> + Send,
        T: Send,
    {
        let span = info_span!(
            "usecase.resilient_execute",
            operation = operation_name,
            max_attempts = policy.max_attempts()
        );

        async move {
            let mut attempt = MutationAttempt::new(policy);

            loop {
                let raw = match operation().await {
                    Ok(value) => {
                        if attempt.attempts_made() > 0 {
                            info!(
                                attempt = attempt.attempts_made() + 1,
                                "operation succeeded after retry"
                            );
                        }
                        return Ok(value);
                    }
                    Err(raw) => raw,
                };

                let classified = classify(&raw, origin);
                attempt.record_failure(raw);

                // Only probe when the answer can change the decision.
                let connected = if classified.recoverable || !attempt.has_attempts_remaining() {
                    true
                } else {
                    self.connectivity.is_connected().await
                };

                match attempt.decide(classified.recoverable, || connected) {
                    RetryDecision::RetryAfter(delay) => {
                        warn!(
                            attempt = attempt.attempts_made(),
                            delay_ms = delay.as_millis() as u64,
                            category = %classified.category,
                            code = %classified.code,
                            "operation failed, retrying"
                        );
                        self.sleeper.sleep(delay).await;
                    }
                    RetryDecision::GiveUp => {
                        let attempts_made = attempt.attempts_made();
                        debug!(
                            attempts_made,
                            category = %classified.category,
                            "giving up"
                        );
                        let raw = attempt
                            .into_last_error()
                            .unwrap_or_else(|| RawError::new(classified.message.clone()));
                        return Err(MutationFailure {
                            raw,
                            classified,
                            attempts_made,
                        });
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use mockall::mock;
    use rf_core::error::ErrorCategory;

    use super::*;

    mock! {
        pub Connectivity {}

        #[async_trait]
        impl ConnectivityPort for Connectivity {
            async fn is_connected(&self) -> bool;
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl SleeperPort for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().expect("delays lock").push(duration);
        }
    }

    fn executor(
        connectivity: MockConnectivity,
    ) -> (ResilientExecutor, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        (
            ResilientExecutor::new(Arc::new(connectivity), sleeper.clone()),
            sleeper,
        )
    }

    fn network_error() -> RawError {
        RawError::with_code("NETWORK_REQUEST_FAILED", "Network request failed")
    }

    #[tokio::test]
    async fn retries_recoverable_failures_with_linear_backoff() {
        let mut connectivity = MockConnectivity::new();
        connectivity.expect_is_connected().never();
        let (executor, sleeper) = executor(connectivity);
        let calls = AtomicU32::new(0);

        let result = executor
            .execute(
                "like",
                RetryPolicy::new(3, 200).unwrap(),
                ErrorOrigin::Engagement,
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n < 2 {
                            Err(network_error())
                        } else {
                            Ok("done")
                        }
                    }
                },
            )
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_millis(200), Duration::from_millis(400)]
        );
    }

    #[tokio::test]
    async fn exhausting_attempts_returns_last_error() {
        let mut connectivity = MockConnectivity::new();
        connectivity.expect_is_connected().never();
        let (executor, sleeper) = executor(connectivity);
        let calls = AtomicU32::new(0);

        let failure = executor
            .execute::<(), _, _>(
                "like",
                RetryPolicy::new(2, 100).unwrap(),
                ErrorOrigin::Engagement,
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err(RawError::new(format!("boom {n}"))) }
                },
            )
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(failure.attempts_made, 2);
        assert_eq!(failure.raw.message, "boom 1");
        assert_eq!(failure.classified.category, ErrorCategory::Unknown);
        assert_eq!(sleeper.delays.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn terminal_failure_stops_immediately_when_online() {
        let mut connectivity = MockConnectivity::new();
        connectivity.expect_is_connected().times(1).return_const(true);
        let (executor, sleeper) = executor(connectivity);
        let calls = AtomicU32::new(0);

        let failure = executor
            .execute::<(), _, _>("sign_in", RetryPolicy::AUTH, ErrorOrigin::Auth, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RawError::with_code("auth/user-disabled", "disabled")) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(failure.classified.category, ErrorCategory::Auth);
        assert!(!failure.classified.recoverable);
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn terminal_failure_retries_while_offline() {
        let mut connectivity = MockConnectivity::new();
        connectivity.expect_is_connected().return_const(false);
        let (executor, sleeper) = executor(connectivity);
        let calls = AtomicU32::new(0);

        let failure = executor
            .execute::<(), _, _>("sign_in", RetryPolicy::AUTH, ErrorOrigin::Auth, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(RawError::with_code("auth/user-disabled", "disabled")) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(failure.attempts_made, 3);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }
}
