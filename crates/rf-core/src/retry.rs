//! Bounded retry with linear backoff.
//!
//! The decision logic lives here as pure functions over a [`MutationAttempt`]
//! record; the async loop that sleeps and re-invokes the operation lives in the
//! application layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RawError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryPolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// How many times to try and how long to wait between tries.
///
/// The delay before attempt `k + 1` is `base_delay_ms * k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryPolicy {
    /// Sign in / sign up.
    pub const AUTH: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        base_delay_ms: 1000,
    };

    pub const SIGN_OUT: RetryPolicy = RetryPolicy {
        max_attempts: 2,
        base_delay_ms: 500,
    };

    /// Like / unlike / share.
    pub const ENGAGEMENT: RetryPolicy = RetryPolicy {
        max_attempts: 2,
        base_delay_ms: 500,
    };

    /// Feed loading.
    pub const CATALOG: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        base_delay_ms: 1000,
    };

    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Result<Self, RetryPolicyError> {
        if max_attempts == 0 {
            return Err(RetryPolicyError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            base_delay_ms,
        })
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    /// Delay to wait after `attempts_made` failed attempts.
    pub fn delay_after(&self, attempts_made: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempts_made)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::ENGAGEMENT
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

/// Per-invocation attempt record. Never shared between calls.
#[derive(Debug, Clone)]
pub struct MutationAttempt {
    policy: RetryPolicy,
    attempts_made: u32,
    last_error: Option<RawError>,
}

impl MutationAttempt {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts_made: 0,
            last_error: None,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn last_error(&self) -> Option<&RawError> {
        self.last_error.as_ref()
    }

    pub fn into_last_error(self) -> Option<RawError> {
        self.last_error
    }

    pub fn has_attempts_remaining(&self) -> bool {
        self.attempts_made < self.policy.max_attempts
    }

    /// Record a failed attempt.
    pub fn record_failure(&mut self, error: RawError) {
        self.attempts_made = self.attempts_made.saturating_add(1);
        self.last_error = Some(error);
    }

    /// Decide whether to retry after the most recent failure.
    ///
    /// Retries when attempts remain and the failure is recoverable, or when
    /// connectivity could not be confirmed. `connectivity_confirmed` is only
    /// consulted for non-recoverable failures.
    pub fn decide(
        &self,
        recoverable: bool,
        connectivity_confirmed: impl FnOnce() -> bool,
    ) -> RetryDecision {
        if !self.has_attempts_remaining() {
            return RetryDecision::GiveUp;
        }
        if recoverable || !connectivity_confirmed() {
            return RetryDecision::RetryAfter(self.policy.delay_after(self.attempts_made));
        }
        RetryDecision::GiveUp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_is_rejected() {
        assert_eq!(RetryPolicy::new(0, 100), Err(RetryPolicyError::ZeroAttempts));
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::new(4, 250).unwrap();
        assert_eq!(policy.delay_after(1), Duration::from_millis(250));
        assert_eq!(policy.delay_after(2), Duration::from_millis(500));
        assert_eq!(policy.delay_after(3), Duration::from_millis(750));
    }

    #[test]
    fn recoverable_failure_retries_until_exhausted() {
        let mut attempt = MutationAttempt::new(RetryPolicy::new(2, 500).unwrap());

        attempt.record_failure(RawError::new("first"));
        assert_eq!(
            attempt.decide(true, || panic!("connectivity must not be probed")),
            RetryDecision::RetryAfter(Duration::from_millis(500))
        );

        attempt.record_failure(RawError::new("second"));
        assert_eq!(attempt.decide(true, || true), RetryDecision::GiveUp);
        assert_eq!(attempt.last_error().map(|e| e.message.as_str()), Some("second"));
    }

    #[test]
    fn terminal_failure_gives_up_when_online() {
        let mut attempt = MutationAttempt::new(RetryPolicy::AUTH);
        attempt.record_failure(RawError::new("disabled"));
        assert_eq!(attempt.decide(false, || true), RetryDecision::GiveUp);
    }

    #[test]
    fn terminal_failure_retries_when_connectivity_unconfirmed() {
        let mut attempt = MutationAttempt::new(RetryPolicy::AUTH);
        attempt.record_failure(RawError::new("weird"));
        assert_eq!(
            attempt.decide(false, || false),
            RetryDecision::RetryAfter(Duration::from_millis(1000))
        );
    }

    #[test]
    fn single_attempt_policy_never_retries() {
        let mut attempt = MutationAttempt::new(RetryPolicy::no_retry());
        attempt.record_failure(RawError::new("x"));
        assert_eq!(attempt.decide(true, || false), RetryDecision::GiveUp);
    }
}
