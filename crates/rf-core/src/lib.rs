//! # rf-core
//!
//! Core domain models and policies for ReelFeed.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the viewport activation policy, the retry policy and error classification used by
//! resilient mutations, and the port traits implemented by the outer layers.

// Public module exports
pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod ids;
pub mod lifecycle;
pub mod optimistic;
pub mod persistence;
pub mod ports;
pub mod retry;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use error::{classify, ClassifiedError, ErrorCategory, ErrorOrigin, RawError};
pub use feed::{ActivationPolicy, ActivationState, Video, ViewportConfig, ViewportEvent};
pub use ids::{UserId, VideoId};
pub use optimistic::OptimisticEdit;
pub use retry::{MutationAttempt, RetryDecision, RetryPolicy};
