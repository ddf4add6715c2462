//! ReelFeed Application Orchestration Layer
//!
//! Use cases that drive the feed and the auth session over the ports
//! defined in `rf-core`.

pub mod deps;
pub mod usecases;

pub use deps::AppDeps;
pub use usecases::auth::{AuthSession, AuthState};
pub use usecases::feed::{FeedSession, FeedSessionConfig, FeedState};
pub use usecases::lifecycle::AppLifecycle;
pub use usecases::resilient_executor::{MutationFailure, ResilientExecutor};
