//! Business logic use cases
//! 业务用例
//!
//! ```text
//! list host ──ViewportInput──▶ ApplyViewability ──pause/play──▶ MediaPlayerPort
//!                                    │
//!                                    └──▶ PersistFeedState ──▶ KeyValueStorePort
//! tap like ──▶ ToggleLike ──▶ ResilientExecutor ──▶ EngagementPort
//! ```

pub mod auth;
pub mod feed;
pub mod internal;
pub mod lifecycle;
pub mod resilient_executor;

pub use resilient_executor::{MutationFailure, ResilientExecutor};
