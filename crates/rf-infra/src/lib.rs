//! Adapters implementing the `rf-core` ports.

pub mod auth;
pub mod catalog;
pub mod network;
pub mod player;
pub mod reporting;
pub mod storage;
pub mod time;

pub use auth::InMemoryAuth;
pub use catalog::SampleCatalog;
pub use network::{HttpConnectivity, StaticConnectivity};
pub use player::{PlayerCall, TracingPlayer};
pub use reporting::InMemoryErrorReporter;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use time::{SystemClock, TokioSleeper};
