//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `rf-app` and the
//! adapters in `rf-infra`. Every collaborator the client talks to (auth
//! provider, engagement backend, video catalog, media player, device
//! key-value store, connectivity probe, error reporter, clock) sits behind
//! one of these traits and is injected as `Arc<dyn Port>`.
//!
//! Fallible ports return [`RawError`](crate::error::RawError); callers
//! classify it with the matching [`ErrorOrigin`](crate::error::ErrorOrigin).

mod auth;
mod catalog;
mod clock;
mod connectivity;
mod engagement;
mod error_reporter;
mod media_player;
mod storage;

pub use auth::AuthPort;
pub use catalog::VideoCatalogPort;
pub use clock::{ClockPort, SleeperPort};
pub use connectivity::ConnectivityPort;
pub use engagement::EngagementPort;
pub use error_reporter::ErrorReporterPort;
pub use media_player::MediaPlayerPort;
pub use storage::KeyValueStorePort;
