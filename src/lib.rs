//! ReelFeed client core: configuration, logging and wiring around the
//! `rf-app` use cases.

pub mod bootstrap;

pub use bootstrap::{init_tracing_subscriber, load_config, start, FeedRuntime};
