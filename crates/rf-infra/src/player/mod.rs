mod tracing_player;

pub use tracing_player::{PlayerCall, TracingPlayer, DEFAULT_CALL_HISTORY};
