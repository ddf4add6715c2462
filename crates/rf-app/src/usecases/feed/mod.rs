//! Feed use cases: loading, activation, engagement, persistence.

mod load_videos;
mod persistence;
mod session;
mod share_video;
mod store;
mod toggle_like;
mod viewability;

pub use load_videos::{LoadOutcome, LoadVideos, RELOAD_LIMIT_REACHED};
pub use persistence::PersistFeedState;
pub use session::{FeedSession, FeedSessionConfig};
pub use share_video::{ShareOutcome, ShareVideo};
pub use store::{FeedState, FeedStore};
pub use toggle_like::{ToggleLike, ToggleLikeOutcome, MUTATION_REJECTED, VIDEO_NOT_FOUND};
pub use viewability::ApplyViewability;
