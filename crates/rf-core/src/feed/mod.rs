//! Feed domain: video models, the viewport activation policy, playback
//! command derivation and engagement math.

pub mod engagement;
pub mod playback;
pub mod video;
pub mod viewport;

pub use engagement::LikeSnapshot;
pub use playback::{playback_commands, PlaybackCommand};
pub use video::{Creator, MusicInfo, Video, VideoStats};
pub use viewport::{
    ActivationAction, ActivationPolicy, ActivationState, ViewportConfig, ViewportConfigError,
    ViewportEvent, ViewportInput, DEFAULT_MIN_DWELL_MS, DEFAULT_VISIBILITY_THRESHOLD,
};
