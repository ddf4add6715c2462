//! Error taxonomy shared by the retry policy and the UI.
//!
//! Collaborators raise [`RawError`]; every failure that reaches a caller is
//! converted into exactly one [`ClassifiedError`] by [`classify`] (or built
//! directly by the validation module).

mod auth_codes;
mod classified;
mod classify;
mod raw;
mod report;

pub use auth_codes::AuthErrorCode;
pub use classified::{ClassifiedError, ErrorCategory};
pub use classify::{classify, ErrorOrigin};
pub use raw::RawError;
pub use report::{ErrorReport, ErrorStats};
