//! Authentication use cases.

mod session;

pub use session::{AuthSession, AuthState, NOTHING_TO_RETRY, NO_USER_RETURNED};
