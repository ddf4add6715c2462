use async_trait::async_trait;

use crate::auth::AuthUser;
use crate::error::RawError;

/// Backend-as-a-service auth provider.
///
/// Rejections carry the provider's code (`auth/wrong-password`, ...) in
/// [`RawError::code`].
#[async_trait]
pub trait AuthPort: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, RawError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthUser, RawError>;

    async fn sign_out(&self) -> Result<(), RawError>;

    /// User restored from the provider's own session cache, if any.
    async fn current_user(&self) -> Option<AuthUser>;
}
