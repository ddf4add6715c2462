//! In-process auth provider with provider-style error codes.
//! 内存认证提供者，错误码与真实提供者一致。

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use rf_core::auth::AuthUser;
use rf_core::error::{AuthErrorCode, RawError};
use rf_core::ids::UserId;
use rf_core::ports::AuthPort;

const MIN_PROVIDER_PASSWORD_LEN: usize = 6;

struct Account {
    password: String,
    user: AuthUser,
    disabled: bool,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    current: Option<AuthUser>,
}

#[derive(Default)]
pub struct InMemoryAuth {
    inner: RwLock<Inner>,
    latency: Duration,
}

fn provider_error(code: AuthErrorCode) -> RawError {
    RawError::with_code(code.provider_code(), code.user_message())
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Seed an account without signing in.
    pub async fn register(&self, email: &str, password: &str, display_name: Option<&str>) -> AuthUser {
        let user = AuthUser {
            uid: UserId::new(),
            email: normalize(email),
            display_name: display_name.map(str::to_string),
        };
        self.inner.write().await.accounts.insert(
            normalize(email),
            Account {
                password: password.to_string(),
                user: user.clone(),
                disabled: false,
            },
        );
        user
    }

    pub async fn disable(&self, email: &str) {
        if let Some(account) = self.inner.write().await.accounts.get_mut(&normalize(email)) {
            account.disabled = true;
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl AuthPort for InMemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, RawError> {
        self.simulate_latency().await;
        let mut inner = self.inner.write().await;

        let account = inner
            .accounts
            .get(&normalize(email))
            .ok_or_else(|| provider_error(AuthErrorCode::UserNotFound))?;
        if account.disabled {
            return Err(provider_error(AuthErrorCode::UserDisabled));
        }
        if account.password != password {
            return Err(provider_error(AuthErrorCode::WrongPassword));
        }

        let user = account.user.clone();
        inner.current = Some(user.clone());
        info!(uid = %user.uid, "signed in");
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthUser, RawError> {
        self.simulate_latency().await;
        let key = normalize(email);
        {
            let inner = self.inner.read().await;
            if inner.accounts.contains_key(&key) {
                return Err(provider_error(AuthErrorCode::EmailAlreadyInUse));
            }
        }
        if !key.contains('@') {
            return Err(provider_error(AuthErrorCode::InvalidEmail));
        }
        if password.chars().count() < MIN_PROVIDER_PASSWORD_LEN {
            return Err(provider_error(AuthErrorCode::WeakPassword));
        }

        let user = self.register(email, password, display_name).await;
        self.inner.write().await.current = Some(user.clone());
        info!(uid = %user.uid, "account created");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), RawError> {
        self.simulate_latency().await;
        self.inner.write().await.current = None;
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthUser> {
        self.inner.read().await.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_checks_credentials() {
        let auth = InMemoryAuth::new();
        auth.register("ana@example.com", "Secret1", Some("Ana")).await;

        let err = auth.sign_in("ana@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.code(), Some("auth/wrong-password"));

        let err = auth.sign_in("nobody@example.com", "x").await.unwrap_err();
        assert_eq!(err.code(), Some("auth/user-not-found"));

        let user = auth.sign_in("ANA@example.com", "Secret1").await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Ana"));
        assert_eq!(auth.current_user().await, Some(user));
    }

    #[tokio::test]
    async fn disabled_account_is_rejected() {
        let auth = InMemoryAuth::new();
        auth.register("ana@example.com", "Secret1", None).await;
        auth.disable("ana@example.com").await;

        let err = auth.sign_in("ana@example.com", "Secret1").await.unwrap_err();
        assert_eq!(err.code(), Some("auth/user-disabled"));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let auth = InMemoryAuth::new();
        auth.sign_up("ana@example.com", "Secret1", Some("Ana")).await.unwrap();

        let err = auth
            .sign_up("ana@example.com", "Secret1", None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("auth/email-already-in-use"));

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current_user().await, None);
    }
}
