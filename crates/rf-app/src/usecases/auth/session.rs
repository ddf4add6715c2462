//! Auth session: sign in / sign up / sign out through the resilient executor.
//! 认证会话。
//!
//! Input is validated locally before any provider call. The last attempted
//! operation is kept with its parameters so a "Retry" affordance can replay it
//! unchanged.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, info_span, Instrument};

use rf_core::auth::{AuthOperation, AuthUser};
use rf_core::config::RetryPolicies;
use rf_core::error::{ClassifiedError, ErrorCategory, ErrorOrigin};
use rf_core::ports::{AuthPort, ClockPort, ErrorReporterPort};
use rf_core::retry::RetryPolicy;
use rf_core::validation::{validate_sign_in, validate_sign_up};

use crate::deps::AppDeps;
use crate::usecases::internal::report::report_error;
use crate::usecases::resilient_executor::ResilientExecutor;

pub const NOTHING_TO_RETRY: &str = "NOTHING_TO_RETRY";
pub const NO_USER_RETURNED: &str = "AUTH_NO_USER";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub is_loading: bool,
    pub error: Option<ClassifiedError>,
    pub last_operation: Option<AuthOperation>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct AuthSession {
    auth: Arc<dyn AuthPort>,
    executor: ResilientExecutor,
    reporter: Arc<dyn ErrorReporterPort>,
    clock: Arc<dyn ClockPort>,
    auth_policy: RetryPolicy,
    sign_out_policy: RetryPolicy,
    state: Mutex<AuthState>,
}

impl AuthSession {
    pub fn new(deps: &AppDeps, policies: RetryPolicies) -> Self {
        Self {
            auth: deps.auth.clone(),
            executor: ResilientExecutor::new(deps.connectivity.clone(), deps.sleeper.clone()),
            reporter: deps.reporter.clone(),
            clock: deps.clock.clone(),
            auth_policy: policies.auth,
            sign_out_policy: policies.sign_out,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub async fn state(&self) -> AuthState {
        self.state.lock().await.clone()
    }

    /// Pick up a user the provider already has a session for.
    pub async fn initialize(&self) -> Option<AuthUser> {
        let user = self.auth.current_user().await;
        self.state.lock().await.user = user.clone();
        if let Some(user) = &user {
            info!(uid = %user.uid, "restored auth session");
        }
        user
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ClassifiedError> {
        let operation = AuthOperation::SignIn {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.run(operation).await?.ok_or_else(no_user_returned)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, ClassifiedError> {
        let operation = AuthOperation::SignUp {
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        };
        self.run(operation).await?.ok_or_else(no_user_returned)
    }

    pub async fn sign_out(&self) -> Result<(), ClassifiedError> {
        self.run(AuthOperation::SignOut).await.map(|_| ())
    }

    /// Replay the last attempted operation with the same parameters.
    ///
    /// Returns the signed-in user, or `None` for a sign-out.
    pub async fn retry_last_operation(&self) -> Result<Option<AuthUser>, ClassifiedError> {
        let last = self.state.lock().await.last_operation.clone();
        match last {
            Some(operation) => {
                info!(operation = operation.name(), "retrying last auth operation");
                self.run(operation).await
            }
            None => Err(ClassifiedError::new(
                NOTHING_TO_RETRY,
                ErrorCategory::Unknown,
                false,
                "There is nothing to retry.",
            )),
        }
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.error = None;
    }

    /// Provider-side auth state change (token expiry, sign-in elsewhere...).
    pub async fn on_auth_state_changed(&self, user: Option<AuthUser>) {
        let mut state = self.state.lock().await;
        state.user = user;
        state.is_loading = false;
    }

    /// Drop a stored `network` error once connectivity is back.
    pub async fn on_connectivity_restored(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.error.as_ref().is_some_and(ClassifiedError::is_network) {
            state.error = None;
            return true;
        }
        false
    }

    async fn run(&self, operation: AuthOperation) -> Result<Option<AuthUser>, ClassifiedError> {
        let span = info_span!("usecase.auth_session.execute", operation = operation.name());

        async {
            let validation = match &operation {
                AuthOperation::SignIn { email, password } => validate_sign_in(email, password),
                AuthOperation::SignUp {
                    email,
                    password,
                    display_name,
                } => validate_sign_up(email, password, display_name),
                AuthOperation::SignOut => Ok(()),
            };
            if let Err(err) = validation {
                return Err(self.fail_validation(err).await);
            }

            {
                let mut state = self.state.lock().await;
                state.is_loading = true;
                state.error = None;
                state.last_operation = Some(operation.clone());
            }

            let result = self.call_provider(&operation).await;

            let mut state = self.state.lock().await;
            state.is_loading = false;
            match result {
                Ok(user) => {
                    state.user = user.clone();
                    state.last_operation = None;
                    match &user {
                        Some(user) => info!(uid = %user.uid, "auth operation succeeded"),
                        None => info!("signed out"),
                    }
                    Ok(user)
                }
                Err(err) => {
                    state.error = Some(err.clone());
                    drop(state);
                    report_error(
                        self.reporter.as_ref(),
                        self.clock.as_ref(),
                        &format!("auth.{}", operation.name()),
                        &err,
                    );
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn call_provider(
        &self,
        operation: &AuthOperation,
    ) -> Result<Option<AuthUser>, ClassifiedError> {
        let auth = self.auth.clone();
        let result = match operation {
            AuthOperation::SignIn { email, password } => self
                .executor
                .execute("auth.sign_in", self.auth_policy, ErrorOrigin::Auth, || {
                    let auth = auth.clone();
                    async move { auth.sign_in(email, password).await.map(Some) }
                })
                .await,
            AuthOperation::SignUp {
                email,
                password,
                display_name,
            } => self
                .executor
                .execute("auth.sign_up", self.auth_policy, ErrorOrigin::Auth, || {
                    let auth = auth.clone();
                    async move {
                        auth.sign_up(email, password, Some(display_name.trim()))
                            .await
                            .map(Some)
                    }
                })
                .await,
            AuthOperation::SignOut => self
                .executor
                .execute("auth.sign_out", self.sign_out_policy, ErrorOrigin::Auth, || {
                    let auth = auth.clone();
                    async move { auth.sign_out().await.map(|()| None) }
                })
                .await,
        };
        result.map_err(|failure| failure.into_classified())
    }

    async fn fail_validation(&self, err: ClassifiedError) -> ClassifiedError {
        self.state.lock().await.error = Some(err.clone());
        report_error(
            self.reporter.as_ref(),
            self.clock.as_ref(),
            "auth.validation",
            &err,
        );
        err
    }
}

fn no_user_returned() -> ClassifiedError {
    ClassifiedError::new(
        NO_USER_RETURNED,
        ErrorCategory::Auth,
        true,
        "Authentication did not return a user. Please try again.",
    )
}
