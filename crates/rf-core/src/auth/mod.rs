//! Authentication domain models.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A logical auth operation with the parameters it was attempted with.
///
/// Retained by the session so a "Retry" affordance can re-run it unchanged.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthOperation {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        display_name: String,
    },
    SignOut,
}

impl AuthOperation {
    pub fn name(&self) -> &'static str {
        match self {
            AuthOperation::SignIn { .. } => "sign_in",
            AuthOperation::SignUp { .. } => "sign_up",
            AuthOperation::SignOut => "sign_out",
        }
    }
}

// Passwords never reach logs.
impl std::fmt::Debug for AuthOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthOperation::SignIn { email, .. } => f
                .debug_struct("SignIn")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            AuthOperation::SignUp {
                email,
                display_name,
                ..
            } => f
                .debug_struct("SignUp")
                .field("email", email)
                .field("password", &"<redacted>")
                .field("display_name", display_name)
                .finish(),
            AuthOperation::SignOut => f.write_str("SignOut"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let op = AuthOperation::SignIn {
            email: "ana@example.com".into(),
            password: "Secret1".into(),
        };
        let rendered = format!("{op:?}");
        assert!(rendered.contains("ana@example.com"));
        assert!(!rendered.contains("Secret1"));
        assert_eq!(op.name(), "sign_in");
    }
}
