/// Auth provider error codes the client knows how to explain.
///
/// 认证服务返回的已知错误码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    OperationNotAllowed,
    WeakPassword,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    TooManyRequests,
    NetworkRequestFailed,
}

impl AuthErrorCode {
    pub const ALL: [AuthErrorCode; 10] = [
        AuthErrorCode::EmailAlreadyInUse,
        AuthErrorCode::InvalidEmail,
        AuthErrorCode::OperationNotAllowed,
        AuthErrorCode::WeakPassword,
        AuthErrorCode::UserDisabled,
        AuthErrorCode::UserNotFound,
        AuthErrorCode::WrongPassword,
        AuthErrorCode::InvalidCredential,
        AuthErrorCode::TooManyRequests,
        AuthErrorCode::NetworkRequestFailed,
    ];

    /// Provider wire code, e.g. `auth/wrong-password`.
    pub fn provider_code(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::OperationNotAllowed => "auth/operation-not-allowed",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::UserDisabled => "auth/user-disabled",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
            AuthErrorCode::TooManyRequests => "auth/too-many-requests",
            AuthErrorCode::NetworkRequestFailed => "auth/network-request-failed",
        }
    }

    pub fn from_provider_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|known| known.provider_code().eq_ignore_ascii_case(code.trim()))
    }

    /// Stable code surfaced in a `ClassifiedError`.
    pub fn classified_code(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "AUTH_EMAIL_ALREADY_IN_USE",
            AuthErrorCode::InvalidEmail => "AUTH_INVALID_EMAIL",
            AuthErrorCode::OperationNotAllowed => "AUTH_OPERATION_NOT_ALLOWED",
            AuthErrorCode::WeakPassword => "AUTH_WEAK_PASSWORD",
            AuthErrorCode::UserDisabled => "AUTH_USER_DISABLED",
            AuthErrorCode::UserNotFound => "AUTH_USER_NOT_FOUND",
            AuthErrorCode::WrongPassword => "AUTH_WRONG_PASSWORD",
            AuthErrorCode::InvalidCredential => "AUTH_INVALID_CREDENTIAL",
            AuthErrorCode::TooManyRequests => "AUTH_TOO_MANY_REQUESTS",
            AuthErrorCode::NetworkRequestFailed => "AUTH_NETWORK_ERROR",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "An account with this email already exists.",
            AuthErrorCode::InvalidEmail => "Please enter a valid email address.",
            AuthErrorCode::OperationNotAllowed => {
                "This sign-in method is not enabled. Please contact support."
            }
            AuthErrorCode::WeakPassword => "Password should be at least 6 characters long.",
            AuthErrorCode::UserDisabled => {
                "This account has been disabled. Please contact support."
            }
            AuthErrorCode::UserNotFound => "No account found with this email address.",
            AuthErrorCode::WrongPassword => "Incorrect password. Please try again.",
            AuthErrorCode::InvalidCredential => "Incorrect email or password. Please try again.",
            AuthErrorCode::TooManyRequests => {
                "Too many failed attempts. Please wait before trying again."
            }
            AuthErrorCode::NetworkRequestFailed => {
                "Network error during authentication. Please check your connection."
            }
        }
    }

    /// A disabled account cannot be fixed by trying again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AuthErrorCode::UserDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_codes_round_trip() {
        for code in AuthErrorCode::ALL {
            assert_eq!(AuthErrorCode::from_provider_code(code.provider_code()), Some(code));
        }
    }

    #[test]
    fn unknown_provider_code_is_none() {
        assert_eq!(AuthErrorCode::from_provider_code("auth/quota-exceeded"), None);
    }

    #[test]
    fn only_disabled_accounts_are_terminal() {
        let terminal: Vec<_> = AuthErrorCode::ALL
            .into_iter()
            .filter(|code| !code.is_recoverable())
            .collect();
        assert_eq!(terminal, vec![AuthErrorCode::UserDisabled]);
    }
}
