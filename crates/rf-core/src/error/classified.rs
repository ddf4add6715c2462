use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error categories the UI and the retry policy rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Auth,
    Media,
    Storage,
    Validation,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Media => "media",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure ready to be surfaced.
///
/// `recoverable` decides both whether the retry policy keeps trying and
/// whether the UI offers a "Retry" affordance.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("[{category}] {code}: {message}")]
pub struct ClassifiedError {
    pub code: String,
    pub category: ErrorCategory,
    pub recoverable: bool,
    pub message: String,
}

impl ClassifiedError {
    pub fn new(
        code: impl Into<String>,
        category: ErrorCategory,
        recoverable: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            category,
            recoverable,
            message: message.into(),
        }
    }

    /// Local input problem: fix and resubmit, never retried.
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, ErrorCategory::Validation, false, message)
    }

    pub fn is_network(&self) -> bool {
        self.category == ErrorCategory::Network
    }

    /// Whether a "Retry" affordance should be rendered.
    pub fn offers_retry(&self) -> bool {
        self.recoverable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_code() {
        let err = ClassifiedError::new("NETWORK_ERROR", ErrorCategory::Network, true, "offline");
        assert_eq!(err.to_string(), "[network] NETWORK_ERROR: offline");
    }

    #[test]
    fn validation_errors_never_offer_retry() {
        let err = ClassifiedError::validation("VALIDATION_EMAIL_REQUIRED", "Email address is required");
        assert_eq!(err.category, ErrorCategory::Validation);
        assert!(!err.offers_retry());
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorCategory::Storage).unwrap();
        assert_eq!(json, "\"storage\"");
    }
}
