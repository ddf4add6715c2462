use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure as raised by an external collaborator, before classification.
///
/// `code` carries the provider-specific code when one exists
/// (e.g. `auth/wrong-password`, `NETWORK_REQUEST_FAILED`).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RawError {
    pub code: Option<String>,
    pub message: String,
}

impl RawError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl From<serde_json::Error> for RawError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_code("SERIALIZATION_ERROR", err.to_string())
    }
}

impl From<std::io::Error> for RawError {
    fn from(err: std::io::Error) -> Self {
        Self::with_code(format!("IO_{:?}", err.kind()).to_uppercase(), err.to_string())
    }
}
