//! Raw error → `ClassifiedError` mapping.
//!
//! Rules are evaluated in a fixed priority order, first match wins:
//! 1. no network transport            → `network`, recoverable
//! 2. auth collaborator, known code   → `auth`, recoverable unless the account is disabled
//! 3. media collaborator              → `media`, recoverable unless the format is unsupported
//! 4. persistence collaborator        → `storage`, never recoverable
//! 5. anything else                   → `unknown`, recoverable

use serde::{Deserialize, Serialize};

use super::{AuthErrorCode, ClassifiedError, ErrorCategory, RawError};

/// Which collaborator raised the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    Auth,
    Media,
    Storage,
    Engagement,
    Catalog,
    Unknown,
}

const NETWORK_CODES: &[&str] = &[
    "NETWORK_REQUEST_FAILED",
    "NETWORK_ERROR",
    "ERR_NETWORK",
    "auth/network-request-failed",
];

const NETWORK_MESSAGE_SIGNATURES: &[&str] = &[
    "network request failed",
    "network error",
    "network is unreachable",
    "internet connection",
    "failed to fetch",
];

const MEDIA_FORMAT_CODES: &[&str] = &["FORMAT_ERROR", "UNSUPPORTED_FORMAT"];

const MEDIA_FORMAT_MESSAGE_SIGNATURES: &[&str] = &["format", "unsupported"];

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Classify a raw error. Pure function: no I/O, no side effects.
pub fn classify(raw: &RawError, origin: ErrorOrigin) -> ClassifiedError {
    let message = raw.message.to_lowercase();

    if is_network_failure(raw.code(), &message) {
        let code = match origin {
            ErrorOrigin::Auth => "AUTH_NETWORK_ERROR",
            ErrorOrigin::Media => "MEDIA_NETWORK_ERROR",
            _ => "NETWORK_ERROR",
        };
        return ClassifiedError::new(
            code,
            ErrorCategory::Network,
            true,
            "Please check your internet connection and try again.",
        );
    }

    if origin == ErrorOrigin::Auth {
        if let Some(known) = raw.code().and_then(AuthErrorCode::from_provider_code) {
            return ClassifiedError::new(
                known.classified_code(),
                ErrorCategory::Auth,
                known.is_recoverable(),
                known.user_message(),
            );
        }
    }

    if origin == ErrorOrigin::Media {
        if is_unsupported_format(raw.code(), &message) {
            return ClassifiedError::new(
                "MEDIA_FORMAT_ERROR",
                ErrorCategory::Media,
                false,
                "Video format not supported.",
            );
        }
        return ClassifiedError::new(
            "MEDIA_PLAYBACK_ERROR",
            ErrorCategory::Media,
            true,
            "Failed to play video. Skipping to next.",
        );
    }

    if origin == ErrorOrigin::Storage {
        return ClassifiedError::new(
            "STORAGE_ERROR",
            ErrorCategory::Storage,
            false,
            if raw.message.trim().is_empty() {
                "Failed to access local storage."
            } else {
                raw.message.as_str()
            },
        );
    }

    ClassifiedError::new(
        "UNKNOWN_ERROR",
        ErrorCategory::Unknown,
        true,
        if raw.message.trim().is_empty() {
            GENERIC_MESSAGE
        } else {
            raw.message.as_str()
        },
    )
}

fn is_network_failure(code: Option<&str>, lowercase_message: &str) -> bool {
    let code_matches = code.is_some_and(|code| {
        NETWORK_CODES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(code.trim()))
    });
    code_matches
        || NETWORK_MESSAGE_SIGNATURES
            .iter()
            .any(|signature| lowercase_message.contains(signature))
}

fn is_unsupported_format(code: Option<&str>, lowercase_message: &str) -> bool {
    let code_matches = code.is_some_and(|code| {
        MEDIA_FORMAT_CODES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(code.trim()))
    });
    code_matches
        || MEDIA_FORMAT_MESSAGE_SIGNATURES
            .iter()
            .any(|signature| lowercase_message.contains(signature))
}
