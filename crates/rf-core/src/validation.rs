//! Local input validation for the auth forms.
//!
//! Every failure is a `validation` [`ClassifiedError`] with `recoverable: false`
//! and is raised before any network call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClassifiedError;

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DISPLAY_NAME_MIN_LEN: usize = 2;
pub const DISPLAY_NAME_MAX_LEN: usize = 50;

pub const EMAIL_REQUIRED: &str = "VALIDATION_EMAIL_REQUIRED";
pub const EMAIL_INVALID: &str = "VALIDATION_EMAIL_INVALID";
pub const PASSWORD_REQUIRED: &str = "VALIDATION_PASSWORD_REQUIRED";
pub const PASSWORD_TOO_SHORT: &str = "VALIDATION_PASSWORD_TOO_SHORT";
pub const PASSWORD_TOO_WEAK: &str = "VALIDATION_PASSWORD_TOO_WEAK";
pub const DISPLAY_NAME_REQUIRED: &str = "VALIDATION_DISPLAY_NAME_REQUIRED";
pub const DISPLAY_NAME_LENGTH: &str = "VALIDATION_DISPLAY_NAME_LENGTH";
pub const DISPLAY_NAME_CHARSET: &str = "VALIDATION_DISPLAY_NAME_CHARSET";

pub fn validate_email(email: &str) -> Result<(), ClassifiedError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ClassifiedError::validation(EMAIL_REQUIRED, "Email is required"));
    }

    let matches = EMAIL_PATTERN
        .as_ref()
        .map(|pattern| pattern.is_match(email))
        .unwrap_or(false);
    if !matches {
        return Err(ClassifiedError::validation(
            EMAIL_INVALID,
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ClassifiedError> {
    if password.is_empty() {
        return Err(ClassifiedError::validation(
            PASSWORD_REQUIRED,
            "Password is required",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClassifiedError::validation(
            PASSWORD_TOO_SHORT,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(ClassifiedError::validation(
            PASSWORD_TOO_WEAK,
            "Password must contain at least one lowercase letter, one uppercase letter, and one number",
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), ClassifiedError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClassifiedError::validation(
            DISPLAY_NAME_REQUIRED,
            "Display name is required",
        ));
    }

    let len = name.chars().count();
    if !(DISPLAY_NAME_MIN_LEN..=DISPLAY_NAME_MAX_LEN).contains(&len) {
        return Err(ClassifiedError::validation(
            DISPLAY_NAME_LENGTH,
            format!(
                "Display name must be between {DISPLAY_NAME_MIN_LEN} and {DISPLAY_NAME_MAX_LEN} characters"
            ),
        ));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.');
    if !name.chars().all(allowed) {
        return Err(ClassifiedError::validation(
            DISPLAY_NAME_CHARSET,
            "Display name can only contain letters, numbers, spaces, hyphens, underscores, and periods",
        ));
    }
    Ok(())
}

/// Sign-up form: email, then password, then display name. First failure wins.
pub fn validate_sign_up(
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<(), ClassifiedError> {
    validate_email(email)?;
    validate_password(password)?;
    validate_display_name(display_name)
}

/// Sign-in form only checks presence; the provider judges the rest.
pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ClassifiedError> {
    if email.trim().is_empty() {
        return Err(ClassifiedError::validation(EMAIL_REQUIRED, "Email is required"));
    }
    if password.is_empty() {
        return Err(ClassifiedError::validation(
            PASSWORD_REQUIRED,
            "Password is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn code_of(result: Result<(), ClassifiedError>) -> String {
        result.unwrap_err().code
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("  ana@example.com ").is_ok());
        assert_eq!(code_of(validate_email("")), EMAIL_REQUIRED);
        assert_eq!(code_of(validate_email("ana@example")), EMAIL_INVALID);
        assert_eq!(code_of(validate_email("ana @x.io")), EMAIL_INVALID);
    }

    #[test]
    fn password_strength() {
        assert!(validate_password("Abcde1").is_ok());
        assert_eq!(code_of(validate_password("")), PASSWORD_REQUIRED);
        assert_eq!(code_of(validate_password("Ab1")), PASSWORD_TOO_SHORT);
        assert_eq!(code_of(validate_password("abcdef1")), PASSWORD_TOO_WEAK);
        assert_eq!(code_of(validate_password("ABCDEF1")), PASSWORD_TOO_WEAK);
        assert_eq!(code_of(validate_password("Abcdefg")), PASSWORD_TOO_WEAK);
    }

    #[test]
    fn display_name_rules() {
        assert!(validate_display_name("  ana_b.c-1 ").is_ok());
        assert_eq!(code_of(validate_display_name("   ")), DISPLAY_NAME_REQUIRED);
        assert_eq!(code_of(validate_display_name("a")), DISPLAY_NAME_LENGTH);
        assert_eq!(
            code_of(validate_display_name(&"x".repeat(51))),
            DISPLAY_NAME_LENGTH
        );
        assert_eq!(code_of(validate_display_name("ana!")), DISPLAY_NAME_CHARSET);
    }

    #[test]
    fn sign_up_reports_first_failure_in_field_order() {
        assert_eq!(code_of(validate_sign_up("bad", "x", "!")), EMAIL_INVALID);
        assert_eq!(
            code_of(validate_sign_up("a@b.co", "x", "!")),
            PASSWORD_TOO_SHORT
        );
        assert_eq!(
            code_of(validate_sign_up("a@b.co", "Abcde1", "!")),
            DISPLAY_NAME_LENGTH
        );
    }

    #[test]
    fn sign_in_checks_presence_only() {
        assert!(validate_sign_in("bad@x", "wrong").is_ok());
        assert_eq!(code_of(validate_sign_in("", "pw")), EMAIL_REQUIRED);
        assert_eq!(code_of(validate_sign_in("a@b.co", "")), PASSWORD_REQUIRED);
    }

    #[test]
    fn validation_failures_are_terminal() {
        let err = validate_email("").unwrap_err();
        assert_eq!(err.category, ErrorCategory::Validation);
        assert!(!err.recoverable);
    }
}
