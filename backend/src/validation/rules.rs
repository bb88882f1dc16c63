//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Validates username format.
///
/// Requirements:
/// - Only alphanumeric characters and underscores
/// - 3-80 characters in length
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(3..=80).contains(&len) {
        return Err(ValidationError::new("username_invalid_length"));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::new("username_invalid_characters"));
    }

    Ok(())
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Checks a password against the configured minimum length.
pub fn validate_password_length(password: &str, min_length: usize) -> Result<(), ValidationError> {
    if password.chars().count() < min_length {
        return Err(ValidationError::new("password_too_short"));
    }
    Ok(())
}
