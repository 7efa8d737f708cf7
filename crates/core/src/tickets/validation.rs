//! Input validation for agent identifiers

use once_cell::sync::Lazy;
use prepdesk_domain::{PrepDeskError, Result};
use regex::Regex;

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Validate an agent email and normalize it (trimmed, lower-cased).
///
/// # Errors
/// Returns `PrepDeskError::Validation` for empty or malformed addresses.
/// The rejected value is not echoed into the error.
pub fn normalize_email(email: &str) -> Result<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(PrepDeskError::Validation("email cannot be empty".into()));
    }

    let regex = EMAIL_REGEX
        .as_ref()
        .ok_or_else(|| PrepDeskError::Internal("email pattern failed to compile".into()))?;
    if !regex.is_match(trimmed) {
        return Err(PrepDeskError::Validation("invalid email format".into()));
    }

    Ok(trimmed.to_lowercase())
}
