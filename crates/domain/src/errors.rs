//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for PrepDesk
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PrepDeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input rejected by a validation rule (malformed email, foreign URL).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrepDeskError {
    /// Stable label for the error class, safe to log and to count.
    ///
    /// Messages may carry request details; the label never does.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for PrepDesk operations
pub type Result<T> = std::result::Result<T, PrepDeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_do_not_leak_messages() {
        let err = PrepDeskError::Auth("token abc123 rejected".into());
        assert_eq!(err.label(), "auth");
        assert!(!err.label().contains("abc123"));
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = PrepDeskError::Validation("bad email".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Validation");
        assert_eq!(json["message"], "bad email");
    }
}
