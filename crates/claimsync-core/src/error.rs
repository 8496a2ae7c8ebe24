//! Error Types
//!
//! Standardized error types shared across claimsync crates.

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for claimsync domain data.
///
/// Covers failures that arise while building or validating domain records,
/// before any pipeline stage runs.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreError {
    /// A required field was absent or empty.
    #[error("missing field '{field}' on {record}")]
    MissingField {
        /// The record type being built.
        record: String,
        /// The field that was absent.
        field: String,
    },

    /// Input validation failure.
    #[error("validation error on field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation.
        field: String,
        /// Description of the validation failure.
        message: String,
    },
}

/// Type alias for Results using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = CoreError::MissingField {
            record: "UserEntry".to_string(),
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "missing field 'email' on UserEntry");
    }

    #[test]
    fn test_validation_error_display() {
        let err = CoreError::ValidationError {
            field: "adcid".to_string(),
            message: "must be non-negative".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "validation error on field 'adcid': must be non-negative"
        );
    }

    #[test]
    fn test_is_std_error() {
        let err = CoreError::MissingField {
            record: "UserEntry".to_string(),
            field: "email".to_string(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
