//! Pipeline error types
//!
//! Error definitions with entry-scoped classification for the batch
//! continuation boundary.

use thiserror::Error;

use claimsync_core::RegistryId;

/// Error raised while processing one directory entry.
#[derive(Debug, Error)]
pub enum PipelineError {
    // Data errors (entry-scoped)
    /// A directory record failed validation.
    #[error("invalid entry data: {message}")]
    Validation { message: String },

    // External-call errors (entry-scoped)
    /// The identity registry rejected or failed a call.
    #[error("registry call failed: {message}")]
    Registry {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The platform rejected or failed a call.
    #[error("platform call failed: {message}")]
    Platform {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A notification could not be sent.
    #[error("notification failed: {message}")]
    Notification { message: String },

    /// Registry data exists by email but not by the expected registry id.
    ///
    /// Unrecoverable for the affected entry; the apply boundary logs it and
    /// moves on to the next entry.
    #[error("registry data corruption: person for {email} not found by registry id {registry_id}")]
    DataCorruption {
        email: String,
        registry_id: RegistryId,
    },

    // Internal errors (not entry-scoped)
    /// A bug or broken pipeline invariant.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl PipelineError {
    /// Whether this error is confined to a single entry.
    ///
    /// Entry-scoped errors are caught at the queue apply boundary so the rest
    /// of the batch still runs. Internal errors abort the stage.
    #[must_use]
    pub fn is_entry_scoped(&self) -> bool {
        !matches!(self, PipelineError::Internal { .. })
    }

    /// Get an error code for classification in logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "VALIDATION",
            PipelineError::Registry { .. } => "REGISTRY_CALL_FAILED",
            PipelineError::Platform { .. } => "PLATFORM_CALL_FAILED",
            PipelineError::Notification { .. } => "NOTIFICATION_FAILED",
            PipelineError::DataCorruption { .. } => "DATA_CORRUPTION",
            PipelineError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    // Convenience constructors

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PipelineError::Validation {
            message: message.into(),
        }
    }

    /// Create a registry call error.
    pub fn registry(message: impl Into<String>) -> Self {
        PipelineError::Registry {
            message: message.into(),
            source: None,
        }
    }

    /// Create a registry call error with source.
    pub fn registry_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PipelineError::Registry {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a platform call error.
    pub fn platform(message: impl Into<String>) -> Self {
        PipelineError::Platform {
            message: message.into(),
            source: None,
        }
    }

    /// Create a platform call error with source.
    pub fn platform_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PipelineError::Platform {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a notification error.
    pub fn notification(message: impl Into<String>) -> Self {
        PipelineError::Notification {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PipelineError::Internal {
            message: message.into(),
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_scoped_errors() {
        let entry_scoped = vec![
            PipelineError::validation("bad record"),
            PipelineError::registry("timeout"),
            PipelineError::platform("500"),
            PipelineError::notification("smtp down"),
            PipelineError::DataCorruption {
                email: "a@x.com".to_string(),
                registry_id: RegistryId::new("0000-0001"),
            },
        ];
        for err in entry_scoped {
            assert!(
                err.is_entry_scoped(),
                "expected {} to be entry scoped",
                err.error_code()
            );
        }
    }

    #[test]
    fn test_internal_is_not_entry_scoped() {
        assert!(!PipelineError::internal("broken invariant").is_entry_scoped());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PipelineError::platform("x").error_code(),
            "PLATFORM_CALL_FAILED"
        );
        assert_eq!(
            PipelineError::registry("x").error_code(),
            "REGISTRY_CALL_FAILED"
        );
    }

    #[test]
    fn test_data_corruption_display_carries_both_keys() {
        let err = PipelineError::DataCorruption {
            email: "a@x.com".to_string(),
            registry_id: RegistryId::new("0000-0001"),
        };
        let text = err.to_string();
        assert!(text.contains("a@x.com"));
        assert!(text.contains("0000-0001"));
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::other("connection reset");
        let err = PipelineError::platform_with_source("create failed", source);
        if let PipelineError::Platform { source, .. } = &err {
            assert!(source.is_some());
        } else {
            panic!("expected Platform variant");
        }
    }
}
