//! Pipeline run configuration.

use serde::{Deserialize, Serialize};

/// Default trusted issuer for claim verification.
pub const DEFAULT_TRUSTED_ISSUER: &str = "https://orcid.org";

/// Configuration for one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Platform account creation attempts per registry id per run.
    ///
    /// Retries happen within the same pass, back to back. The terminal
    /// failure is classified and reported exactly once.
    #[serde(default = "default_max_creation_attempts")]
    pub max_creation_attempts: u32,

    /// Issuer whose active subjects satisfy the claimed predicate.
    #[serde(default = "default_trusted_issuer")]
    pub trusted_issuer: String,
}

fn default_max_creation_attempts() -> u32 {
    3
}

fn default_trusted_issuer() -> String {
    DEFAULT_TRUSTED_ISSUER.to_string()
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_creation_attempts: default_max_creation_attempts(),
            trusted_issuer: default_trusted_issuer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReconcileConfig::default();
        assert_eq!(config.max_creation_attempts, 3);
        assert_eq!(config.trusted_issuer, "https://orcid.org");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ReconcileConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_creation_attempts, 3);

        let config: ReconcileConfig =
            serde_json::from_str(r#"{"max_creation_attempts": 5}"#).unwrap();
        assert_eq!(config.max_creation_attempts, 5);
        assert_eq!(config.trusted_issuer, "https://orcid.org");
    }
}
