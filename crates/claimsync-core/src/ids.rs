//! Strongly Typed Identifiers
//!
//! Type-safe identifier types for claimsync. The newtype pattern prevents
//! accidental misuse of different ID types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Strongly typed identifier for reconciliation events.
///
/// Every event collected during a run gets a unique `EventId` so report
/// consumers can reference individual anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random ID using UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ID from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns a reference to the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|e| ParseIdError {
            id_type: "EventId",
            message: e.to_string(),
        })
    }
}

/// Identity-registry identifier for a claimed person.
///
/// Opaque string assigned by the external registry once a directory identity
/// has been bound to a verified federated login. An empty value is never a
/// valid claim reference; use [`RegistryId::is_empty`] for the defensive
/// checks the pipeline performs before trusting one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryId(String);

impl RegistryId {
    /// Creates a registry ID from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this ID is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for RegistryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegistryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Site/organization identifier from the directory feed.
///
/// Selects which center's access policy applies when assigning project roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Adcid(i32);

impl Adcid {
    /// Creates an ADCID from its numeric value.
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl Display for Adcid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_uniqueness() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_event_id_from_str_roundtrip() {
        let id = EventId::new();
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_event_id_from_str_invalid() {
        let err = "not-a-uuid".parse::<EventId>().unwrap_err();
        assert_eq!(err.id_type, "EventId");
    }

    #[test]
    fn test_registry_id_empty() {
        assert!(RegistryId::new("").is_empty());
        assert!(!RegistryId::new("0000-0001").is_empty());
    }

    #[test]
    fn test_registry_id_display() {
        let id = RegistryId::new("0000-0002-1825-0097");
        assert_eq!(id.to_string(), "0000-0002-1825-0097");
        assert_eq!(id.as_str(), "0000-0002-1825-0097");
    }

    #[test]
    fn test_adcid_value() {
        let adcid = Adcid::new(42);
        assert_eq!(adcid.value(), 42);
        assert_eq!(adcid.to_string(), "42");
    }

    #[test]
    fn test_registry_id_serde_transparent() {
        let id = RegistryId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
