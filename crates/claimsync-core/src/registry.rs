//! Identity-registry records.
//!
//! [`RegistryPerson`] mirrors what the external registry stores about a
//! person. The registry owns and persists these records; this crate only
//! models their shape and the claimed predicate the pipeline splits on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::PersonName;
use crate::ids::RegistryId;

/// Status of an external-identity subject in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    /// Subject is active and usable for login.
    Active,
    /// Subject was suspended by the registry.
    Suspended,
    /// Subject was revoked by the person or an administrator.
    Revoked,
}

/// An email address stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEmail {
    /// The address.
    pub address: String,
    /// Whether the registry has verified ownership of the address.
    pub verified: bool,
}

impl RegistryEmail {
    /// Creates a registry email.
    pub fn new(address: impl Into<String>, verified: bool) -> Self {
        Self {
            address: address.into(),
            verified,
        }
    }
}

/// A federated-login subject bound to a registry person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// Issuer URL of the identity provider.
    pub issuer: String,
    /// Subject identifier at the issuer.
    pub subject: String,
    /// Current status of the binding.
    pub status: IdentityStatus,
}

impl ExternalIdentity {
    /// Creates an external identity binding.
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        status: IdentityStatus,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            subject: subject.into(),
            status,
        }
    }
}

/// One person record in the identity-claim registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryPerson {
    /// Whether the registry record is active.
    pub active: bool,
    /// Name on the record, when the registry has one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<PersonName>,
    /// Email addresses with their verification state.
    #[serde(default)]
    pub emails: Vec<RegistryEmail>,
    /// External-identity subjects bound to the record.
    #[serde(default)]
    pub identities: Vec<ExternalIdentity>,
    /// Registry identifier, once the record has been claimed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub registry_id: Option<RegistryId>,
    /// When the registry created the record. Absent on locally-created
    /// provisional records.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RegistryPerson {
    /// A provisional record for a person the registry does not know yet.
    ///
    /// Used when the pipeline provisions a brand-new registry person from a
    /// directory entry: active, one unverified email, no identity bindings.
    #[must_use]
    pub fn provisional(name: PersonName, email: impl Into<String>) -> Self {
        Self {
            active: true,
            name: Some(name),
            emails: vec![RegistryEmail::new(email, false)],
            identities: Vec::new(),
            registry_id: None,
            created_at: None,
        }
    }

    /// Whether at least one email address is verified.
    #[must_use]
    pub fn has_verified_email(&self) -> bool {
        self.emails.iter().any(|e| e.verified)
    }

    /// The first verified email address, if any.
    #[must_use]
    pub fn verified_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| e.verified)
            .map(|e| e.address.as_str())
    }

    /// Whether an active subject from the trusted issuer is bound.
    #[must_use]
    pub fn has_trusted_identity(&self, trusted_issuer: &str) -> bool {
        self.identities
            .iter()
            .any(|i| i.issuer == trusted_issuer && i.status == IdentityStatus::Active)
    }

    /// The claimed predicate.
    ///
    /// A person is claimed iff the record is active, at least one email is
    /// verified, and an active subject from the trusted issuer is bound.
    /// Every other combination is unclaimed.
    #[must_use]
    pub fn is_claimed(&self, trusted_issuer: &str) -> bool {
        self.active && self.has_verified_email() && self.has_trusted_identity(trusted_issuer)
    }
}
