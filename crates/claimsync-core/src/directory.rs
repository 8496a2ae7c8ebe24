//! Directory snapshot records.
//!
//! One [`UserEntry`] is built per directory record at the start of a run and
//! discarded when the run ends. Entries are promoted to
//! [`ActiveUserEntry`]/[`RegisteredUserEntry`] as the pipeline learns more
//! about the person; promotion adds data, it never rewrites the base record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::ids::{Adcid, RegistryId};

/// A person's name as recorded in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl PersonName {
    /// Creates a name from its parts.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// The display form used for bad-claim lookups: "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Access level a directory entry holds for one study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    /// Read-only project access.
    ReadOnly,
    /// Read and write project access.
    ReadWrite,
    /// Administrative project access.
    Admin,
}

/// Per-study access-level map keyed by study identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyAuthorizations {
    levels: BTreeMap<String, AccessLevel>,
}

impl StudyAuthorizations {
    /// Creates an empty authorization map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the access level for a study.
    pub fn insert(&mut self, study_id: impl Into<String>, level: AccessLevel) {
        self.levels.insert(study_id.into(), level);
    }

    /// The access level for a study, if any.
    #[must_use]
    pub fn get(&self, study_id: &str) -> Option<AccessLevel> {
        self.levels.get(study_id).copied()
    }

    /// Iterates studies in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AccessLevel)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Whether no study authorizations are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of authorized studies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

/// Base directory record for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    /// Display name.
    pub name: PersonName,
    /// Primary email address.
    pub email: String,
    /// Whether the directory considers this person active.
    pub active: bool,
    /// Organization the person belongs to.
    pub organization: String,
    /// Site identifier selecting the center access policy.
    pub adcid: Adcid,
    /// Per-study authorizations from the directory.
    pub authorizations: StudyAuthorizations,
}

impl UserEntry {
    /// The display form of the person's name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.name.full_name()
    }
}

/// An active directory entry carrying the authentication email used for
/// registry lookup.
///
/// The `active` flag on the wrapped entry is always true; construction
/// rejects inactive entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUserEntry {
    /// The underlying directory record.
    pub entry: UserEntry,
    /// Email the person used with the identity registry, when known.
    pub auth_email: Option<String>,
}

impl ActiveUserEntry {
    /// Wraps an active directory entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ValidationError`] if the entry is not active.
    pub fn new(entry: UserEntry, auth_email: Option<String>) -> Result<Self, CoreError> {
        if !entry.active {
            return Err(CoreError::ValidationError {
                field: "active".to_string(),
                message: "active user entry requires an active directory record".to_string(),
            });
        }
        Ok(Self { entry, auth_email })
    }

    /// The authentication email, treating empty strings as absent.
    #[must_use]
    pub fn auth_email(&self) -> Option<&str> {
        self.auth_email.as_deref().filter(|e| !e.is_empty())
    }

    /// The display form of the person's name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.entry.full_name()
    }
}

/// An active entry matched to a claimed registry identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUserEntry {
    /// The underlying active entry.
    pub active: ActiveUserEntry,
    /// Registry identifier the claimed persons agreed on. Never empty.
    pub registry_id: RegistryId,
}

impl RegisteredUserEntry {
    /// Promotes an active entry with the registry id it matched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] if the registry id is empty.
    pub fn new(active: ActiveUserEntry, registry_id: RegistryId) -> Result<Self, CoreError> {
        if registry_id.is_empty() {
            return Err(CoreError::MissingField {
                record: "RegisteredUserEntry".to_string(),
                field: "registry_id".to_string(),
            });
        }
        Ok(Self {
            active,
            registry_id,
        })
    }

    /// The underlying directory record.
    #[must_use]
    pub fn entry(&self) -> &UserEntry {
        &self.active.entry
    }
}

/// One record from the directory feed, tagged by how much identity detail the
/// feed supplied.
///
/// The pipeline pattern-matches on the variant at each stage instead of
/// inspecting runtime types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryRecord {
    /// A base record with no authentication email information.
    Plain(UserEntry),
    /// An active record carrying an optional authentication email.
    Active(ActiveUserEntry),
}

impl DirectoryRecord {
    /// The underlying directory record for either variant.
    #[must_use]
    pub fn entry(&self) -> &UserEntry {
        match self {
            DirectoryRecord::Plain(entry) => entry,
            DirectoryRecord::Active(active) => &active.entry,
        }
    }

    /// Whether the directory considers this person active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.entry().active
    }

    /// Unwraps to the base directory record, discarding any auth email.
    #[must_use]
    pub fn into_entry(self) -> UserEntry {
        match self {
            DirectoryRecord::Plain(entry) => entry,
            DirectoryRecord::Active(active) => active.entry,
        }
    }
}
