//! Collaborator interfaces the pipeline drives.
//!
//! Transport, persistence and rendering live behind these traits; the core
//! only sees their shapes. Every call is blocking and made one entry at a
//! time on the run's single thread.

use serde::{Deserialize, Serialize};

use claimsync_core::{
    AccessLevel, ActiveUserEntry, Adcid, RegisteredUserEntry, RegistryId, RegistryPerson,
};

use crate::error::PipelineResult;

/// A user account on the hosted platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    /// Platform-assigned account id, absent until the account exists.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    /// Registry identifier the account is keyed on.
    pub registry_id: RegistryId,
    /// Account email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl PlatformUser {
    /// Builds the account shape for a claimed directory entry.
    #[must_use]
    pub fn from_entry(entry: &RegisteredUserEntry) -> Self {
        Self {
            id: None,
            registry_id: entry.registry_id.clone(),
            email: entry.entry().email.clone(),
            name: entry.entry().full_name(),
        }
    }
}

/// A center resolved from a site identifier, carrying the access policy used
/// for per-study role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    /// Site identifier.
    pub adcid: Adcid,
    /// Center display name.
    pub name: String,
}

/// External service of record for identity-claim status.
pub trait IdentityRegistry: Send + Sync {
    /// All registry persons known under an email address.
    fn get(&self, email: &str) -> PipelineResult<Vec<RegistryPerson>>;

    /// Persons whose claim was made under a different identity but whose
    /// name matches the directory record.
    fn get_bad_claim(&self, full_name: &str) -> PipelineResult<Vec<RegistryPerson>>;

    /// Creates a registry person; returns the identifiers the registry
    /// assigned.
    fn add(&self, person: &RegistryPerson) -> PipelineResult<Vec<String>>;

    /// The person claimed under a registry id, if one exists.
    fn find_by_registry_id(&self, registry_id: &RegistryId)
        -> PipelineResult<Option<RegistryPerson>>;
}

/// The hosted platform whose accounts and project roles this pipeline
/// provisions.
pub trait PlatformClient: Send + Sync {
    /// The platform account keyed on a registry id, if one exists.
    fn find_user(&self, registry_id: &RegistryId) -> PipelineResult<Option<PlatformUser>>;

    /// Creates a platform account; returns the platform-assigned id.
    fn add_user(&self, user: &PlatformUser) -> PipelineResult<String>;

    /// Sets the account email. No-op when already equal.
    fn set_user_email(&self, user: &PlatformUser, email: &str) -> PipelineResult<()>;

    /// The center for a site identifier, if one is configured.
    fn get_center(&self, adcid: Adcid) -> PipelineResult<Option<Center>>;

    /// Grants access to the shared administrative project. No-op when
    /// already granted.
    fn add_center_user(&self, user: &PlatformUser) -> PipelineResult<()>;

    /// Assigns the project roles a study access level implies, using the
    /// registry email as the identity to authorize. Additive; existing role
    /// ids are checked before mutating.
    fn assign_study_roles(
        &self,
        center: &Center,
        study_id: &str,
        level: AccessLevel,
        registry_email: &str,
    ) -> PipelineResult<()>;
}

/// Outbound notification delivery.
pub trait NotificationClient: Send + Sync {
    /// Invites a newly provisioned registry person to claim their identity.
    fn send_claim_email(&self, entry: &ActiveUserEntry) -> PipelineResult<()>;

    /// Reminds a registered-but-unclaimed person to complete their claim.
    fn send_followup_claim_email(&self, entry: &ActiveUserEntry) -> PipelineResult<()>;

    /// Announces a newly created platform account.
    fn send_creation_email(&self, entry: &RegisteredUserEntry) -> PipelineResult<()>;
}

/// Borrowed collaborator bundle for one pipeline run.
#[derive(Clone, Copy)]
pub struct PipelineEnv<'a> {
    /// Identity-claim registry.
    pub registry: &'a dyn IdentityRegistry,
    /// Hosted platform.
    pub platform: &'a dyn PlatformClient,
    /// Notification delivery.
    pub notifier: &'a dyn NotificationClient,
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsync_core::{PersonName, StudyAuthorizations, UserEntry};

    #[test]
    fn test_platform_user_from_entry() {
        let entry = UserEntry {
            name: PersonName::new("Grace", "Hopper"),
            email: "grace@example.org".to_string(),
            active: true,
            organization: "Navy".to_string(),
            adcid: Adcid::new(3),
            authorizations: StudyAuthorizations::new(),
        };
        let active = ActiveUserEntry::new(entry, Some("grace@claims.org".to_string())).unwrap();
        let registered = RegisteredUserEntry::new(active, RegistryId::new("0000-0003")).unwrap();

        let user = PlatformUser::from_entry(&registered);
        assert!(user.id.is_none());
        assert_eq!(user.registry_id.as_str(), "0000-0003");
        assert_eq!(user.email, "grace@example.org");
        assert_eq!(user.name, "Grace Hopper");
    }
}
