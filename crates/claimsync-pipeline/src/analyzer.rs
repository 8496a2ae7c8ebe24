//! Failure classification for anomalies the pipeline reports.
//!
//! The analyzer turns a failed operation into a [`Finding`]: either a
//! classified event for the collector, a logged defensive skip, or a
//! data-corruption signal the caller propagates to the apply boundary.

use tracing::warn;

use claimsync_core::{RegisteredUserEntry, RegistryId};

use crate::error::{PipelineError, PipelineResult};
use crate::events::{Event, EventCategory, EventUser};
use crate::traits::PipelineEnv;

/// Outcome of analyzing a failed operation.
#[derive(Debug)]
pub enum Finding {
    /// A classified, user-actionable anomaly. Collect and continue.
    Report(Event),
    /// Internally inconsistent but not attributable; logged, no event.
    Skip,
    /// Registry data exists by email but not by the expected id.
    /// Unrecoverable for this entry; propagate.
    Corrupt {
        email: String,
        registry_id: RegistryId,
    },
}

impl Finding {
    /// Collects a report into `collect`, converts corruption into an error,
    /// and passes skips through.
    pub fn resolve(self, collect: impl FnOnce(Event)) -> PipelineResult<()> {
        match self {
            Finding::Report(event) => {
                collect(event);
                Ok(())
            }
            Finding::Skip => Ok(()),
            Finding::Corrupt { email, registry_id } => {
                Err(PipelineError::DataCorruption { email, registry_id })
            }
        }
    }
}

/// Classifies entry failures into the event taxonomy.
pub struct FailureAnalyzer<'a> {
    env: PipelineEnv<'a>,
}

impl<'a> FailureAnalyzer<'a> {
    /// Creates an analyzer over the run's collaborators.
    #[must_use]
    pub fn new(env: PipelineEnv<'a>) -> Self {
        Self { env }
    }

    /// Classifies a terminal account-creation failure.
    ///
    /// An existing account for the registry id wins over text matching; an
    /// error mentioning a permission or authorization problem is classified
    /// as such; anything else is a generic platform error.
    #[must_use]
    pub fn account_creation_failure(
        &self,
        entry: &RegisteredUserEntry,
        error: &PipelineError,
        attempts: u32,
    ) -> Finding {
        let user = EventUser::from(entry);

        match self.env.platform.find_user(&entry.registry_id) {
            Ok(Some(_)) => {
                return Finding::Report(Event::new(
                    EventCategory::DuplicateUserRecords,
                    user,
                    "User already exists",
                ));
            }
            Ok(None) => {}
            Err(lookup_err) => {
                // Duplicate check is best effort; classify from the error text.
                warn!(
                    registry_id = %entry.registry_id,
                    error = %lookup_err,
                    "duplicate-account check failed during classification"
                );
            }
        }

        let text = error.to_string().to_lowercase();
        if text.contains("permission") || text.contains("unauthorized") {
            Finding::Report(Event::new(
                EventCategory::InsufficientPermissions,
                user,
                format!("insufficient permissions creating account: {error}"),
            ))
        } else {
            Finding::Report(Event::new(
                EventCategory::PlatformError,
                user,
                format!("creation failed after {attempts} attempts"),
            ))
        }
    }

    /// Analyzes a claimed entry whose registry person could not be found by
    /// registry id.
    ///
    /// Looks the person up again by auth email, falling back to the primary
    /// directory email.
    ///
    /// # Errors
    ///
    /// Propagates registry lookup failures.
    pub fn missing_claimed_user(&self, entry: &RegisteredUserEntry) -> PipelineResult<Finding> {
        let email = entry
            .active
            .auth_email()
            .unwrap_or(entry.entry().email.as_str());

        let persons = self.env.registry.get(email)?;

        if persons.is_empty() {
            return Ok(Finding::Report(Event::new(
                EventCategory::MissingRegistryData,
                EventUser::from(entry),
                format!("user {email} not found in registry"),
            )));
        }

        let id_matches = persons
            .iter()
            .any(|p| p.registry_id.as_ref() == Some(&entry.registry_id));
        if id_matches {
            // The id lookup and the email lookup disagree transiently.
            warn!(
                email = email,
                registry_id = %entry.registry_id,
                "registry id lookup missed a person the email lookup found"
            );
            return Ok(Finding::Skip);
        }

        Ok(Finding::Corrupt {
            email: email.to_string(),
            registry_id: entry.registry_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;

    #[test]
    fn test_finding_resolve_report_collects() {
        let collector = EventCollector::new();
        let event = Event::new(
            EventCategory::PlatformError,
            EventUser {
                email: "a@x.com".to_string(),
                name: None,
                adcid: None,
                registry_id: None,
                auth_email: None,
            },
            "failed",
        );
        Finding::Report(event)
            .resolve(|e| collector.collect(e))
            .unwrap();
        assert_eq!(collector.error_count(), 1);
    }

    #[test]
    fn test_finding_resolve_skip_is_silent() {
        let collector = EventCollector::new();
        Finding::Skip.resolve(|e| collector.collect(e)).unwrap();
        assert!(collector.is_empty());
    }

    #[test]
    fn test_finding_resolve_corrupt_propagates() {
        let collector = EventCollector::new();
        let err = Finding::Corrupt {
            email: "a@x.com".to_string(),
            registry_id: RegistryId::new("0000-0001"),
        }
        .resolve(|e| collector.collect(e))
        .unwrap_err();
        assert_eq!(err.error_code(), "DATA_CORRUPTION");
        assert!(collector.is_empty());
    }
}
