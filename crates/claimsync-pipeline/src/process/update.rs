//! Account synchronization stage.
//!
//! Keeps an existing platform account's email in line with the directory and
//! applies or repairs the entry's project-role assignments. Every mutation
//! is idempotent at the collaborator, so visiting the same unchanged entry
//! twice leaves the platform state untouched the second time.

use tracing::{debug, instrument, warn};

use claimsync_core::RegisteredUserEntry;

use crate::analyzer::FailureAnalyzer;
use crate::error::PipelineResult;
use crate::events::EventCollector;
use crate::queue::{EntryProcess, Queue};
use crate::traits::PipelineEnv;

/// Synchronizes email and role assignments for claimed accounts.
pub struct UpdateProcess<'a> {
    env: PipelineEnv<'a>,
    events: &'a EventCollector,
}

impl<'a> UpdateProcess<'a> {
    /// Creates the stage.
    #[must_use]
    pub fn new(env: PipelineEnv<'a>, events: &'a EventCollector) -> Self {
        Self { env, events }
    }

    /// Drains the update sub-queue.
    pub fn execute(mut self, queue: Queue<RegisteredUserEntry>) -> PipelineResult<()> {
        queue.apply(&mut self)
    }
}

impl EntryProcess<RegisteredUserEntry> for UpdateProcess<'_> {
    fn name(&self) -> &'static str {
        "update"
    }

    #[instrument(skip(self, entry, _queue), fields(registry_id = %entry.registry_id))]
    fn visit(
        &mut self,
        entry: RegisteredUserEntry,
        _queue: &mut Queue<RegisteredUserEntry>,
    ) -> PipelineResult<()> {
        let Some(person) = self.env.registry.find_by_registry_id(&entry.registry_id)? else {
            let finding = FailureAnalyzer::new(self.env).missing_claimed_user(&entry)?;
            return finding.resolve(|event| self.events.collect(event));
        };

        let Some(account) = self.env.platform.find_user(&entry.registry_id)? else {
            // Account creation is still settling; the next run will catch up.
            warn!("platform account not found for claimed entry, skipping update");
            return Ok(());
        };

        let Some(registry_email) = person.verified_email() else {
            warn!("claimed registry person has no usable email address, skipping update");
            return Ok(());
        };

        let directory_email = &entry.entry().email;
        if &account.email != directory_email {
            debug!(
                from = %account.email,
                to = %directory_email,
                "synchronizing account email with directory"
            );
            self.env.platform.set_user_email(&account, directory_email)?;
        }

        self.env.platform.add_center_user(&account)?;

        let adcid = entry.entry().adcid;
        let Some(center) = self.env.platform.get_center(adcid)? else {
            warn!(adcid = %adcid, "no center configured for site, skipping role assignment");
            return Ok(());
        };

        for (study_id, level) in entry.entry().authorizations.iter() {
            self.env
                .platform
                .assign_study_roles(&center, study_id, level, registry_email)?;
        }
        Ok(())
    }
}
