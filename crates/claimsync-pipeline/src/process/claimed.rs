//! Account-existence stage for claimed entries.
//!
//! Ensures a platform account exists for every claimed person, retrying
//! failed creations within the same pass up to the configured budget. The
//! attempt counter is keyed by registry id and owned by this process
//! instance, so it resets every run.

use std::collections::HashMap;

use tracing::{debug, error, instrument, warn};

use claimsync_core::{RegisteredUserEntry, RegistryId};

use crate::analyzer::FailureAnalyzer;
use crate::config::ReconcileConfig;
use crate::error::PipelineResult;
use crate::events::EventCollector;
use crate::queue::{EntryProcess, Queue};
use crate::traits::{PipelineEnv, PlatformUser};

use super::created::CreatedProcess;
use super::update::UpdateProcess;

/// Ensures platform accounts exist for claimed entries, then hands off to
/// the created and update stages.
pub struct ClaimedProcess<'a> {
    env: PipelineEnv<'a>,
    events: &'a EventCollector,
    config: &'a ReconcileConfig,
    /// Creation failures per registry id, this run only.
    attempts: HashMap<RegistryId, u32>,
    created: Queue<RegisteredUserEntry>,
    update: Queue<RegisteredUserEntry>,
}

impl<'a> ClaimedProcess<'a> {
    /// Creates the stage with a fresh attempt counter.
    #[must_use]
    pub fn new(
        env: PipelineEnv<'a>,
        events: &'a EventCollector,
        config: &'a ReconcileConfig,
    ) -> Self {
        Self {
            env,
            events,
            config,
            attempts: HashMap::new(),
            created: Queue::new(),
            update: Queue::new(),
        }
    }

    /// Drains the claimed sub-queue, then runs the created and update stages
    /// over the accounts this pass touched.
    pub fn execute(mut self, queue: Queue<RegisteredUserEntry>) -> PipelineResult<()> {
        queue.apply(&mut self)?;

        let Self {
            env,
            events,
            created,
            update,
            ..
        } = self;
        CreatedProcess::new(env, events).execute(created)?;
        UpdateProcess::new(env, events).execute(update)
    }

    /// Attempts account creation, counting failures against the retry
    /// budget. Returns whether the entry should proceed to verification.
    fn create_account(
        &mut self,
        entry: &RegisteredUserEntry,
        queue: &mut Queue<RegisteredUserEntry>,
    ) -> PipelineResult<bool> {
        let user = PlatformUser::from_entry(entry);
        match self.env.platform.add_user(&user) {
            Ok(account_id) => {
                debug!(account_id = %account_id, "created platform account");
                self.created.enqueue(entry.clone());
                Ok(true)
            }
            Err(err) => {
                let counter = self.attempts.entry(entry.registry_id.clone()).or_insert(0);
                *counter += 1;
                let attempts = *counter;

                if attempts >= self.config.max_creation_attempts {
                    error!(
                        attempts = attempts,
                        error = %err,
                        "account creation failed, retry budget exhausted"
                    );
                    let finding = FailureAnalyzer::new(self.env)
                        .account_creation_failure(entry, &err, attempts);
                    let events = self.events;
                    finding.resolve(|event| events.collect(event))?;
                } else {
                    warn!(
                        attempt = attempts,
                        error = %err,
                        "account creation failed, retrying in this pass"
                    );
                    queue.enqueue(entry.clone());
                }
                Ok(false)
            }
        }
    }
}

impl EntryProcess<RegisteredUserEntry> for ClaimedProcess<'_> {
    fn name(&self) -> &'static str {
        "claimed"
    }

    #[instrument(skip(self, entry, queue), fields(registry_id = %entry.registry_id))]
    fn visit(
        &mut self,
        entry: RegisteredUserEntry,
        queue: &mut Queue<RegisteredUserEntry>,
    ) -> PipelineResult<()> {
        if self.env.platform.find_user(&entry.registry_id)?.is_none() {
            if !self.create_account(&entry, queue)? {
                return Ok(());
            }

            // Verify the account actually landed before updating it.
            if self.env.platform.find_user(&entry.registry_id)?.is_none() {
                warn!("account not found immediately after creation, skipping update");
                return Ok(());
            }
        }

        self.update.enqueue(entry);
        Ok(())
    }
}
