//! Registry resolution stage for active directory entries.
//!
//! Resolves each entry against the identity registry and splits the branch
//! into claimed and unclaimed sub-queues, provisioning a brand-new registry
//! person when the email is unknown there.

use std::collections::BTreeSet;

use tracing::{debug, error, info, instrument, warn};

use claimsync_core::{ActiveUserEntry, RegisteredUserEntry, RegistryId, RegistryPerson};

use crate::config::ReconcileConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::events::{Event, EventCategory, EventCollector, EventUser};
use crate::queue::{EntryProcess, Queue};
use crate::traits::PipelineEnv;

use super::claimed::ClaimedProcess;
use super::unclaimed::{PendingClaim, UnclaimedProcess};

/// Splits active entries into claimed and unclaimed branches.
pub struct ActiveProcess<'a> {
    env: PipelineEnv<'a>,
    events: &'a EventCollector,
    config: &'a ReconcileConfig,
    claimed: Queue<RegisteredUserEntry>,
    unclaimed: Queue<PendingClaim>,
}

impl<'a> ActiveProcess<'a> {
    /// Creates the stage.
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
            claimed: Queue::new(),
            unclaimed: Queue::new(),
        }
    }

    /// Drains the active sub-queue, then runs the claimed and unclaimed
    /// branches to completion.
    pub fn execute(mut self, queue: Queue<ActiveUserEntry>) -> PipelineResult<()> {
        queue.apply(&mut self)?;

        let Self {
            env,
            events,
            config,
            claimed,
            unclaimed,
        } = self;
        ClaimedProcess::new(env, events, config).execute(claimed)?;
        UnclaimedProcess::new(env, events).execute(unclaimed)
    }

    /// Handles an auth email the registry does not know: either a claim made
    /// under a different identity, or a person to provision.
    fn resolve_unknown_email(&mut self, entry: &ActiveUserEntry) -> PipelineResult<()> {
        let full_name = entry.full_name();
        let bad_claims = self.env.registry.get_bad_claim(&full_name)?;
        if !bad_claims.is_empty() {
            warn!(
                name = %full_name,
                "registry claim exists under a different identity"
            );
            self.events.collect(Event::new(
                EventCategory::BadOrcidClaims,
                EventUser::from(entry),
                "incomplete claim",
            ));
            return Ok(());
        }

        let auth_email = entry.auth_email().unwrap_or_default();
        let person = RegistryPerson::provisional(entry.entry.name.clone(), auth_email);
        let identifiers = self.env.registry.add(&person)?;
        debug!(identifiers = identifiers.len(), "added registry person");

        self.env.notifier.send_claim_email(entry)?;
        info!(
            email = %entry.entry.email,
            "provisioned registry person and sent claim invitation"
        );
        Ok(())
    }
}

impl EntryProcess<ActiveUserEntry> for ActiveProcess<'_> {
    fn name(&self) -> &'static str {
        "active"
    }

    #[instrument(skip(self, entry, _queue), fields(email = %entry.entry.email))]
    fn visit(
        &mut self,
        entry: ActiveUserEntry,
        _queue: &mut Queue<ActiveUserEntry>,
    ) -> PipelineResult<()> {
        if entry.auth_email().is_none() {
            warn!("no authentication email in directory");
            self.events.collect(Event::new(
                EventCategory::MissingDirectoryData,
                EventUser::from(&entry),
                "no authentication email in directory",
            ));
            return Ok(());
        }

        let persons = self.env.registry.get(entry.auth_email().unwrap_or_default())?;
        if persons.is_empty() {
            return self.resolve_unknown_email(&entry);
        }

        let Some(registered_at) = persons.iter().filter_map(|p| p.created_at).max() else {
            // Locally-created provisional records carry no creation date.
            warn!("registry persons carry no creation date, skipping entry");
            return Ok(());
        };

        let claimed: Vec<&RegistryPerson> = persons
            .iter()
            .filter(|p| p.is_claimed(&self.config.trusted_issuer))
            .collect();

        if claimed.is_empty() {
            self.unclaimed.enqueue(PendingClaim {
                entry,
                registered_at,
            });
            return Ok(());
        }

        let ids: BTreeSet<&str> = claimed
            .iter()
            .map(|p| p.registry_id.as_ref().map_or("", RegistryId::as_str))
            .collect();
        if ids.len() > 1 {
            error!("claimed registry persons disagree on registry id");
            return Ok(());
        }

        let id = ids.into_iter().next().unwrap_or_default();
        if id.is_empty() {
            self.events.collect(Event::new(
                EventCategory::MissingRegistryData,
                EventUser::from(&entry),
                "claimed registry record has no registry id",
            ));
            return Ok(());
        }

        let registry_id = RegistryId::new(id);
        let registered = RegisteredUserEntry::new(entry, registry_id)
            .map_err(|e| PipelineError::validation(e.to_string()))?;
        self.claimed.enqueue(registered);
        Ok(())
    }
}
