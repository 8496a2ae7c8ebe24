//! Reminder stage for registered-but-unclaimed persons.

use chrono::{DateTime, Utc};
use tracing::debug;

use claimsync_core::ActiveUserEntry;

use crate::error::PipelineResult;
use crate::events::{Event, EventCategory, EventCollector, EventUser};
use crate::queue::{EntryProcess, Queue};
use crate::traits::PipelineEnv;

/// An active entry whose registry persons exist but are all unclaimed,
/// paired with the most recent registry creation date.
#[derive(Debug, Clone)]
pub struct PendingClaim {
    /// The directory entry, unchanged from the active stage.
    pub entry: ActiveUserEntry,
    /// Most recent creation date across the person's registry records.
    pub registered_at: DateTime<Utc>,
}

/// Sends a claim reminder and records how long the claim has been pending.
pub struct UnclaimedProcess<'a> {
    env: PipelineEnv<'a>,
    events: &'a EventCollector,
}

impl<'a> UnclaimedProcess<'a> {
    /// Creates the stage.
    #[must_use]
    pub fn new(env: PipelineEnv<'a>, events: &'a EventCollector) -> Self {
        Self { env, events }
    }

    /// Drains the unclaimed sub-queue.
    pub fn execute(mut self, queue: Queue<PendingClaim>) -> PipelineResult<()> {
        queue.apply(&mut self)
    }
}

impl EntryProcess<PendingClaim> for UnclaimedProcess<'_> {
    fn name(&self) -> &'static str {
        "unclaimed"
    }

    fn visit(
        &mut self,
        pending: PendingClaim,
        _queue: &mut Queue<PendingClaim>,
    ) -> PipelineResult<()> {
        self.env.notifier.send_followup_claim_email(&pending.entry)?;

        let days = (Utc::now() - pending.registered_at).num_days().max(0);
        debug!(
            email = %pending.entry.entry.email,
            days_since_registration = days,
            "sent claim reminder"
        );

        self.events.collect(Event::new(
            EventCategory::UnclaimedRecords,
            EventUser::from(&pending.entry),
            format!("registered {days} days ago without completing claim"),
        ));
        Ok(())
    }
}
