//! Announcement stage for newly created platform accounts.

use tracing::info;

use claimsync_core::RegisteredUserEntry;

use crate::error::PipelineResult;
use crate::events::{Event, EventCategory, EventCollector, EventUser};
use crate::queue::{EntryProcess, Queue};
use crate::traits::PipelineEnv;

/// Sends the account-created notification and records the success.
pub struct CreatedProcess<'a> {
    env: PipelineEnv<'a>,
    events: &'a EventCollector,
}

impl<'a> CreatedProcess<'a> {
    /// Creates the stage.
    #[must_use]
    pub fn new(env: PipelineEnv<'a>, events: &'a EventCollector) -> Self {
        Self { env, events }
    }

    /// Drains the created sub-queue.
    pub fn execute(mut self, queue: Queue<RegisteredUserEntry>) -> PipelineResult<()> {
        queue.apply(&mut self)
    }
}

impl EntryProcess<RegisteredUserEntry> for CreatedProcess<'_> {
    fn name(&self) -> &'static str {
        "created"
    }

    fn visit(
        &mut self,
        entry: RegisteredUserEntry,
        _queue: &mut Queue<RegisteredUserEntry>,
    ) -> PipelineResult<()> {
        self.env.notifier.send_creation_email(&entry)?;
        info!(
            email = %entry.entry().email,
            registry_id = %entry.registry_id,
            "platform account created"
        );

        self.events.collect(Event::new(
            EventCategory::AccountCreated,
            EventUser::from(&entry),
            "platform account created",
        ));
        Ok(())
    }
}
