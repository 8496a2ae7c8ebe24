//! Entry point stage: splits the directory snapshot by active flag.

use tracing::{debug, warn};

use claimsync_core::{ActiveUserEntry, DirectoryRecord, UserEntry};

use crate::config::ReconcileConfig;
use crate::error::PipelineResult;
use crate::events::EventCollector;
use crate::queue::{EntryProcess, Queue};
use crate::traits::PipelineEnv;

use super::active::ActiveProcess;
use super::inactive::InactiveProcess;

/// Routes directory records into the active and inactive branches.
pub struct TopProcess<'a> {
    env: PipelineEnv<'a>,
    events: &'a EventCollector,
    config: &'a ReconcileConfig,
    active: Queue<ActiveUserEntry>,
    inactive: Queue<UserEntry>,
}

impl<'a> TopProcess<'a> {
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
            active: Queue::new(),
            inactive: Queue::new(),
        }
    }

    /// Splits the input queue, then drives the active branch to completion
    /// followed by the inactive branch.
    pub fn execute(mut self, queue: Queue<DirectoryRecord>) -> PipelineResult<()> {
        queue.apply(&mut self)?;

        let Self {
            env,
            events,
            config,
            active,
            inactive,
        } = self;
        ActiveProcess::new(env, events, config).execute(active)?;
        InactiveProcess::new().execute(inactive)
    }
}

impl EntryProcess<DirectoryRecord> for TopProcess<'_> {
    fn name(&self) -> &'static str {
        "top"
    }

    fn visit(
        &mut self,
        record: DirectoryRecord,
        _queue: &mut Queue<DirectoryRecord>,
    ) -> PipelineResult<()> {
        if !record.is_active() {
            debug!(email = %record.entry().email, "routing entry to inactive branch");
            self.inactive.enqueue(record.into_entry());
            return Ok(());
        }

        match record {
            // The active stage owns the missing-auth-email event.
            DirectoryRecord::Active(active) => self.active.enqueue(active),
            DirectoryRecord::Plain(entry) => {
                // Directory data-quality issue handled upstream; not reportable here.
                warn!(
                    email = %entry.email,
                    "active directory record carries no authentication email, dropping"
                );
            }
        }
        Ok(())
    }
}
