//! Run facade tying the stages together.

use tracing::{info, instrument};

use claimsync_core::DirectoryRecord;

use crate::config::ReconcileConfig;
use crate::error::PipelineResult;
use crate::events::EventCollector;
use crate::process::TopProcess;
use crate::queue::Queue;
use crate::traits::PipelineEnv;

/// One-shot reconciliation of a directory snapshot against the registry and
/// the platform.
///
/// Holds no state between runs; every run recomputes its decisions from the
/// then-current external state.
pub struct DirectoryReconciler<'a> {
    env: PipelineEnv<'a>,
    config: ReconcileConfig,
}

impl<'a> DirectoryReconciler<'a> {
    /// Creates a reconciler with default configuration.
    #[must_use]
    pub fn new(env: PipelineEnv<'a>) -> Self {
        Self {
            env,
            config: ReconcileConfig::default(),
        }
    }

    /// Overrides the run configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReconcileConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs one reconciliation pass over a directory snapshot.
    ///
    /// Returns the populated event collector for reporting. A single entry's
    /// failure never aborts the run; only broken pipeline invariants do.
    ///
    /// # Errors
    ///
    /// Returns an error only for internal (non-entry-scoped) failures.
    #[instrument(skip(self, records))]
    pub fn run(
        &self,
        records: impl IntoIterator<Item = DirectoryRecord>,
    ) -> PipelineResult<EventCollector> {
        let events = EventCollector::new();
        let queue: Queue<DirectoryRecord> = records.into_iter().collect();
        info!(entries = queue.len(), "starting reconciliation run");

        TopProcess::new(self.env, &events, &self.config).execute(queue)?;

        info!(
            events = events.len(),
            errors = events.error_count(),
            "reconciliation run complete"
        );
        Ok(events)
    }
}
