//! Disposal of inactive directory entries.

use tracing::{debug, info};

use claimsync_core::UserEntry;

use crate::error::PipelineResult;
use crate::queue::{EntryProcess, Queue};

/// Logs and discards entries the directory marked inactive.
#[derive(Debug, Default)]
pub struct InactiveProcess {
    dropped: usize,
}

impl InactiveProcess {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the inactive sub-queue.
    pub fn execute(mut self, queue: Queue<UserEntry>) -> PipelineResult<()> {
        queue.apply(&mut self)
    }
}

impl EntryProcess<UserEntry> for InactiveProcess {
    fn name(&self) -> &'static str {
        "inactive"
    }

    fn visit(&mut self, entry: UserEntry, _queue: &mut Queue<UserEntry>) -> PipelineResult<()> {
        debug!(email = %entry.email, "dropping inactive directory entry");
        self.dropped += 1;
        Ok(())
    }

    fn finalize(&mut self) -> PipelineResult<()> {
        info!(dropped = self.dropped, "inactive entries dropped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsync_core::{Adcid, PersonName, StudyAuthorizations};

    fn entry(email: &str) -> UserEntry {
        UserEntry {
            name: PersonName::new("In", "Active"),
            email: email.to_string(),
            active: false,
            organization: "Org".to_string(),
            adcid: Adcid::new(1),
            authorizations: StudyAuthorizations::new(),
        }
    }

    #[test]
    fn test_drains_without_side_effects() {
        let queue: Queue<UserEntry> = [entry("a@x.com"), entry("b@x.com")].into_iter().collect();
        InactiveProcess::new().execute(queue).unwrap();
    }
}
