//! Destructive FIFO queue and the visitor seam between pipeline stages.
//!
//! A [`Queue`] is consumed exactly once by [`Queue::apply`]. Entry-scoped
//! errors raised inside a visit are logged at the apply boundary and do not
//! interrupt the remaining entries; internal errors abort the stage.

use std::collections::VecDeque;

use tracing::error;

use crate::error::PipelineResult;

/// Visitor that a queue feeds entries to, in enqueue order.
pub trait EntryProcess<T> {
    /// Label used when logging entry-scoped failures.
    fn name(&self) -> &'static str;

    /// Process one entry.
    ///
    /// The queue currently being drained is passed back in so a process can
    /// re-enqueue an entry onto its own input for a same-pass retry. The
    /// retry budget lives in the process, never in the queue.
    fn visit(&mut self, entry: T, queue: &mut Queue<T>) -> PipelineResult<()>;

    /// Called once after the queue is empty.
    fn finalize(&mut self) -> PipelineResult<()> {
        Ok(())
    }
}

/// A destructive FIFO container for one pipeline stage.
#[derive(Debug)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Appends an entry.
    pub fn enqueue(&mut self, entry: T) {
        self.items.push_back(entry);
    }

    /// Number of entries waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no entries are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drains the queue through a process, in enqueue order.
    ///
    /// Entry-scoped errors are logged and the next entry is processed;
    /// internal errors propagate. After the last entry the process
    /// finalization hook runs.
    pub fn apply<P: EntryProcess<T>>(mut self, process: &mut P) -> PipelineResult<()> {
        while let Some(entry) = self.items.pop_front() {
            if let Err(err) = process.visit(entry, &mut self) {
                if err.is_entry_scoped() {
                    error!(
                        process = process.name(),
                        code = err.error_code(),
                        error = %err,
                        "entry failed, continuing batch"
                    );
                } else {
                    return Err(err);
                }
            }
        }
        process.finalize()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    struct Recorder {
        visited: Vec<u32>,
        fail_on: Vec<u32>,
        finalized: bool,
    }

    impl Recorder {
        fn new(fail_on: Vec<u32>) -> Self {
            Self {
                visited: Vec::new(),
                fail_on,
                finalized: false,
            }
        }
    }

    impl EntryProcess<u32> for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn visit(&mut self, entry: u32, _queue: &mut Queue<u32>) -> PipelineResult<()> {
            self.visited.push(entry);
            if self.fail_on.contains(&entry) {
                return Err(PipelineError::validation(format!("entry {entry}")));
            }
            Ok(())
        }

        fn finalize(&mut self) -> PipelineResult<()> {
            self.finalized = true;
            Ok(())
        }
    }

    #[test]
    fn test_apply_visits_in_enqueue_order() {
        let queue: Queue<u32> = [1, 2, 3].into_iter().collect();
        let mut process = Recorder::new(vec![]);
        queue.apply(&mut process).unwrap();
        assert_eq!(process.visited, vec![1, 2, 3]);
        assert!(process.finalized);
    }

    #[test]
    fn test_entry_scoped_error_does_not_stop_batch() {
        let queue: Queue<u32> = [1, 2, 3, 4].into_iter().collect();
        let mut process = Recorder::new(vec![2, 3]);
        queue.apply(&mut process).unwrap();
        // Every entry is visited exactly once despite two failures.
        assert_eq!(process.visited, vec![1, 2, 3, 4]);
        assert!(process.finalized);
    }

    #[test]
    fn test_internal_error_aborts_stage() {
        struct Fails;
        impl EntryProcess<u32> for Fails {
            fn name(&self) -> &'static str {
                "fails"
            }
            fn visit(&mut self, entry: u32, _queue: &mut Queue<u32>) -> PipelineResult<()> {
                if entry == 2 {
                    return Err(PipelineError::internal("broken"));
                }
                Ok(())
            }
        }

        let queue: Queue<u32> = [1, 2, 3].into_iter().collect();
        let err = queue.apply(&mut Fails).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_same_pass_re_enqueue() {
        struct RetryOnce {
            visits: Vec<u32>,
        }
        impl EntryProcess<u32> for RetryOnce {
            fn name(&self) -> &'static str {
                "retry-once"
            }
            fn visit(&mut self, entry: u32, queue: &mut Queue<u32>) -> PipelineResult<()> {
                let first_visit = !self.visits.contains(&entry);
                self.visits.push(entry);
                if first_visit {
                    queue.enqueue(entry);
                }
                Ok(())
            }
        }

        let queue: Queue<u32> = [7, 8].into_iter().collect();
        let mut process = RetryOnce { visits: Vec::new() };
        queue.apply(&mut process).unwrap();
        // Retried entries land behind the rest of the batch.
        assert_eq!(process.visits, vec![7, 8, 7, 8]);
    }

    #[test]
    fn test_enqueue_and_len() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());
        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(queue.len(), 2);
    }
}
