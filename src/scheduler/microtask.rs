use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::{Job, Scheduler};

/// A FIFO queue of deferred jobs.
///
/// Cloning produces another handle to the same queue. Nothing runs until
/// [`run_until_idle`](Self::run_until_idle) is called, which makes the
/// queue a deterministic stand-in for an event loop in tests.
///
/// # Invariants
///
/// - Jobs run in the order they were scheduled.
/// - The queue is not borrowed while a job runs, so jobs may schedule
///   further jobs.
#[derive(Clone, Default)]
pub struct MicrotaskQueue {
    jobs: Rc<RefCell<VecDeque<Job>>>,
}

impl MicrotaskQueue {
    /// Creates a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Returns `true` if no job is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.borrow().is_empty()
    }

    /// Runs pending jobs until the queue is empty and returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut executed = 0;
        loop {
            let next = self.jobs.borrow_mut().pop_front();
            let Some(job) = next else { break };
            job();
            executed += 1;
        }
        if executed > 0 {
            tracing::trace!(executed, "microtask queue drained");
        }
        executed
    }
}

impl Scheduler for MicrotaskQueue {
    fn schedule(&self, job: Job) {
        self.jobs.borrow_mut().push_back(job);
    }
}

impl fmt::Debug for MicrotaskQueue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MicrotaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}
