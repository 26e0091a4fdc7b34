//! Racing two tasks, and the task that never settles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::continuation::{CleanupFunction, OnceContinuation};
use super::parallel::{cleanup_both, defer_cleanup};
use super::{RunState, Task};
use crate::scheduler::{self, Scheduler};

impl<E: 'static, V: 'static> Task<E, V> {
    /// Races this task against `that`.
    ///
    /// Both are forked at once. The first settlement, failure or success,
    /// becomes the outcome; everything after it is ignored. When the first
    /// settlement arrives, cleanup of both run-states is deferred to the
    /// scheduler that was current at fork time. On the default queue it runs
    /// when the outermost [`scheduler::turn`](crate::scheduler::turn) ends.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::Task;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let fast: Task<(), &str> = Task::of("fast");
    /// let outcome = Rc::new(RefCell::new(None));
    /// let sink = Rc::clone(&outcome);
    /// fast.concat(Task::empty())
    ///     .fork_result(move |result| *sink.borrow_mut() = Some(result));
    /// assert_eq!(*outcome.borrow(), Some(Ok("fast")));
    /// assert!(lambars_task::scheduler::default_queue().is_empty());
    /// ```
    #[must_use]
    pub fn concat(self, that: Self) -> Self {
        let fork_this = self.fork;
        let fork_that = that.fork;
        let cleanup = cleanup_both(self.cleanup, that.cleanup);
        let composed_cleanup = Rc::clone(&cleanup);

        Self::from_parts(
            move |reject, resolve| {
                let race = Race {
                    scheduler: scheduler::current(),
                    cleanup: Rc::clone(&cleanup),
                    done: Rc::new(Cell::new(false)),
                    all_state: Rc::new(RefCell::new(RunState::none())),
                };
                let reject = OnceContinuation::new(reject);
                let resolve = OnceContinuation::new(resolve);

                let this_state = fork_this(
                    race.guard(&reject, "failure"),
                    race.guard(&resolve, "success"),
                );
                let that_state = fork_that(
                    race.guard(&reject, "failure"),
                    race.guard(&resolve, "success"),
                );

                let state = RunState::pair(this_state, that_state);
                *race.all_state.borrow_mut() = state.clone();
                state
            },
            composed_cleanup,
        )
    }

    /// A task that never settles.
    ///
    /// It drops both continuations and returns an empty run-state, so it can
    /// never win a race: `t.concat(Task::empty())` settles like `t`.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|_reject, _resolve| RunState::none())
    }
}

/// Per-fork bookkeeping of a race.
struct Race {
    scheduler: Rc<dyn Scheduler>,
    cleanup: CleanupFunction,
    done: Rc<Cell<bool>>,
    all_state: Rc<RefCell<RunState>>,
}

impl Race {
    /// Wraps an output continuation so only the first settlement of either
    /// branch reaches it.
    fn guard<A: 'static>(
        &self,
        continuation: &OnceContinuation<A>,
        channel: &'static str,
    ) -> Box<dyn FnOnce(A)> {
        let continuation = continuation.clone();
        let scheduler = Rc::clone(&self.scheduler);
        let cleanup = Rc::clone(&self.cleanup);
        let done = Rc::clone(&self.done);
        let all_state = Rc::clone(&self.all_state);
        Box::new(move |value| {
            if done.replace(true) {
                return;
            }
            tracing::trace!(channel, "race settled");
            defer_cleanup(&scheduler, &cleanup, &all_state);
            continuation.call(value);
        })
    }
}
