//! Parallel join of two tasks.
//!
//! `ap` forks both inputs immediately and must produce exactly one outcome
//! whichever order (or turn) they settle in:
//!
//! - the first failure is forwarded and latches the join shut
//! - a success is recorded; the second recorded success delivers the result
//! - once both succeeded, cleanup of both run-states is deferred to the
//!   scheduler that was current at fork time, then the result is delivered
//!
//! When one side fails first, the other side's run-state is left as is: no
//! cleanup runs on the failure path.
//!
//! On the default queue the deferred cleanup runs when the outermost
//! [`scheduler::turn`] ends. A settlement delivered outside any turn stays
//! queued until [`scheduler::run_until_idle`] is called.

use std::cell::RefCell;
use std::rc::Rc;

use super::continuation::{CleanupFunction, OnceContinuation, Reject, Resolve};
use super::{RunState, Task};
use crate::scheduler::{self, Scheduler};

/// Per-fork bookkeeping of a join.
struct Join<F, A> {
    function: Option<F>,
    argument: Option<A>,
    settled: bool,
}

impl<F, A> Join<F, A> {
    const fn new() -> Self {
        Self {
            function: None,
            argument: None,
            settled: false,
        }
    }

    /// Closes the join for a failure. Returns `false` if it was already closed.
    fn latch(&mut self) -> bool {
        !std::mem::replace(&mut self.settled, true)
    }

    /// Closes the join and hands out both values once both have arrived.
    fn take_ready(&mut self) -> Option<(F, A)> {
        if self.settled || self.function.is_none() || self.argument.is_none() {
            return None;
        }
        self.settled = true;
        self.function.take().zip(self.argument.take())
    }
}

/// Builds the cleanup of a composed task from the cleanups of its branches.
///
/// The composed run-state is a [`RunState::pair`]; anything else is handed
/// to both branches as an empty run-state. A pair that was already released
/// is skipped, so nested joins release each branch once.
pub(crate) fn cleanup_both(first: CleanupFunction, second: CleanupFunction) -> CleanupFunction {
    Rc::new(move |state: RunState| {
        if !state.claim_release() {
            tracing::trace!(?state, "run-state already released");
            return;
        }
        match state.as_pair() {
            Some((first_state, second_state)) => {
                first(first_state.clone());
                second(second_state.clone());
            }
            None => {
                first(RunState::none());
                second(RunState::none());
            }
        }
    })
}

/// Defers `cleanup` of whatever run-state `slot` holds when the job runs.
pub(crate) fn defer_cleanup(
    scheduler: &Rc<dyn Scheduler>,
    cleanup: &CleanupFunction,
    slot: &Rc<RefCell<RunState>>,
) {
    let cleanup = Rc::clone(cleanup);
    let slot = Rc::clone(slot);
    scheduler.schedule(Box::new(move || {
        let state = slot.borrow().clone();
        tracing::trace!(?state, "running deferred cleanup");
        cleanup(state);
    }));
}

impl<E: 'static, F: 'static> Task<E, F> {
    /// Applies the function produced by this task to the value produced by
    /// `that`, running both concurrently.
    ///
    /// The result succeeds only once both inputs have succeeded. The first
    /// input to fail decides the failure, and any later outcome is ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::Task;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let increment: Task<String, fn(i32) -> i32> = Task::of(|x| x + 1);
    /// let seen = Rc::new(Cell::new(0));
    /// let sink = Rc::clone(&seen);
    /// increment
    ///     .ap(Task::of(41))
    ///     .fork(|_| {}, move |value| sink.set(value));
    /// assert_eq!(seen.get(), 42);
    /// assert!(lambars_task::scheduler::default_queue().is_empty());
    /// ```
    pub fn ap<A, B>(self, that: Task<E, A>) -> Task<E, B>
    where
        F: FnOnce(A) -> B,
        A: 'static,
        B: 'static,
    {
        let fork_this = self.fork;
        let fork_that = that.fork;
        let cleanup = cleanup_both(self.cleanup, that.cleanup);
        let composed_cleanup = Rc::clone(&cleanup);

        Task::from_parts(
            move |reject: Reject<E>, resolve: Resolve<B>| {
                let scheduler = scheduler::current();
                let join = Rc::new(RefCell::new(Join::<F, A>::new()));
                let all_state = Rc::new(RefCell::new(RunState::none()));
                let reject = OnceContinuation::new(reject);
                let resolve = OnceContinuation::new(resolve);

                let deliver = {
                    let cleanup = Rc::clone(&cleanup);
                    let all_state = Rc::clone(&all_state);
                    Rc::new(move |function: F, argument: A| {
                        tracing::trace!("both sides of ap resolved");
                        defer_cleanup(&scheduler, &cleanup, &all_state);
                        resolve.call(function(argument));
                    })
                };

                let guard_reject = |join: &Rc<RefCell<Join<F, A>>>| -> Reject<E> {
                    let join = Rc::clone(join);
                    let reject = reject.clone();
                    Box::new(move |error| {
                        let first = join.borrow_mut().latch();
                        if first {
                            tracing::trace!("ap latched on first failure");
                            reject.call(error);
                        }
                    })
                };

                let on_function: Resolve<F> = {
                    let join = Rc::clone(&join);
                    let deliver = Rc::clone(&deliver);
                    Box::new(move |function| {
                        let ready = {
                            let mut join = join.borrow_mut();
                            if join.settled {
                                return;
                            }
                            join.function = Some(function);
                            join.take_ready()
                        };
                        if let Some((function, argument)) = ready {
                            deliver(function, argument);
                        }
                    })
                };

                let on_argument: Resolve<A> = {
                    let join = Rc::clone(&join);
                    Box::new(move |argument| {
                        let ready = {
                            let mut join = join.borrow_mut();
                            if join.settled {
                                return;
                            }
                            join.argument = Some(argument);
                            join.take_ready()
                        };
                        if let Some((function, argument)) = ready {
                            deliver(function, argument);
                        }
                    })
                };

                let this_state = fork_this(guard_reject(&join), on_function);
                let that_state = fork_that(guard_reject(&join), on_argument);

                let state = RunState::pair(this_state, that_state);
                *all_state.borrow_mut() = state.clone();
                state
            },
            composed_cleanup,
        )
    }
}
