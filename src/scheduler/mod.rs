//! Deferred execution for cleanup work.
//!
//! `ap` and `concat` never run cleanup inline: a fork may settle before it
//! has returned its run-state, so the cleanup has to wait until the current
//! synchronous turn is over. This module is the seam that provides "later".
//!
//! - [`Scheduler`]: anything that accepts a [`Job`] and runs it after the
//!   current turn, preserving the order of jobs scheduled in the same turn
//! - [`MicrotaskQueue`]: a FIFO queue drained explicitly with
//!   [`MicrotaskQueue::run_until_idle`]
//! - `LocalSpawner` (feature `async`): runs jobs on the current tokio
//!   `LocalSet`
//!
//! Every thread owns a default [`MicrotaskQueue`]. It is drained when the
//! outermost [`turn`] on the thread ends, and every [`Task::fork`] is a turn,
//! so with no scheduler entered deferred cleanups run as soon as the
//! outermost fork returns. A different scheduler can be installed for a
//! scope with [`enter`]; draining it is then up to its owner.
//!
//! [`Task::fork`]: crate::Task::fork
//!
//! # Examples
//!
//! ```rust
//! use lambars_task::scheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let ran = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&ran);
//! scheduler::defer(move || flag.set(true));
//!
//! assert!(!ran.get());
//! assert_eq!(scheduler::run_until_idle(), 1);
//! assert!(ran.get());
//!
//! let flag = Rc::clone(&ran);
//! scheduler::turn(|| scheduler::defer(move || flag.set(false)));
//! assert!(!ran.get());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

mod microtask;

#[cfg(feature = "async")]
mod local;

pub use microtask::MicrotaskQueue;

#[cfg(feature = "async")]
pub use local::LocalSpawner;

/// A zero-argument procedure scheduled to run later.
pub type Job = Box<dyn FnOnce()>;

/// A deferred-execution primitive.
///
/// # Contract
///
/// - A scheduled job must not run before `schedule` returns.
/// - Jobs scheduled during the same turn run in the order they were scheduled.
pub trait Scheduler {
    /// Schedules `job` to run after the current synchronous execution.
    fn schedule(&self, job: Job);
}

thread_local! {
    static DEFAULT_QUEUE: MicrotaskQueue = MicrotaskQueue::new();
    static ENTERED: RefCell<Vec<Rc<dyn Scheduler>>> = const { RefCell::new(Vec::new()) };
    static TURN_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Returns the scheduler in effect on this thread.
///
/// This is the most recently [`enter`]ed scheduler, or the thread's default
/// [`MicrotaskQueue`] when none is entered.
pub fn current() -> Rc<dyn Scheduler> {
    ENTERED
        .with(|entered| entered.borrow().last().cloned())
        .unwrap_or_else(|| Rc::new(default_queue()))
}

/// Returns a handle to this thread's default queue.
pub fn default_queue() -> MicrotaskQueue {
    DEFAULT_QUEUE.with(Clone::clone)
}

/// Schedules `job` on the [`current`] scheduler.
pub fn defer<F>(job: F)
where
    F: FnOnce() + 'static,
{
    current().schedule(Box::new(job));
}

/// Drains this thread's default queue and returns how many jobs ran.
///
/// Jobs scheduled while draining are run as well.
pub fn run_until_idle() -> usize {
    default_queue().run_until_idle()
}

/// Runs `body` as a synchronous turn of this thread.
///
/// Turns nest. When the outermost one ends, the default queue is drained,
/// including jobs scheduled by the jobs it runs. Forking a task is a turn;
/// code that settles a task from outside any fork (an event callback, a
/// completion handler) can wrap the settlement in `turn` so the cleanups it
/// defers run right after it.
///
/// Jobs are not run if `body` panics.
///
/// # Examples
///
/// ```rust
/// use lambars_task::scheduler;
///
/// let pending = scheduler::turn(|| {
///     scheduler::defer(|| {});
///     scheduler::turn(|| scheduler::defer(|| {}));
///     scheduler::default_queue().len()
/// });
/// assert_eq!(pending, 2);
/// assert!(scheduler::default_queue().is_empty());
/// ```
pub fn turn<R, F>(body: F) -> R
where
    F: FnOnce() -> R,
{
    let depth = TurnDepth::enter();
    let result = body();
    if depth.is_outermost() {
        let executed = run_until_idle();
        if executed > 0 {
            tracing::trace!(executed, "turn ended");
        }
    }
    result
}

/// Tracks the nesting of [`turn`]s; restores the depth on drop, panics
/// included.
struct TurnDepth {
    outermost: bool,
}

impl TurnDepth {
    fn enter() -> Self {
        let previous = TURN_DEPTH.with(|depth| depth.replace(depth.get() + 1));
        Self {
            outermost: previous == 0,
        }
    }

    const fn is_outermost(&self) -> bool {
        self.outermost
    }
}

impl Drop for TurnDepth {
    fn drop(&mut self) {
        TURN_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Installs `scheduler` as the current scheduler of this thread.
///
/// The previous scheduler is restored when the returned guard is dropped.
/// Guards must be dropped in reverse order of creation.
///
/// # Examples
///
/// ```rust
/// use lambars_task::scheduler::{self, MicrotaskQueue};
/// use std::rc::Rc;
///
/// let queue = MicrotaskQueue::new();
/// {
///     let _guard = scheduler::enter(Rc::new(queue.clone()));
///     scheduler::defer(|| {});
/// }
/// assert_eq!(queue.len(), 1);
/// assert_eq!(scheduler::default_queue().len(), 0);
/// ```
#[must_use = "the scheduler is uninstalled as soon as the guard is dropped"]
pub fn enter(scheduler: Rc<dyn Scheduler>) -> SchedulerGuard {
    ENTERED.with(|entered| entered.borrow_mut().push(scheduler));
    SchedulerGuard { _private: () }
}

/// Keeps a scheduler installed; see [`enter`].
#[derive(Debug)]
pub struct SchedulerGuard {
    _private: (),
}

impl Drop for SchedulerGuard {
    fn drop(&mut self) {
        ENTERED.with(|entered| {
            entered.borrow_mut().pop();
        });
    }
}
