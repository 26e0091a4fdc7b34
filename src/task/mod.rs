//! The `Task` type: a lazy computation with a failure and a success channel.
//!
//! A [`Task<E, V>`] wraps a fork procedure that, given a failure continuation
//! (`E -> ()`) and a success continuation (`V -> ()`), starts the computation
//! and returns a [`RunState`]. The optional cleanup procedure releases
//! whatever that run-state represents.
//!
//! # Laziness
//!
//! Building a task, including through any operator, never runs it. Only
//! [`Task::fork`] does, and every call runs the effect again: there is no
//! memoization.
//!
//! # Settlement
//!
//! Each fork settles at most once: it calls at most one of its two
//! continuations, at most once. Ownership enforces "at most once" per
//! channel (continuations are `FnOnce`); operators that join several forks
//! additionally guard against more than one settlement reaching their output.
//!
//! # Examples
//!
//! ```rust
//! use lambars_task::Task;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let task: Task<String, i32> = Task::of(10)
//!     .chain(|x| if x > 5 { Task::of(x * 2) } else { Task::rejected("too small".into()) })
//!     .map(|x| x + 1);
//!
//! let outcome = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&outcome);
//! task.fork_result(move |result| *sink.borrow_mut() = Some(result));
//! assert_eq!(*outcome.borrow(), Some(Ok(21)));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::scheduler;

mod arity;
mod collection;
mod continuation;
mod parallel;
mod race;
mod run_state;
mod sequential;

#[cfg(feature = "async")]
mod error;
#[cfg(feature = "async")]
mod future;

pub use continuation::{Reject, Resolve};
pub use run_state::RunState;
pub use sequential::Pattern;

#[cfg(feature = "async")]
pub use error::TaskError;
#[cfg(feature = "async")]
pub use future::TaskFuture;

use continuation::{CleanupFunction, ForkFunction};

/// A deferred computation that settles to a failure `E` or a success `V`.
///
/// Cloning a task is cheap: clones share the same fork and cleanup
/// procedures, and forking any of them runs the computation independently.
///
/// # Laws
///
/// `Task` forms a functor and a monad over its success channel:
///
/// - **Identity**: `t.map(|x| x)` settles like `t`
/// - **Composition**: `t.map(f).map(g)` settles like `t.map(|x| g(f(x)))`
/// - **Left Identity**: `Task::of(a).chain(f)` settles like `f(a)`
/// - **Right Identity**: `t.chain(Task::of)` settles like `t`
///
/// and a monoid under [`concat`](Task::concat) with [`empty`](Task::empty)
/// as identity.
pub struct Task<E, V> {
    fork: ForkFunction<E, V>,
    cleanup: CleanupFunction,
}

static_assertions::assert_not_impl_any!(Task<i32, i32>: Send, Sync);

impl<E: 'static, V: 'static> Task<E, V> {
    /// Creates a task from a fork procedure with a no-op cleanup.
    ///
    /// The procedure runs every time the task is forked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::{RunState, Task};
    ///
    /// let task: Task<(), &str> = Task::new(|_reject, resolve| {
    ///     resolve("done");
    ///     RunState::none()
    /// });
    /// ```
    pub fn new<F>(fork: F) -> Self
    where
        F: Fn(Reject<E>, Resolve<V>) -> RunState + 'static,
    {
        Self::with_cleanup(fork, |_| {})
    }

    /// Creates a task from a fork procedure and a cleanup procedure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::{RunState, Task};
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let released = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&released);
    /// let task: Task<(), u32> = Task::with_cleanup(
    ///     |_reject, resolve| {
    ///         resolve(1);
    ///         RunState::new(17_u32)
    ///     },
    ///     move |state| counter.set(*state.downcast_ref::<u32>().unwrap()),
    /// );
    ///
    /// let state = task.fork(|_| {}, |_| {});
    /// task.cleanup(state);
    /// assert_eq!(released.get(), 17);
    /// ```
    pub fn with_cleanup<F, C>(fork: F, cleanup: C) -> Self
    where
        F: Fn(Reject<E>, Resolve<V>) -> RunState + 'static,
        C: Fn(RunState) + 'static,
    {
        Self {
            fork: Rc::new(fork),
            cleanup: Rc::new(cleanup),
        }
    }

    /// Builds a task around an existing cleanup procedure.
    pub(crate) fn from_parts<F>(fork: F, cleanup: CleanupFunction) -> Self
    where
        F: Fn(Reject<E>, Resolve<V>) -> RunState + 'static,
    {
        Self {
            fork: Rc::new(fork),
            cleanup,
        }
    }

    /// Creates a task that succeeds with `value` as soon as it is forked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::Task;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let seen = Rc::new(Cell::new(0));
    /// let sink = Rc::clone(&seen);
    /// Task::<(), i32>::of(42).fork(|_| {}, move |value| sink.set(value));
    /// assert_eq!(seen.get(), 42);
    /// ```
    pub fn of(value: V) -> Self
    where
        V: Clone,
    {
        Self::new(move |_reject, resolve| {
            resolve(value.clone());
            RunState::none()
        })
    }

    /// Alias for [`of`](Self::of).
    #[inline]
    pub fn resolve(value: V) -> Self
    where
        V: Clone,
    {
        Self::of(value)
    }

    /// Creates a task that fails with `error` as soon as it is forked.
    pub fn rejected(error: E) -> Self
    where
        E: Clone,
    {
        Self::new(move |reject, _resolve| {
            reject(error.clone());
            RunState::none()
        })
    }

    /// Creates a task that settles on the channel matching `result`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::Task;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let outcome = Rc::new(RefCell::new(None));
    /// let sink = Rc::clone(&outcome);
    /// Task::<&str, i32>::from_result(Err("boom"))
    ///     .fork_result(move |result| *sink.borrow_mut() = Some(result));
    /// assert_eq!(*outcome.borrow(), Some(Err("boom")));
    /// ```
    pub fn from_result(result: Result<V, E>) -> Self
    where
        E: Clone,
        V: Clone,
    {
        match result {
            Ok(value) => Self::of(value),
            Err(error) => Self::rejected(error),
        }
    }

    /// Runs the computation.
    ///
    /// Exactly one of the continuations is called, at most once, whenever
    /// the computation settles (possibly before this method returns). The
    /// returned run-state can be passed to [`cleanup`](Self::cleanup).
    ///
    /// The fork runs as a [`scheduler::turn`](crate::scheduler::turn): if it
    /// is the outermost one on this thread, cleanups deferred to the default
    /// queue while it ran are executed before it returns.
    pub fn fork<R, S>(&self, on_failure: R, on_success: S) -> RunState
    where
        R: FnOnce(E) + 'static,
        S: FnOnce(V) + 'static,
    {
        scheduler::turn(|| (self.fork)(Box::new(on_failure), Box::new(on_success)))
    }

    /// Runs the computation, reporting its outcome as a `Result`.
    pub fn fork_result<F>(&self, callback: F) -> RunState
    where
        F: FnOnce(Result<V, E>) + 'static,
    {
        let callback = continuation::OnceContinuation::new(Box::new(callback));
        let on_failure = callback.clone();
        scheduler::turn(|| {
            (self.fork)(
                Box::new(move |error| {
                    on_failure.call(Err(error));
                }),
                Box::new(move |value| {
                    callback.call(Ok(value));
                }),
            )
        })
    }

    /// Releases the resources behind a run-state returned by [`fork`](Self::fork).
    pub fn cleanup(&self, state: RunState) {
        (self.cleanup)(state);
    }
}

impl<E, V> Clone for Task<E, V> {
    fn clone(&self) -> Self {
        Self {
            fork: Rc::clone(&self.fork),
            cleanup: Rc::clone(&self.cleanup),
        }
    }
}

impl<E, V> fmt::Display for Task<E, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Task")
    }
}

impl<E, V> fmt::Debug for Task<E, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Task").finish_non_exhaustive()
    }
}
