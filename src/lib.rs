//! # lambars-task
//!
//! Lazy, composable computations that settle asynchronously to either a
//! failure or a success value.
//!
//! ## Overview
//!
//! A [`Task`] wraps a *fork* procedure and a *cleanup* procedure. Nothing runs
//! until [`Task::fork`] is called, and every call re-runs the underlying
//! effect. Operators build new tasks out of old ones:
//!
//! - **Sequential**: `map`, `chain`, `or_else`, `rejected_map`, `bimap`,
//!   `swap`, `fold`, `cata`
//! - **Parallel**: `ap` and the derived `map2`..`map10`, plus [`Task::parallel`]
//! - **Race**: `concat`, with [`Task::empty`] as its identity, plus [`Task::race`]
//!
//! Cleanup of parallel and raced branches is deferred through a
//! [`scheduler::Scheduler`], so a fork that settles before returning its
//! run-state is still cleaned up with the right [`RunState`].
//!
//! ## Feature Flags
//!
//! - `async` (default): tokio-backed scheduler, `Task::from_future` and
//!   `Task::into_future`
//!
//! ## Example
//!
//! ```rust
//! use lambars_task::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let task = Task::<String, i32>::of(20)
//!     .map(|x| x + 1)
//!     .map2(|a, b| a * b, Task::of(2));
//!
//! let result = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&result);
//! task.fork(|_error| {}, move |value| sink.set(value));
//! lambars_task::scheduler::run_until_idle();
//!
//! assert_eq!(result.get(), 42);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use lambars_task::prelude::*;
/// ```
pub mod prelude {
    pub use crate::task::{Pattern, Reject, Resolve, RunState, Task};
    pub use crate::typeclass::{Monoid, Semigroup};

    #[cfg(feature = "async")]
    pub use crate::task::{TaskError, TaskFuture};
}

pub mod scheduler;
pub mod task;
pub mod typeclass;

pub use task::{Pattern, Reject, Resolve, RunState, Task};

#[cfg(feature = "async")]
pub use task::{TaskError, TaskFuture};
