//! Semigroup type class - types with an associative binary operation.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! For [`Task`], "==" means "settles the same way": `combine` is
//! [`Task::concat`], so `a.combine(b)` is whichever of `a` and `b` settles
//! first.

use crate::task::Task;

/// A type class for types with an associative binary operation.
///
/// # Examples
///
/// ```rust
/// use lambars_task::Task;
/// use lambars_task::typeclass::Semigroup;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let first: Task<(), i32> = Task::of(1);
/// let raced = first.combine(Task::of(2));
///
/// let seen = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&seen);
/// raced.fork(|_| {}, move |value| sink.set(value));
/// assert_eq!(seen.get(), 1);
/// # lambars_task::scheduler::run_until_idle();
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    ///
    /// This operation must be associative.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Reduces all elements in an iterator using the semigroup operation.
    ///
    /// Returns `None` if the iterator is empty.
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}

// =============================================================================
// Task Implementation
// =============================================================================

impl<E: 'static, V: 'static> Semigroup for Task<E, V> {
    fn combine(self, other: Self) -> Self {
        self.concat(other)
    }
}
