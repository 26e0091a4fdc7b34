//! Algebraic type classes implemented by [`Task`](crate::Task).
//!
//! - [`Semigroup`]: associative binary operation (`combine`), which is
//!   [`Task::concat`](crate::Task::concat) for tasks
//! - [`Monoid`]: a semigroup with an identity element (`empty`), which is
//!   [`Task::empty`](crate::Task::empty) for tasks

mod monoid;
mod semigroup;

pub use monoid::Monoid;
pub use semigroup::Semigroup;
