//! Continuation types shared by every task operator.

use std::cell::RefCell;
use std::rc::Rc;

use super::RunState;

/// The failure continuation handed to a fork.
pub type Reject<E> = Box<dyn FnOnce(E)>;

/// The success continuation handed to a fork.
pub type Resolve<V> = Box<dyn FnOnce(V)>;

/// A re-runnable fork procedure.
pub(crate) type ForkFunction<E, V> = Rc<dyn Fn(Reject<E>, Resolve<V>) -> RunState>;

/// A cleanup procedure for the run-state returned by a fork.
pub(crate) type CleanupFunction = Rc<dyn Fn(RunState)>;

/// A shared, take-once holder for a continuation.
type ContinuationHolder<A> = Rc<RefCell<Option<Box<dyn FnOnce(A)>>>>;

/// A continuation that may be handed to several places but fires at most once.
///
/// Operators that pass the same output continuation to more than one fork
/// (or to both the outer and the inner fork of `chain`) share it through
/// this type. The first call takes the continuation out of the holder; later
/// calls are ignored.
pub(crate) struct OnceContinuation<A> {
    holder: ContinuationHolder<A>,
}

impl<A: 'static> OnceContinuation<A> {
    pub(crate) fn new(continuation: Box<dyn FnOnce(A)>) -> Self {
        Self {
            holder: Rc::new(RefCell::new(Some(continuation))),
        }
    }

    /// Invokes the continuation unless it already fired.
    ///
    /// The holder is released before the continuation runs, so the
    /// continuation may re-enter the operator that owns this holder.
    pub(crate) fn call(&self, value: A) -> bool {
        let continuation = self.holder.borrow_mut().take();
        continuation.is_some_and(|continuation| {
            continuation(value);
            true
        })
    }

    /// Returns a boxed continuation forwarding to this one.
    pub(crate) fn boxed(&self) -> Box<dyn FnOnce(A)> {
        let this = self.clone();
        Box::new(move |value| {
            this.call(value);
        })
    }
}

impl<A> Clone for OnceContinuation<A> {
    fn clone(&self) -> Self {
        Self {
            holder: Rc::clone(&self.holder),
        }
    }
}
