use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// The opaque value a fork returns.
///
/// A run-state usually carries a handle that the task's cleanup uses to
/// release a resource (a timer, a spawned job, a connection). The task
/// abstraction itself never looks inside it. Composed tasks (`ap`,
/// `concat`) return a [`pair`](Self::pair) of their branches' run-states.
/// A pair is released at most once, however many composed cleanups reach it.
///
/// Cloning is cheap and shares the underlying handle.
///
/// # Examples
///
/// ```rust
/// use lambars_task::RunState;
///
/// let state = RunState::new(7_u32);
/// assert_eq!(state.downcast_ref::<u32>(), Some(&7));
/// assert!(state.downcast_ref::<i64>().is_none());
///
/// let both = RunState::pair(state, RunState::none());
/// let (first, second) = both.as_pair().unwrap();
/// assert_eq!(first.downcast_ref::<u32>(), Some(&7));
/// assert!(second.is_none());
/// ```
#[derive(Clone, Default)]
pub struct RunState {
    inner: Inner,
}

#[derive(Clone, Default)]
enum Inner {
    #[default]
    None,
    Handle(Rc<dyn Any>),
    Pair(Rc<Joined>),
}

/// The run-states of two branches forked together by one fork.
struct Joined {
    first: RunState,
    second: RunState,
    released: Cell<bool>,
}

impl RunState {
    /// A run-state that holds nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Wraps an arbitrary handle.
    #[must_use]
    pub fn new<T: Any>(handle: T) -> Self {
        Self {
            inner: Inner::Handle(Rc::new(handle)),
        }
    }

    /// Combines the run-states of two concurrently forked branches.
    #[must_use]
    pub fn pair(first: Self, second: Self) -> Self {
        Self {
            inner: Inner::Pair(Rc::new(Joined {
                first,
                second,
                released: Cell::new(false),
            })),
        }
    }

    /// Returns `true` if this run-state holds nothing.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.inner, Inner::None)
    }

    /// Returns the handle if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.inner {
            Inner::Handle(handle) => handle.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns both halves if this run-state was built with [`pair`](Self::pair).
    #[must_use]
    pub fn as_pair(&self) -> Option<(&Self, &Self)> {
        match &self.inner {
            Inner::Pair(pair) => Some((&pair.first, &pair.second)),
            _ => None,
        }
    }

    /// Marks a pair as released. Returns `false` if it already was.
    ///
    /// Nested joins hand the same inner pair to more than one cleanup: the
    /// inner join's own deferred cleanup and the outer join's. Only the
    /// first of them may release the branches.
    pub(crate) fn claim_release(&self) -> bool {
        match &self.inner {
            Inner::Pair(pair) => !pair.released.replace(true),
            _ => true,
        }
    }
}

impl fmt::Debug for RunState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::None => formatter.write_str("RunState::None"),
            Inner::Handle(_) => formatter.write_str("RunState::Handle(..)"),
            Inner::Pair(pair) => formatter
                .debug_tuple("RunState::Pair")
                .field(&pair.first)
                .field(&pair.second)
                .finish(),
        }
    }
}
