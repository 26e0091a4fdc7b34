//! Operators that post-process the single outcome of one task.
//!
//! Each operator returns a new task whose fork delegates to the original
//! fork and whose cleanup is the original cleanup, unchanged: the run-state
//! of the new task is the run-state of the underlying fork.

use std::rc::Rc;

use super::continuation::OnceContinuation;
use super::Task;

/// Labeled pair of functions for [`Task::cata`].
#[derive(Debug, Clone, Copy)]
pub struct Pattern<F, G> {
    /// Applied to a failure value.
    pub rejected: F,
    /// Applied to a success value.
    pub resolved: G,
}

impl<E: 'static, V: 'static> Task<E, V> {
    /// Transforms the success value.
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
    /// Task::<(), i32>::of(21)
    ///     .map(|x| x * 2)
    ///     .fork(|_| {}, move |value| sink.set(value));
    /// assert_eq!(seen.get(), 42);
    /// ```
    pub fn map<W, F>(self, function: F) -> Task<E, W>
    where
        F: Fn(V) -> W + 'static,
        W: 'static,
    {
        let fork = self.fork;
        let function = Rc::new(function);
        Task::from_parts(
            move |reject, resolve| {
                let function = Rc::clone(&function);
                fork(reject, Box::new(move |value| resolve(function(value))))
            },
            self.cleanup,
        )
    }

    /// Sequences a dependent task.
    ///
    /// On success, `function` builds the next task, which is forked with the
    /// same continuations. The returned task keeps the outer cleanup only;
    /// the inner task's run-state is not tracked.
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
    /// Task::<String, u32>::of(0)
    ///     .chain(|divisor| {
    ///         if divisor == 0 {
    ///             Task::rejected("division by zero".to_string())
    ///         } else {
    ///             Task::of(100 / divisor)
    ///         }
    ///     })
    ///     .fork_result(move |result| *sink.borrow_mut() = Some(result));
    /// assert_eq!(*outcome.borrow(), Some(Err("division by zero".to_string())));
    /// ```
    pub fn chain<W, F>(self, function: F) -> Task<E, W>
    where
        F: Fn(V) -> Task<E, W> + 'static,
        W: 'static,
    {
        let fork = self.fork;
        let function = Rc::new(function);
        Task::from_parts(
            move |reject, resolve| {
                let function = Rc::clone(&function);
                let reject = OnceContinuation::new(reject);
                fork(
                    reject.boxed(),
                    Box::new(move |value| {
                        function(value).fork(
                            move |error| {
                                reject.call(error);
                            },
                            resolve,
                        );
                    }),
                )
            },
            self.cleanup,
        )
    }

    /// Alias for [`chain`](Self::chain).
    #[inline]
    pub fn flat_map<W, F>(self, function: F) -> Task<E, W>
    where
        F: Fn(V) -> Task<E, W> + 'static,
        W: 'static,
    {
        self.chain(function)
    }

    /// Recovers from a failure with another task.
    ///
    /// On failure, `function` builds a recovery task, which is forked with
    /// the same continuations. Successes pass through unchanged.
    pub fn or_else<X, F>(self, function: F) -> Task<X, V>
    where
        F: Fn(E) -> Task<X, V> + 'static,
        X: 'static,
    {
        let fork = self.fork;
        let function = Rc::new(function);
        Task::from_parts(
            move |reject, resolve| {
                let function = Rc::clone(&function);
                let resolve = OnceContinuation::new(resolve);
                fork(
                    Box::new({
                        let resolve = resolve.clone();
                        move |error| {
                            function(error).fork(reject, move |value| {
                                resolve.call(value);
                            });
                        }
                    }),
                    resolve.boxed(),
                )
            },
            self.cleanup,
        )
    }

    /// Transforms the failure value.
    pub fn rejected_map<X, F>(self, function: F) -> Task<X, V>
    where
        F: Fn(E) -> X + 'static,
        X: 'static,
    {
        let fork = self.fork;
        let function = Rc::new(function);
        Task::from_parts(
            move |reject, resolve| {
                let function = Rc::clone(&function);
                fork(Box::new(move |error| reject(function(error))), resolve)
            },
            self.cleanup,
        )
    }

    /// Transforms both channels: failures through `on_failure`, successes
    /// through `on_success`.
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
    /// Task::<i32, i32>::rejected(4)
    ///     .bimap(|e| format!("error {e}"), |v| v + 1)
    ///     .fork_result(move |result| *sink.borrow_mut() = Some(result));
    /// assert_eq!(*outcome.borrow(), Some(Err("error 4".to_string())));
    /// ```
    pub fn bimap<X, W, F, G>(self, on_failure: F, on_success: G) -> Task<X, W>
    where
        F: Fn(E) -> X + 'static,
        G: Fn(V) -> W + 'static,
        X: 'static,
        W: 'static,
    {
        let fork = self.fork;
        let on_failure = Rc::new(on_failure);
        let on_success = Rc::new(on_success);
        Task::from_parts(
            move |reject, resolve| {
                let on_failure = Rc::clone(&on_failure);
                let on_success = Rc::clone(&on_success);
                fork(
                    Box::new(move |error| reject(on_failure(error))),
                    Box::new(move |value| resolve(on_success(value))),
                )
            },
            self.cleanup,
        )
    }

    /// Exchanges the failure and success channels.
    #[must_use]
    pub fn swap(self) -> Task<V, E> {
        let fork = self.fork;
        Task::from_parts(
            move |reject, resolve| fork(resolve, reject),
            self.cleanup,
        )
    }

    /// Collapses both channels into the success channel.
    ///
    /// The returned task never fails; its failure type is free.
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
    /// Task::<&str, usize>::rejected("oops")
    ///     .fold::<(), _, _, _>(|e| e.len(), |v| v)
    ///     .fork_result(move |result| *sink.borrow_mut() = Some(result));
    /// assert_eq!(*outcome.borrow(), Some(Ok(4)));
    /// ```
    pub fn fold<X, W, F, G>(self, on_failure: F, on_success: G) -> Task<X, W>
    where
        F: Fn(E) -> W + 'static,
        G: Fn(V) -> W + 'static,
        X: 'static,
        W: 'static,
    {
        let fork = self.fork;
        let on_failure = Rc::new(on_failure);
        let on_success = Rc::new(on_success);
        Task::from_parts(
            move |_reject, resolve| {
                let on_failure = Rc::clone(&on_failure);
                let on_success = Rc::clone(&on_success);
                let resolve = OnceContinuation::new(resolve);
                let from_failure = resolve.clone();
                fork(
                    Box::new(move |error| {
                        from_failure.call(on_failure(error));
                    }),
                    Box::new(move |value| {
                        resolve.call(on_success(value));
                    }),
                )
            },
            self.cleanup,
        )
    }

    /// [`fold`](Self::fold) with labeled functions.
    pub fn cata<X, W, F, G>(self, pattern: Pattern<F, G>) -> Task<X, W>
    where
        F: Fn(E) -> W + 'static,
        G: Fn(V) -> W + 'static,
        X: 'static,
        W: 'static,
    {
        self.fold(pattern.rejected, pattern.resolved)
    }
}
