//! Joining and racing any number of tasks.

use super::{Resolve, RunState, Task};
use crate::typeclass::Monoid;

impl<E: 'static, V: 'static> Task<E, V> {
    /// Forks every task concurrently and collects their success values in
    /// input order.
    ///
    /// The first failure among them is the failure of the result. An empty
    /// input succeeds with an empty `Vec`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::Task;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let all = Task::<(), i32>::parallel((1..=3).map(Task::of));
    /// let outcome = Rc::new(RefCell::new(None));
    /// let sink = Rc::clone(&outcome);
    /// all.fork_result(move |result| *sink.borrow_mut() = Some(result));
    /// assert_eq!(*outcome.borrow(), Some(Ok(vec![1, 2, 3])));
    /// # lambars_task::scheduler::run_until_idle();
    /// ```
    pub fn parallel<I>(tasks: I) -> Task<E, Vec<V>>
    where
        I: IntoIterator<Item = Self>,
    {
        let start: Task<E, Vec<V>> = Task::new(|_reject, resolve: Resolve<Vec<V>>| {
            resolve(Vec::new());
            RunState::none()
        });
        tasks.into_iter().fold(start, |collected, task| {
            collected.map2(
                |mut values: Vec<V>, value: V| {
                    values.push(value);
                    values
                },
                task,
            )
        })
    }

    /// Races every task; the first settlement among them wins.
    ///
    /// An empty input never settles.
    pub fn race<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::combine_all(tasks)
    }
}
