//! Helpers shared by the integration tests.

#![allow(dead_code)]

use lambars_task::{RunState, Task, scheduler};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; set `RUST_LOG=lambars_task=trace`
/// to see scheduling decisions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Forks `task` once, drains the default scheduler queue, and returns every
/// outcome that reached the continuations.
pub fn settle<E: 'static, V: 'static>(task: &Task<E, V>) -> Vec<Result<V, E>> {
    init_tracing();
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let failures = Rc::clone(&outcomes);
    let successes = Rc::clone(&outcomes);
    task.fork(
        move |error| failures.borrow_mut().push(Err(error)),
        move |value| successes.borrow_mut().push(Ok(value)),
    );
    scheduler::run_until_idle();
    outcomes.take()
}

/// A task driven by hand: each fork parks its continuations until the test
/// settles them in whatever order it wants.
pub struct Manual<E, V> {
    pub task: Task<E, V>,
    pub forks: Rc<Cell<usize>>,
    pub cleanups: Rc<Cell<usize>>,
    parked: Rc<RefCell<Vec<(lambars_task::Reject<E>, lambars_task::Resolve<V>)>>>,
}

impl<E: 'static, V: 'static> Manual<E, V> {
    pub fn new() -> Self {
        let forks = Rc::new(Cell::new(0));
        let cleanups = Rc::new(Cell::new(0));
        let parked = Rc::new(RefCell::new(Vec::new()));
        let fork_count = Rc::clone(&forks);
        let cleanup_count = Rc::clone(&cleanups);
        let slot = Rc::clone(&parked);
        let task = Task::with_cleanup(
            move |reject, resolve| {
                fork_count.set(fork_count.get() + 1);
                slot.borrow_mut().push((reject, resolve));
                RunState::new(fork_count.get())
            },
            move |_state| cleanup_count.set(cleanup_count.get() + 1),
        );
        Self {
            task,
            forks,
            cleanups,
            parked,
        }
    }

    pub fn resolve(&self, value: V) {
        let (_, resolve) = self.parked.borrow_mut().remove(0);
        resolve(value);
    }

    pub fn reject(&self, error: E) {
        let (reject, _) = self.parked.borrow_mut().remove(0);
        reject(error);
    }
}
