//! Tests for parallel composition: `ap`, `map2`..`map10` and `parallel`.
//!
//! Covers:
//! - Laziness of composed tasks
//! - First-failure-wins and all-must-succeed semantics
//! - Every settlement order of hand-driven branches
//! - Deferred cleanup, and the absence of cleanup on the failure path
//! - Argument order and arity of every N-ary combinator

mod common;

use common::{Manual, settle};
use lambars_task::{RunState, Task, scheduler};
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

type Unary = Box<dyn FnOnce(i32) -> i32>;

fn of(value: i32) -> Task<String, i32> {
    Task::of(value)
}

// =============================================================================
// ap
// =============================================================================

#[rstest]
fn test_ap_all_must_succeed() {
    let function: Task<String, fn(i32) -> i32> = Task::of(|x| x + 1);
    assert_eq!(settle(&function.ap(Task::of(41))), vec![Ok(42)]);
}

#[rstest]
fn test_ap_first_failure_wins_under_synchronous_forking() {
    let function: Task<&str, fn(i32) -> i32> = Task::rejected("e1");
    let value: Task<&str, i32> = Task::rejected("e2");
    assert_eq!(settle(&function.ap(value)), vec![Err("e1")]);
}

#[rstest]
fn test_ap_does_not_fork_until_forked() {
    let function = Manual::<String, Unary>::new();
    let value = Manual::<String, i32>::new();
    let joined = function.task.clone().ap(value.task.clone());
    assert_eq!((function.forks.get(), value.forks.get()), (0, 0));

    joined.fork(|_| {}, |_| {});
    assert_eq!((function.forks.get(), value.forks.get()), (1, 1));
}

#[rstest]
#[case::function_then_value(true)]
#[case::value_then_function(false)]
fn test_ap_success_in_any_order(#[case] function_first: bool) {
    let function = Manual::<String, Unary>::new();
    let value = Manual::<String, i32>::new();
    let outcomes = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    function
        .task
        .clone()
        .ap(value.task.clone())
        .fork_result(move |result| sink.borrow_mut().push(result));

    if function_first {
        function.resolve(Box::new(|x| x * 3));
        value.resolve(14);
    } else {
        value.resolve(14);
        function.resolve(Box::new(|x| x * 3));
    }

    assert_eq!(*outcomes.borrow(), vec![Ok(42)]);
    assert_eq!(function.cleanups.get() + value.cleanups.get(), 0);
    scheduler::run_until_idle();
    assert_eq!((function.cleanups.get(), value.cleanups.get()), (1, 1));
}

#[rstest]
#[case::failure_before_success(true)]
#[case::success_before_failure(false)]
fn test_ap_failure_in_any_order_skips_cleanup(#[case] failure_first: bool) {
    let function = Manual::<String, Unary>::new();
    let value = Manual::<String, i32>::new();
    let outcomes = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    function
        .task
        .clone()
        .ap(value.task.clone())
        .fork_result(move |result| sink.borrow_mut().push(result));

    if failure_first {
        value.reject("value failed".to_string());
        function.resolve(Box::new(|x| x));
    } else {
        function.resolve(Box::new(|x| x));
        value.reject("value failed".to_string());
    }

    assert_eq!(*outcomes.borrow(), vec![Err("value failed".to_string())]);
    assert_eq!(scheduler::run_until_idle(), 0);
    assert_eq!((function.cleanups.get(), value.cleanups.get()), (0, 0));
}

#[rstest]
fn test_ap_cleanup_sees_run_state_returned_after_synchronous_settlement() {
    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    let value: Task<String, i32> = Task::with_cleanup(
        |_reject, resolve| {
            resolve(1);
            RunState::new(99_u32)
        },
        move |state| sink.set(state.downcast_ref::<u32>().copied()),
    );
    let function: Task<String, fn(i32) -> i32> = Task::of(|x| x);

    assert_eq!(settle(&function.ap(value)), vec![Ok(1)]);
    assert_eq!(seen.get(), Some(99));
}

// =============================================================================
// map2 .. map10
// =============================================================================

#[rstest]
fn test_map2_arity() {
    assert_eq!(settle(&of(1).map2(|a, b| [a, b], of(2))), vec![Ok([1, 2])]);
}

#[rstest]
fn test_map3_arity() {
    assert_eq!(
        settle(&of(1).map3(|a, b, c| [a, b, c], of(2), of(3))),
        vec![Ok([1, 2, 3])]
    );
}

#[rstest]
fn test_map4_arity() {
    assert_eq!(
        settle(&of(1).map4(|a, b, c, d| [a, b, c, d], of(2), of(3), of(4))),
        vec![Ok([1, 2, 3, 4])]
    );
}

#[rstest]
fn test_map5_arity() {
    assert_eq!(
        settle(&of(1).map5(|a, b, c, d, e| [a, b, c, d, e], of(2), of(3), of(4), of(5))),
        vec![Ok([1, 2, 3, 4, 5])]
    );
}

#[rstest]
fn test_map6_arity() {
    let task = of(1).map6(
        |a, b, c, d, e, f| [a, b, c, d, e, f],
        of(2),
        of(3),
        of(4),
        of(5),
        of(6),
    );
    assert_eq!(settle(&task), vec![Ok([1, 2, 3, 4, 5, 6])]);
}

#[rstest]
fn test_map7_arity() {
    let task = of(1).map7(
        |a, b, c, d, e, f, g| [a, b, c, d, e, f, g],
        of(2),
        of(3),
        of(4),
        of(5),
        of(6),
        of(7),
    );
    assert_eq!(settle(&task), vec![Ok([1, 2, 3, 4, 5, 6, 7])]);
}

#[rstest]
fn test_map8_arity() {
    let task = of(1).map8(
        |a, b, c, d, e, f, g, h| [a, b, c, d, e, f, g, h],
        of(2),
        of(3),
        of(4),
        of(5),
        of(6),
        of(7),
        of(8),
    );
    assert_eq!(settle(&task), vec![Ok([1, 2, 3, 4, 5, 6, 7, 8])]);
}

#[rstest]
fn test_map9_arity() {
    let task = of(1).map9(
        |a, b, c, d, e, f, g, h, i| [a, b, c, d, e, f, g, h, i],
        of(2),
        of(3),
        of(4),
        of(5),
        of(6),
        of(7),
        of(8),
        of(9),
    );
    assert_eq!(settle(&task), vec![Ok([1, 2, 3, 4, 5, 6, 7, 8, 9])]);
}

#[rstest]
fn test_map10_arity() {
    let task = of(1).map10(
        |a, b, c, d, e, f, g, h, i, j| [a, b, c, d, e, f, g, h, i, j],
        of(2),
        of(3),
        of(4),
        of(5),
        of(6),
        of(7),
        of(8),
        of(9),
        of(10),
    );
    assert_eq!(settle(&task), vec![Ok([1, 2, 3, 4, 5, 6, 7, 8, 9, 10])]);
}

#[rstest]
fn test_map5_fails_with_first_failure_only() {
    let task = of(1).map5(
        |a: i32, b: i32, c: i32, d: i32, e: i32| a + b + c + d + e,
        of(2),
        Task::rejected("third".to_string()),
        of(4),
        Task::rejected("fifth".to_string()),
    );
    assert_eq!(settle(&task), vec![Err("third".to_string())]);
}

#[rstest]
fn test_map_n_reruns_on_every_fork() {
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let counted: Task<String, i32> = Task::new(move |_reject, resolve| {
        counter.set(counter.get() + 1);
        resolve(counter.get());
        RunState::none()
    });
    let task = of(10).map3(|a, b, c| a + b + c, counted.clone(), counted);

    assert_eq!(settle(&task), vec![Ok(13)]);
    assert_eq!(settle(&task), vec![Ok(17)]);
    assert_eq!(runs.get(), 4);
}

// =============================================================================
// parallel
// =============================================================================

#[rstest]
fn test_parallel_collects_in_order() {
    let tasks = (1..=5).map(of);
    assert_eq!(settle(&Task::parallel(tasks)), vec![Ok(vec![1, 2, 3, 4, 5])]);
}

#[rstest]
fn test_parallel_waits_for_the_slowest() {
    let slow = Manual::<String, i32>::new();
    let outcomes = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    Task::parallel([of(1), slow.task.clone(), of(3)])
        .fork_result(move |result| sink.borrow_mut().push(result));

    assert!(outcomes.borrow().is_empty());
    slow.resolve(2);
    assert_eq!(*outcomes.borrow(), vec![Ok(vec![1, 2, 3])]);
    scheduler::run_until_idle();
    assert_eq!(slow.cleanups.get(), 1);
}

// =============================================================================
// Release of nested joins
// =============================================================================

#[rstest]
fn test_map3_releases_each_branch_once() {
    let first = Manual::<String, i32>::new();
    let second = Manual::<String, i32>::new();
    let third = Manual::<String, i32>::new();
    let outcomes = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    first
        .task
        .clone()
        .map3(|a, b, c| a + b + c, second.task.clone(), third.task.clone())
        .fork_result(move |result| sink.borrow_mut().push(result));

    first.resolve(1);
    second.resolve(2);
    third.resolve(3);
    scheduler::run_until_idle();

    assert_eq!(*outcomes.borrow(), vec![Ok(6)]);
    assert_eq!(
        [first.cleanups.get(), second.cleanups.get(), third.cleanups.get()],
        [1, 1, 1]
    );
}

#[rstest]
fn test_parallel_releases_each_branch_once() {
    let branches: Vec<Manual<String, i32>> = (0..5).map(|_| Manual::new()).collect();
    let outcomes = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    let all = Task::parallel(branches.iter().map(|branch| branch.task.clone()));
    let state = all.fork_result(move |result| sink.borrow_mut().push(result));

    for (value, branch) in (0..).zip(&branches) {
        branch.resolve(value);
    }
    scheduler::run_until_idle();
    all.cleanup(state);

    assert_eq!(*outcomes.borrow(), vec![Ok(vec![0, 1, 2, 3, 4])]);
    let released: Vec<usize> = branches.iter().map(|branch| branch.cleanups.get()).collect();
    assert_eq!(released, vec![1; 5]);
}

// =============================================================================
// Draining the default queue
// =============================================================================

#[rstest]
fn test_outermost_fork_runs_deferred_cleanups() {
    let cleanups = Rc::new(Cell::new(0));
    let counter = Rc::clone(&cleanups);
    let released: Task<String, i32> = Task::with_cleanup(
        |_reject, resolve| {
            resolve(1);
            RunState::none()
        },
        move |_state| counter.set(counter.get() + 1),
    );
    let joined = of(1).map2(|a, b| a + b, released);

    for _ in 0..1000 {
        joined.fork(|_| {}, |_| {});
    }

    assert!(scheduler::default_queue().is_empty());
    assert_eq!(cleanups.get(), 1000);
}

#[rstest]
fn test_nested_fork_defers_until_outermost_returns() {
    let inner = of(1).map2(|a, b| a + b, of(2));
    let pending_inside = Rc::new(Cell::new(None));
    let seen = Rc::clone(&pending_inside);
    let outer: Task<String, i32> = Task::new(move |reject, resolve| {
        let state = inner.fork(reject, resolve);
        seen.set(Some(scheduler::default_queue().len()));
        state
    });

    outer.fork(|_| {}, |_| {});

    assert_eq!(pending_inside.get(), Some(1));
    assert!(scheduler::default_queue().is_empty());
}
