use super::{Job, Scheduler};

/// Runs deferred jobs as tasks on the current tokio [`LocalSet`].
///
/// Each job is spawned with [`tokio::task::spawn_local`], so it runs on a
/// later poll of the `LocalSet` in spawn order.
///
/// # Panics
///
/// Scheduling panics when called outside of a `LocalSet` context.
///
/// # Examples
///
/// ```rust
/// use lambars_task::scheduler::{self, LocalSpawner};
/// use std::rc::Rc;
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .build()
///     .unwrap();
/// let local = tokio::task::LocalSet::new();
/// local.block_on(&runtime, async {
///     let _guard = scheduler::enter(Rc::new(LocalSpawner));
///     scheduler::defer(|| println!("after this turn"));
///     tokio::task::yield_now().await;
/// });
/// ```
///
/// [`LocalSet`]: tokio::task::LocalSet
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

impl Scheduler for LocalSpawner {
    fn schedule(&self, job: Job) {
        drop(tokio::task::spawn_local(async move { job() }));
    }
}
