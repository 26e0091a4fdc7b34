//! Bridges between tasks and Rust futures.
//!
//! - [`Task::from_future`] turns a future factory into a task whose forks
//!   run on the current tokio `LocalSet` and whose cleanup aborts them
//! - awaiting a task (`IntoFuture`) forks it once on first poll and resolves
//!   to its settlement

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use tokio::task::AbortHandle;

use super::{RunState, Task, TaskError};
use crate::scheduler;

impl<E: 'static, V: 'static> Task<E, V> {
    /// Creates a task that runs a fresh future from `factory` on every fork.
    ///
    /// The future is spawned with [`tokio::task::spawn_local`]. The run-state
    /// holds its [`AbortHandle`], and the task's cleanup aborts it, so a
    /// branch that loses a [`concat`](Self::concat) race stops running once
    /// the deferred cleanup fires. The settlement runs as a
    /// [`scheduler::turn`], so cleanups it defers to the default queue fire
    /// right after it.
    ///
    /// # Panics
    ///
    /// Forking panics when called outside of a tokio `LocalSet` context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::Task;
    /// use std::time::Duration;
    ///
    /// let runtime = tokio::runtime::Builder::new_current_thread()
    ///     .enable_time()
    ///     .build()
    ///     .unwrap();
    /// let local = tokio::task::LocalSet::new();
    /// let value = local.block_on(&runtime, async {
    ///     let task: Task<String, u32> = Task::from_future(|| async {
    ///         tokio::time::sleep(Duration::from_millis(1)).await;
    ///         Ok(7)
    ///     });
    ///     task.map(|x| x * 6).await
    /// });
    /// assert_eq!(value, Ok(42));
    /// ```
    pub fn from_future<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<V, E>> + 'static,
    {
        Self::with_cleanup(
            move |reject, resolve| {
                let future = factory();
                let handle = tokio::task::spawn_local(async move {
                    let outcome = future.await;
                    scheduler::turn(move || match outcome {
                        Ok(value) => resolve(value),
                        Err(error) => reject(error),
                    });
                });
                RunState::new(handle.abort_handle())
            },
            |state| {
                if let Some(handle) = state.downcast_ref::<AbortHandle>() {
                    handle.abort();
                }
            },
        )
    }
}

/// Future returned by awaiting a [`Task`].
///
/// The task is forked on the first poll, not before. Dropping the future
/// does not cancel the fork.
pub struct TaskFuture<E, V> {
    pending: Option<(Task<E, V>, oneshot::Sender<Result<V, E>>)>,
    receiver: oneshot::Receiver<Result<V, E>>,
    run_state: Option<RunState>,
}

impl<E, V> TaskFuture<E, V> {
    /// The run-state of the fork, once the future has been polled.
    pub const fn run_state(&self) -> Option<&RunState> {
        self.run_state.as_ref()
    }
}

impl<E: 'static, V: 'static> IntoFuture for Task<E, V> {
    type Output = Result<V, TaskError<E>>;
    type IntoFuture = TaskFuture<E, V>;

    fn into_future(self) -> Self::IntoFuture {
        let (sender, receiver) = oneshot::channel();
        TaskFuture {
            pending: Some((self, sender)),
            receiver,
            run_state: None,
        }
    }
}

impl<E: 'static, V: 'static> Future for TaskFuture<E, V> {
    type Output = Result<V, TaskError<E>>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some((task, sender)) = this.pending.take() {
            this.run_state = Some(task.fork_result(move |result| {
                // Fails only when this future was dropped before settlement.
                drop(sender.send(result));
            }));
        }
        this.receiver.poll_unpin(context).map(|received| match received {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(TaskError::Rejected(error)),
            Err(oneshot::Canceled) => Err(TaskError::Abandoned),
        })
    }
}

impl<E, V> std::fmt::Debug for TaskFuture<E, V> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskFuture")
            .field("forked", &self.pending.is_none())
            .field("run_state", &self.run_state)
            .finish_non_exhaustive()
    }
}
