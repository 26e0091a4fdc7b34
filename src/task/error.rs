//! Error type for awaiting a task.

use std::fmt;

/// Why an awaited [`Task`](super::Task) did not produce a success value.
///
/// # Examples
///
/// ```rust
/// use lambars_task::TaskError;
///
/// let error: TaskError<String> = TaskError::Rejected("timeout".to_string());
/// assert_eq!(format!("{error}"), "task rejected: timeout");
/// assert_eq!(error.into_rejected(), Some("timeout".to_string()));
///
/// let abandoned: TaskError<String> = TaskError::Abandoned;
/// assert!(abandoned.is_abandoned());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The task settled on its failure channel.
    Rejected(E),
    /// The fork dropped both continuations without settling.
    Abandoned,
}

impl<E> TaskError<E> {
    /// Returns the failure value, if the task was rejected.
    pub fn into_rejected(self) -> Option<E> {
        match self {
            Self::Rejected(error) => Some(error),
            Self::Abandoned => None,
        }
    }

    /// Returns `true` if the task was abandoned.
    pub const fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

impl<E: fmt::Display> fmt::Display for TaskError<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(error) => write!(formatter, "task rejected: {error}"),
            Self::Abandoned => write!(formatter, "task abandoned without settling"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TaskError<E> {}
