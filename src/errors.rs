use std::any::Any;
use std::error::Error;
use std::fmt;

/// Failure reported through a [`TaskHandle`](crate::handle::TaskHandle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task panicked; the payload is the rendered panic message.
    Panicked(String),
    /// The task was dropped before it could deliver a result.
    Lost,
    /// `join_timeout` elapsed before the task finished.
    Timeout,
}

impl TaskError {
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        TaskError::Panicked(message)
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Panicked(message) => write!(f, "task panicked: {}", message),
            TaskError::Lost => write!(f, "task result lost before delivery"),
            TaskError::Timeout => write!(f, "timed out waiting for task result"),
        }
    }
}

impl Error for TaskError {}
