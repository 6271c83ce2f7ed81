use super::errors::TaskError;
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};

/// Outcome of one task execution.
pub type TaskResult<T> = Result<T, TaskError>;

/// Boxed unit of work as it travels through the queue.
pub(crate) type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a task submitted with
/// [`WorkerPool::submit_with_handle`](crate::pool::WorkerPool::submit_with_handle).
///
/// The handle owns the receiving half of a one-shot channel; the worker
/// delivers exactly one [`TaskResult`] into it when the task retires.
pub struct TaskHandle<T> {
    receiver: Receiver<TaskResult<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(receiver: Receiver<TaskResult<T>>) -> Self {
        Self { receiver }
    }

    /// Blocks until the task has run, returning its value or failure.
    #[inline]
    pub fn join(self) -> TaskResult<T> {
        self.receiver.recv().unwrap_or(Err(TaskError::Lost))
    }

    /// Returns the result if the task has already retired, `None` otherwise.
    pub fn try_join(&self) -> Option<TaskResult<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Lost)),
        }
    }

    /// Blocks for at most `timeout`, consuming the handle either way.
    pub fn join_timeout(self, timeout: Duration) -> TaskResult<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(TaskError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(TaskError::Lost),
        }
    }
}
