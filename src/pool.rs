use super::{
    errors::TaskError,
    handle::{Task, TaskHandle},
    metrics::PoolMetrics,
};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Condvar, Mutex,
    },
    thread,
};

use crossbeam::channel::{self, Receiver, Sender};

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads, fixed for the pool's lifetime.
    pub num_threads: usize,
    /// Stack size per worker thread; `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            stack_size: None,
        }
    }
}

impl Config {
    fn validate(&self) {
        assert!(
            self.num_threads >= 1,
            "worker pool requires at least one thread"
        );
    }
}

enum Message {
    Run(Task),
    Shutdown,
}

/// State shared between the pool handle, its workers, and in-flight tasks.
pub(crate) struct PoolShared {
    queue: Sender<Message>,
    pending: AtomicUsize,
    completed: AtomicUsize,
    panicked: AtomicUsize,
    idle: Mutex<()>,
    quiescent: Condvar,
}

impl PoolShared {
    /// Enqueues a task. Counted before it becomes visible in the queue, so
    /// a concurrent `wait` can never observe zero while this task or any
    /// task submitted from inside it is still pending.
    pub(crate) fn submit(&self, task: Task) {
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.queue
            .send(Message::Run(task))
            .expect("worker pool queue disconnected");
    }

    fn run_task(&self, task: Task) {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        } else {
            self.completed.fetch_add(1, Ordering::Relaxed);
        }
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Taking the lock orders this notification after any waiter
            // that has seen the counter nonzero but not yet parked.
            let _idle = self.idle.lock().unwrap();
            self.quiescent.notify_all();
        }
    }

    fn wait(&self) {
        let mut idle = self.idle.lock().unwrap();
        while self.pending.load(Ordering::Acquire) > 0 {
            idle = self.quiescent.wait(idle).unwrap();
        }
    }
}

fn worker_loop(shared: &PoolShared, queue: &Receiver<Message>) {
    while let Ok(message) = queue.recv() {
        match message {
            Message::Run(task) => shared.run_task(task),
            Message::Shutdown => break,
        }
    }
}

/// Fixed-size pool of OS worker threads draining one FIFO task queue.
///
/// Submission never blocks and is safe from inside a running task;
/// [`wait`](WorkerPool::wait) is a quiescence barrier that stays correct
/// under such recursive fan-out. Dropping the pool drains all remaining
/// work, shuts the workers down, and joins them.
pub struct WorkerPool {
    config: Config,
    shared: Arc<PoolShared>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Pool sized to the host's available parallelism.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Pool with exactly `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Self {
        Self::with_config(Config {
            num_threads,
            ..Default::default()
        })
    }

    /// Spawns all workers immediately; they block until work arrives.
    ///
    /// # Panics
    ///
    /// Panics if `config.num_threads` is zero or a worker thread cannot
    /// be spawned.
    pub fn with_config(config: Config) -> Self {
        config.validate();
        let (sender, receiver) = channel::unbounded();
        let shared = Arc::new(PoolShared {
            queue: sender,
            pending: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            panicked: AtomicUsize::new(0),
            idle: Mutex::new(()),
            quiescent: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(config.num_threads);
        for index in 0..config.num_threads {
            let shared = Arc::clone(&shared);
            let queue = receiver.clone();
            let mut builder = thread::Builder::new().name(format!("parwork-{}", index));
            if let Some(bytes) = config.stack_size {
                builder = builder.stack_size(bytes);
            }
            let handle = builder
                .spawn(move || worker_loop(&shared, &queue))
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }

        Self {
            config,
            shared,
            workers,
        }
    }

    /// Enqueues a fire-and-forget task and returns immediately.
    ///
    /// A panic inside the task is caught at the execution boundary and
    /// recorded in the pool's counters; the worker itself survives.
    #[inline]
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.submit(Box::new(task));
    }

    /// Enqueues a task and returns a handle to its eventual result.
    ///
    /// The handle is a per-call opt-in: tasks submitted through
    /// [`submit`](WorkerPool::submit) pay no result-delivery cost. A panic
    /// inside the task surfaces as [`TaskError::Panicked`] when the handle
    /// is joined.
    pub fn submit_with_handle<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = channel::bounded(1);
        self.shared.submit(Box::new(move || {
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(value) => {
                    let _ = sender.send(Ok(value));
                }
                Err(payload) => {
                    let _ = sender.send(Err(TaskError::from_panic(payload.as_ref())));
                    // Resume so the pool boundary still observes the panic.
                    panic::resume_unwind(payload);
                }
            }
        }));
        TaskHandle::new(receiver)
    }

    /// Blocks until every submitted task has retired, including tasks that
    /// running tasks submit while this call is in progress.
    ///
    /// A submission racing with `wait` is either covered by this call or
    /// deferred intact to a later one; `wait` never returns while such a
    /// task is queued or running. Calling `wait` from inside a task of the
    /// same pool deadlocks, as does dropping the pool from inside one.
    pub fn wait(&self) {
        self.shared.wait();
    }

    #[inline]
    pub fn thread_count(&self) -> usize {
        self.config.num_threads
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            pending: self.shared.pending.load(Ordering::Relaxed),
            completed: self.shared.completed.load(Ordering::Relaxed),
            panicked: self.shared.panicked.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<PoolShared> {
        &self.shared
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    // Quiescence first, so recursive submissions settle; the shutdown
    // messages then reach workers through an already-empty queue.
    fn drop(&mut self) {
        self.shared.wait();
        for _ in 0..self.workers.len() {
            let _ = self.shared.queue.send(Message::Shutdown);
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
