/// Point-in-time snapshot of a pool's task counters.
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    /// Submitted executions that have not retired yet (queued or running).
    pub pending: usize,
    /// Executions that ran to completion without panicking.
    pub completed: usize,
    /// Executions that panicked at the task boundary.
    pub panicked: usize,
}

impl PoolMetrics {
    /// Executions that have finished, successfully or not.
    pub fn retired(&self) -> usize {
        self.completed + self.panicked
    }

    pub fn success_rate(&self) -> f64 {
        let retired = self.retired();
        if retired == 0 {
            return 1.0;
        }
        self.completed as f64 / retired as f64
    }
}
