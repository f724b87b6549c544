//! Bounded task group with a single join point.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Runs spawned futures in parallel, at most `concurrency` at a time.
///
/// Work can be added until [`TaskGroup::join_all`] is called, which waits for
/// every task spawned so far. Dropping the group aborts outstanding tasks.
pub struct TaskGroup<T> {
    tasks: JoinSet<T>,
    permits: Arc<Semaphore>,
    spawned: usize,
}

impl<T: Send + 'static> TaskGroup<T> {
    pub fn new(concurrency: usize) -> Self {
        Self {
            tasks: JoinSet::new(),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            spawned: 0,
        }
    }

    /// Schedule a task; it starts once a concurrency permit is free.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquiring only waits.
            let _permit = permits.acquire_owned().await.ok();
            task.await
        });
        self.spawned += 1;
    }

    /// Total number of tasks spawned into the group.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Number of tasks that have not been joined yet.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Abort every task and wait until all of them stopped.
    pub async fn shutdown(mut self) {
        self.tasks.shutdown().await;
    }

    /// Wait for every spawned task, in completion order.
    pub async fn join_all(mut self) -> Vec<Result<T, JoinError>> {
        let mut results = Vec::with_capacity(self.tasks.len());
        while let Some(result) = self.tasks.join_next().await {
            results.push(result);
        }
        results
    }
}
