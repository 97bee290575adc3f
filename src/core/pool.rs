//! Bounded task pool: a semaphore bound to a batch of deferred work.
//!
//! [`TaskPool`] runs at most `concurrency` tasks at once. It owns no state
//! of its own beyond the wrapped [`Semaphore`]; every admission decision
//! goes through the semaphore's public contract, so pooled tasks and direct
//! semaphore users observe the same FIFO fairness.

use std::fmt;
use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::oneshot;

use crate::core::error::Result;
use crate::runtime::TokioSpawner;
use crate::semaphore::Semaphore;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task to run in the background until completion.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// A pool that executes submitted tasks with bounded concurrency.
///
/// Cloning is cheap; clones share the same capacity and gauge.
#[derive(Clone)]
pub struct TaskPool<S = TokioSpawner> {
    sem: Semaphore,
    spawner: S,
}

impl TaskPool<TokioSpawner> {
    /// Create a pool running at most `concurrency` tasks at once, spawning
    /// batch work onto the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidCapacity`](crate::GateError::InvalidCapacity)
    /// when `concurrency` is zero.
    pub fn new(concurrency: usize) -> Result<Self> {
        Self::with_spawner(concurrency, TokioSpawner::default())
    }
}

impl<S: Spawn> TaskPool<S> {
    /// Create a pool that spawns batch work through the given spawner.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidCapacity`](crate::GateError::InvalidCapacity)
    /// when `concurrency` is zero.
    pub fn with_spawner(concurrency: usize, spawner: S) -> Result<Self> {
        Ok(Self {
            sem: Semaphore::new(concurrency)?,
            spawner,
        })
    }

    /// Run one task under the pool's concurrency limit.
    ///
    /// Waits for a slot if the pool is full, executes `task`, frees the
    /// slot on every exit path, and returns the task's own outcome
    /// unwrapped and unmodified.
    pub async fn submit<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.sem.run(task).await
    }

    /// Run every task in `tasks` concurrently under the shared limit and
    /// collect their values in submission order.
    ///
    /// All tasks are launched up front and compete for the pool's slots;
    /// completion order does not affect the order of the returned vector.
    /// The first failure observed is returned immediately. Remaining
    /// in-flight tasks are *not* cancelled: they run to completion and
    /// their results are discarded.
    ///
    /// # Errors
    ///
    /// The error of the first task to fail, unwrapped and unmodified.
    ///
    /// # Panics
    ///
    /// If a pooled task panics, the batch cannot produce its outcome and
    /// this method panics in turn.
    pub async fn submit_all<F, Fut, T, E>(&self, tasks: Vec<F>) -> std::result::Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let total = tasks.len();
        tracing::debug!(tasks = total, concurrency = self.sem.capacity(), "submitting batch");

        let mut completions = FuturesUnordered::new();
        for (index, task) in tasks.into_iter().enumerate() {
            let (outcome_tx, outcome_rx) = oneshot::channel();
            let sem = self.sem.clone();
            self.spawner.spawn(async move {
                let outcome = sem.run(task).await;
                // The batch may have already returned on another task's
                // failure; a closed channel just discards this result.
                let _ = outcome_tx.send(outcome);
            });
            completions.push(async move { (index, outcome_rx.await) });
        }

        let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
        while let Some((index, received)) = completions.next().await {
            match received {
                Ok(Ok(value)) => slots[index] = Some(value),
                Ok(Err(err)) => {
                    tracing::debug!(index, "batch task failed, surfacing its error");
                    return Err(err);
                }
                Err(_) => panic!("pooled task terminated without reporting an outcome"),
            }
        }
        debug_assert!(slots.iter().all(Option::is_some));
        Ok(slots.into_iter().flatten().collect())
    }

    /// Number of tasks currently past admission and not yet finished.
    #[must_use]
    pub fn tasks(&self) -> usize {
        self.sem.used()
    }

    /// Maximum number of concurrently running tasks.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.sem.capacity()
    }
}

impl<S> fmt::Debug for TaskPool<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskPool")
            .field("concurrency", &self.sem.capacity())
            .field("tasks", &self.sem.used())
            .finish()
    }
}
