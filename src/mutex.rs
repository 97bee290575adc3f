//! Mutual exclusion built on the capacity-1 semaphore.
//!
//! [`Mutex`] is a thin specialization of [`Semaphore`]: one permit, the same
//! acquire/run contract, the same strict FIFO service for queued acquirers.
//! It guards a critical *section* rather than wrapping a value, which suits
//! async code where the protected resource often is not a single datum.
//!
//! # Examples
//!
//! ```
//! use taskgate::Mutex;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mutex = Mutex::new();
//! let answer = mutex.run(|| async { 6 * 7 }).await;
//! assert_eq!(answer, 42);
//! assert!(!mutex.is_locked());
//! # });
//! ```

use std::fmt;
use std::future::Future;

use crate::semaphore::{Permit, Semaphore};

/// An asynchronous mutual-exclusion primitive.
///
/// At most one acquired [`Permit`] is outstanding at a time; contending
/// acquirers are served in arrival order. Cloning produces another handle
/// to the same mutex.
#[derive(Clone)]
pub struct Mutex {
    sem: Semaphore,
}

impl Mutex {
    /// Create an unlocked mutex.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sem: Semaphore::new_unchecked(1),
        }
    }

    /// Attempt to lock without suspending. Returns `None` when held.
    #[must_use]
    pub fn try_acquire(&self) -> Option<Permit> {
        self.sem.try_acquire()
    }

    /// Lock, suspending until the mutex is free. Queued acquirers are
    /// granted the lock in FIFO order.
    pub async fn acquire(&self) -> Permit {
        self.sem.acquire().await
    }

    /// Run `op` while holding the lock, releasing on every exit path.
    ///
    /// Critical sections never interleave: the whole of one `op` (across
    /// any internal suspension points) completes before the next begins.
    pub async fn run<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.sem.run(op).await
    }

    /// Whether the mutex is currently held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.sem.used() > 0
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex")
            .field("locked", &self.is_locked())
            .finish()
    }
}
