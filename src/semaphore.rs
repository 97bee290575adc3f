//! Counting semaphore with fair FIFO queuing.
//!
//! The semaphore owns a fixed capacity and a wait queue. Callers that find
//! free capacity are granted a [`Permit`] synchronously; callers that arrive
//! at capacity are parked on a one-shot completion handle and resumed in
//! strict arrival order as permits are returned.
//!
//! # Examples
//!
//! Scoped acquisition (the primary entry point):
//!
//! ```
//! use taskgate::Semaphore;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let sem = Semaphore::new(2).unwrap();
//! let doubled = sem.run(|| async { 21 * 2 }).await;
//! assert_eq!(doubled, 42);
//! assert_eq!(sem.used(), 0);
//! # });
//! ```
//!
//! Manual permit management:
//!
//! ```
//! use taskgate::Semaphore;
//!
//! let sem = Semaphore::new(1).unwrap();
//! let mut permit = sem.try_acquire().expect("capacity is free");
//! assert!(sem.try_acquire().is_none());
//! assert!(permit.release());
//! assert!(!permit.release()); // second release is a no-op
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::core::error::{GateError, Result};

/// A counting semaphore limiting concurrent access to at most `capacity`
/// holders, with strict FIFO service for queued acquirers.
///
/// Cloning is cheap and produces another handle to the same semaphore.
#[derive(Clone)]
pub struct Semaphore {
    inner: Arc<Inner>,
}

struct Inner {
    capacity: usize,
    state: Mutex<State>,
}

struct State {
    used: usize,
    /// Parked acquirers in arrival order. Each entry is the completion
    /// handle of one suspended `acquire` call.
    queue: VecDeque<oneshot::Sender<Permit>>,
}

impl Semaphore {
    /// Create a semaphore with the given number of permits.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(GateError::InvalidCapacity(capacity));
        }
        Ok(Self::new_unchecked(capacity))
    }

    /// Construct without validation. Callers guarantee `capacity >= 1`.
    pub(crate) fn new_unchecked(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                capacity,
                state: Mutex::new(State {
                    used: 0,
                    queue: VecDeque::new(),
                }),
            }),
        }
    }

    /// Attempt to take a permit without suspending.
    ///
    /// Returns `None` when the semaphore is at capacity. Never enqueues:
    /// absence of a permit is an answer, not a reservation.
    #[must_use]
    pub fn try_acquire(&self) -> Option<Permit> {
        let mut state = self.inner.state.lock();
        if state.used < self.inner.capacity {
            state.used += 1;
            tracing::trace!(used = state.used, capacity = self.inner.capacity, "permit granted");
            Some(Permit::new(&self.inner))
        } else {
            None
        }
    }

    /// Take a permit, suspending until one is available.
    ///
    /// When the semaphore is at capacity the caller is appended to the wait
    /// queue and resumed once a permit is handed to it by a release. Grants
    /// strictly follow arrival order; a later caller is never served while
    /// an earlier one is still queued.
    pub async fn acquire(&self) -> Permit {
        let receiver = {
            let mut state = self.inner.state.lock();
            if state.used < self.inner.capacity {
                state.used += 1;
                tracing::trace!(used = state.used, capacity = self.inner.capacity, "permit granted");
                return Permit::new(&self.inner);
            }
            let (sender, receiver) = oneshot::channel();
            state.queue.push_back(sender);
            tracing::debug!(waiting = state.queue.len(), "at capacity, acquirer parked");
            receiver
        };
        match receiver.await {
            Ok(permit) => permit,
            // The sender sits in the wait queue, which lives as long as the
            // semaphore itself; the channel cannot close before a grant.
            Err(_) => unreachable!("wait queue entry dropped without a grant"),
        }
    }

    /// Run `op` while holding a permit.
    ///
    /// Acquires, awaits the operation, and releases on every exit path
    /// before propagating the operation's output verbatim. Prefer this over
    /// manual [`acquire`](Self::acquire)/[`Permit::release`] unless the
    /// permit must outlive a single scope.
    pub async fn run<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut permit = self.acquire().await;
        let outcome = op().await;
        permit.release();
        outcome
    }

    /// Number of permits this semaphore was created with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of permits currently held.
    #[must_use]
    pub fn used(&self) -> usize {
        self.inner.state.lock().used
    }

    /// Number of permits currently free, `capacity - used`.
    #[must_use]
    pub fn permits(&self) -> usize {
        self.inner.capacity - self.inner.state.lock().used
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Semaphore")
            .field("capacity", &self.inner.capacity)
            .field("used", &state.used)
            .field("waiting", &state.queue.len())
            .finish()
    }
}

impl Inner {
    /// Return one permit and, if anyone is parked, hand the freed slot to
    /// the queue head. The counter update and the hand-off happen under one
    /// lock so a concurrent `try_acquire` can never observe the slot as
    /// free while a waiter is being granted it.
    fn release_one(this: &Arc<Self>) -> bool {
        let mut state = this.state.lock();
        if state.used == 0 {
            return false;
        }
        state.used -= 1;
        while state.used < this.capacity {
            let Some(waiter) = state.queue.pop_front() else {
                break;
            };
            state.used += 1;
            match waiter.send(Permit::new(this)) {
                Ok(()) => {
                    tracing::trace!(waiting = state.queue.len(), "freed slot handed to waiter");
                    break;
                }
                Err(mut lost) => {
                    // The waiter's future was dropped before the grant
                    // arrived. Take the slot back and offer it to the next
                    // entry; neutralize the permit so its drop cannot
                    // re-enter the lock.
                    lost.released = true;
                    state.used -= 1;
                }
            }
        }
        tracing::trace!(used = state.used, capacity = this.capacity, "permit released");
        true
    }
}

/// Single-use token returned by a successful acquisition: the right to
/// return exactly one permit to its semaphore.
///
/// Releasing is idempotent per token. The first [`release`](Self::release)
/// returns `true`; every later call returns `false` and leaves the counter
/// untouched, so redundant release from scoped cleanup is always safe.
/// Dropping an unreleased permit returns it, so a cancelled holder cannot
/// leak a slot.
pub struct Permit {
    inner: Arc<Inner>,
    released: bool,
}

impl Permit {
    fn new(inner: &Arc<Inner>) -> Self {
        Self {
            inner: Arc::clone(inner),
            released: false,
        }
    }

    /// Return this token's permit to the semaphore.
    ///
    /// Returns `true` when this call released the permit, `false` when the
    /// token was already spent. A `false` return is a defensive no-op, not
    /// a failure to handle.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        Inner::release_one(&self.inner)
    }

    /// Whether this token has already been spent.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            Inner::release_one(&self.inner);
        }
    }
}

impl fmt::Debug for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit")
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_initializes_counters() {
        for capacity in [1, 2, 16, 1024] {
            let sem = Semaphore::new(capacity).unwrap();
            assert_eq!(sem.capacity(), capacity);
            assert_eq!(sem.used(), 0);
            assert_eq!(sem.permits(), capacity);
        }
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert!(matches!(
            Semaphore::new(0),
            Err(GateError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_try_acquire_until_exhausted() {
        let sem = Semaphore::new(2).unwrap();
        let first = sem.try_acquire().unwrap();
        let second = sem.try_acquire().unwrap();
        assert_eq!(sem.used(), 2);
        assert_eq!(sem.permits(), 0);

        // At capacity: no permit, no queue entry.
        assert!(sem.try_acquire().is_none());
        assert_eq!(sem.used(), 2);
        assert_eq!(sem.inner.state.lock().queue.len(), 0);

        drop(first);
        drop(second);
        assert_eq!(sem.used(), 0);
    }

    #[test]
    fn test_release_is_idempotent_per_token() {
        let sem = Semaphore::new(1).unwrap();
        let mut permit = sem.try_acquire().unwrap();
        assert_eq!(sem.used(), 1);

        assert!(permit.release());
        assert_eq!(sem.used(), 0);

        assert!(!permit.release());
        assert!(!permit.release());
        assert_eq!(sem.used(), 0);
        assert!(permit.is_released());
    }

    #[test]
    fn test_drop_releases_unspent_permit_once() {
        let sem = Semaphore::new(1).unwrap();
        let permit = sem.try_acquire().unwrap();
        assert_eq!(sem.used(), 1);
        drop(permit);
        assert_eq!(sem.used(), 0);

        // A spent token's drop does not release again.
        let mut permit = sem.try_acquire().unwrap();
        permit.release();
        let stolen = sem.try_acquire().unwrap();
        drop(permit);
        assert_eq!(sem.used(), 1);
        drop(stolen);
    }

    #[tokio::test]
    async fn test_acquire_grants_immediately_under_capacity() {
        let sem = Semaphore::new(3).unwrap();
        let a = sem.acquire().await;
        let b = sem.acquire().await;
        assert_eq!(sem.used(), 2);
        assert_eq!(sem.permits(), 1);
        drop(a);
        drop(b);
    }

    #[tokio::test]
    async fn test_run_propagates_failure_and_releases() {
        let sem = Semaphore::new(1).unwrap();
        let outcome: std::result::Result<(), &str> =
            sem.run(|| async { Err("operation failed") }).await;
        assert_eq!(outcome, Err("operation failed"));
        assert_eq!(sem.used(), 0);
        assert_eq!(sem.permits(), 1);
    }

    #[tokio::test]
    async fn test_release_skips_abandoned_waiter() {
        use futures::FutureExt;

        let sem = Semaphore::new(1).unwrap();
        let mut held = sem.acquire().await;

        // Poll an acquire once so it parks, then drop it: the queue keeps
        // a dead entry at the head.
        assert!(sem.acquire().now_or_never().is_none());
        assert_eq!(sem.inner.state.lock().queue.len(), 1);

        let waited = tokio::spawn({
            let sem = sem.clone();
            async move { sem.acquire().await }
        });
        // Let the spawned acquirer park behind the dead entry.
        tokio::task::yield_now().await;
        assert_eq!(sem.inner.state.lock().queue.len(), 2);

        // Release must skip the dead entry and grant the live waiter.
        held.release();
        let granted = waited.await.unwrap();
        assert_eq!(sem.used(), 1);
        drop(granted);
    }
}
