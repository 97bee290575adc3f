//! # Taskgate
//!
//! Cooperative concurrency-limiting primitives for async workloads.
//!
//! The core of this library is a counting [`Semaphore`] with fair FIFO
//! queuing: a fixed capacity, a wait queue served strictly in arrival
//! order, and single-use [`Permit`] tokens with idempotent release. The
//! other primitives are thin layers over it: [`Mutex`] is the capacity-1
//! specialization, and [`TaskPool`] binds a semaphore to a batch of
//! deferred tasks, running at most `concurrency` of them at once and
//! collecting results in submission order.
//!
//! ## Core guarantees
//!
//! - **Permit accounting**: at every observable instant
//!   `0 <= used <= capacity`, and `used` equals the number of outstanding
//!   unreleased permits.
//! - **FIFO fairness**: a queued acquirer is never overtaken by a later
//!   arrival, enforced by handing freed slots directly to the queue head.
//! - **Idempotent release**: a [`Permit`] returns its slot exactly once;
//!   redundant releases are reported, not punished.
//! - **Scoped acquisition**: the `run`/`submit` entry points release on
//!   every exit path before propagating the operation's own outcome.
//!
//! ## Example
//!
//! ```rust,ignore
//! use taskgate::{Semaphore, TaskPool};
//!
//! // Gate a shared connection at 4 concurrent users.
//! let gate = Semaphore::new(4)?;
//! let row = gate.run(|| async { db.fetch_row(id).await }).await?;
//!
//! // Fan a batch out over 2 slots; results come back in input order.
//! let pool = TaskPool::new(2)?;
//! let pages = pool
//!     .submit_all(urls.into_iter().map(|u| move || fetch(u)).collect())
//!     .await?;
//! ```
//!
//! Suspension is cooperative: a parked acquirer holds a one-shot
//! completion handle and consumes no thread while waiting. The internal
//! counter-and-queue update is a single atomic step under one lock, so the
//! primitives stay correct on multi-threaded runtimes.
//!
//! Queued acquisitions cannot be abandoned through the API; deadline and
//! retry policies belong around the *operation* (for example
//! `tokio::time::timeout` inside `run`), where scoped acquisition
//! guarantees the permit is returned before the failure surfaces.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Counting semaphore with fair FIFO queuing.
pub mod semaphore;
/// Mutual exclusion built on the capacity-1 semaphore.
pub mod mutex;
/// Core abstractions: error taxonomy and the bounded task pool.
pub mod core;
/// Configuration models for task pools.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Runtime adapters for spawning background work.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{GateError, Spawn, TaskPool};
pub use mutex::Mutex;
pub use runtime::TokioSpawner;
pub use semaphore::{Permit, Semaphore};
