//! Core abstractions: error taxonomy and the bounded task pool.

pub mod error;
pub mod pool;

pub use error::{GateError, Result};
pub use pool::{Spawn, TaskPool};
