//! Runtime adapters implementing the [`Spawn`](crate::core::Spawn) trait.

pub mod tokio_spawner;

pub use tokio_spawner::TokioSpawner;
