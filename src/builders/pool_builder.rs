//! Builders to construct task pools from configuration.

use std::collections::HashMap;

use crate::config::PoolSetConfig;
use crate::core::error::Result;
use crate::core::pool::{Spawn, TaskPool};

/// Build one task pool per configured entry, sharing a single spawner.
///
/// Validates the whole configuration before constructing anything, so a
/// partially built pool set is never returned.
///
/// # Errors
///
/// Returns the configuration's validation error, or
/// [`GateError::InvalidCapacity`](crate::GateError::InvalidCapacity) from an
/// individual pool constructor.
pub fn build_pools<S>(cfg: &PoolSetConfig, spawner: S) -> Result<HashMap<String, TaskPool<S>>>
where
    S: Spawn + Clone,
{
    cfg.validate()?;

    let mut pools = HashMap::new();
    for (name, pool_cfg) in &cfg.pools {
        let pool = TaskPool::with_spawner(pool_cfg.concurrency, spawner.clone())?;
        pools.insert(name.clone(), pool);
    }
    Ok(pools)
}
