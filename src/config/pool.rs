//! Pool configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{GateError, Result};

/// Configuration for a single task pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of concurrently running tasks.
    pub concurrency: usize,
}

impl PoolConfig {
    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidCapacity`] when `concurrency` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(GateError::InvalidCapacity(self.concurrency));
        }
        Ok(())
    }
}

/// Root configuration: a set of named task pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSetConfig {
    /// Map of pool name to configuration.
    pub pools: HashMap<String, PoolConfig>,
}

impl PoolSetConfig {
    /// Validate all pools and ensure at least one pool exists.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] naming the offending pool.
    pub fn validate(&self) -> Result<()> {
        if self.pools.is_empty() {
            return Err(GateError::InvalidConfig(
                "at least one pool must be defined".into(),
            ));
        }
        for (name, pool) in &self.pools {
            pool.validate()
                .map_err(|e| GateError::InvalidConfig(format!("pool `{name}` invalid: {e}")))?;
        }
        Ok(())
    }

    /// Parse pool configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] on malformed JSON or failed
    /// validation.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| GateError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
