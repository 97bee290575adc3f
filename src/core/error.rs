//! Error types for the concurrency-limiting primitives.

use thiserror::Error;

/// Errors produced at construction time.
///
/// Operation failures are never represented here: `run`/`submit` propagate
/// the wrapped operation's own error verbatim, and a redundant permit
/// release is a boolean `false`, not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// Capacity must be a positive integer.
    #[error("invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),
    /// Configuration failed validation, with context.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result alias for constructor and configuration paths.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GateError::InvalidCapacity(0).to_string(),
            "invalid capacity: 0 (must be at least 1)"
        );
        assert_eq!(
            GateError::InvalidConfig("pool `gpu` invalid".into()).to_string(),
            "invalid config: pool `gpu` invalid"
        );
    }
}
