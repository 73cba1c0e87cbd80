//! Error types for pool construction.

use thiserror::Error;

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur while building an admission pool.
///
/// Only construction can fail. The request and release paths report nothing:
/// a request returns `false` on shutdown, and a release always succeeds.
#[derive(Debug, Error)]
#[allow(missing_docs)] // Fields are documented by variant docs
pub enum PoolError {
    /// The priority reserve does not fit inside the pool.
    #[error("priority reserve ({reserve} bytes) exceeds pool base ({base} bytes)")]
    ReserveExceedsBase { reserve: u64, base: u64 },

    /// Configuration rejected by validation.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl PoolError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
