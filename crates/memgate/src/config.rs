//! Admission pool configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMPACT_THRESHOLD_BYTES, DEFAULT_POOL_BYTES, DEFAULT_PRIORITY_RESERVE_BYTES,
};
use crate::error::{PoolError, PoolResult};

/// Configuration for a [`MemoryManager`](crate::MemoryManager).
///
/// # Example
///
/// ```rust
/// use memgate::PoolConfig;
///
/// let config = PoolConfig::new(64 * 1024 * 1024).with_priority_reserve(8 * 1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Nominal pool size in bytes; the aggregate working-set budget.
    pub base: u64,
    /// Bytes within `base` off-limits to normal-priority callers.
    pub priority_reserve: u64,
    /// Returned bytes between heap compaction passes.
    pub compact_threshold: u64,
}

impl PoolConfig {
    /// Creates a configuration for a pool of `base` bytes.
    ///
    /// A quarter of the pool is reserved for high-priority callers; the
    /// compaction threshold keeps its process-wide default.
    #[must_use]
    pub fn new(base: u64) -> Self {
        Self {
            base,
            priority_reserve: base / 4,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD_BYTES,
        }
    }

    /// Sets the priority reserve.
    #[must_use]
    pub fn with_priority_reserve(mut self, bytes: u64) -> Self {
        self.priority_reserve = bytes;
        self
    }

    /// Sets the compaction threshold.
    #[must_use]
    pub fn with_compact_threshold(mut self, bytes: u64) -> Self {
        self.compact_threshold = bytes;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PoolResult<()> {
        if self.base == 0 {
            return Err(PoolError::config("pool base must be greater than 0"));
        }
        if self.priority_reserve > self.base {
            return Err(PoolError::ReserveExceedsBase {
                reserve: self.priority_reserve,
                base: self.base,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_POOL_BYTES,
            priority_reserve: DEFAULT_PRIORITY_RESERVE_BYTES,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = PoolConfig::new(100);
        assert_eq!(config.base, 100);
        assert_eq!(config.priority_reserve, 25);
        assert_eq!(config.compact_threshold, DEFAULT_COMPACT_THRESHOLD_BYTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.base, DEFAULT_POOL_BYTES);
        assert_eq!(config.priority_reserve, DEFAULT_PRIORITY_RESERVE_BYTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PoolConfig::new(1000)
            .with_priority_reserve(300)
            .with_compact_threshold(500);

        assert_eq!(config.priority_reserve, 300);
        assert_eq!(config.compact_threshold, 500);
    }

    #[test]
    fn test_zero_base_rejected() {
        let config = PoolConfig::new(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reserve_larger_than_base_rejected() {
        let config = PoolConfig::new(10).with_priority_reserve(11);
        assert!(matches!(
            config.validate(),
            Err(PoolError::ReserveExceedsBase {
                reserve: 11,
                base: 10
            })
        ));
    }

    #[test]
    fn test_reserve_equal_to_base_allowed() {
        let config = PoolConfig::new(10).with_priority_reserve(10);
        assert!(config.validate().is_ok());
    }
}
