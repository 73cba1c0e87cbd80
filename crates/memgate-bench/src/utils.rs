//! Shared helpers for benchmark setup.

use std::sync::Arc;

use memgate::{MemoryManager, PoolConfig};
use tokio_util::sync::CancellationToken;

/// Builds a single-threaded runtime for driving async benchmarks.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

/// Builds a pool of `base` bytes with `reserve` set aside for priority work.
pub fn pool(base: u64, reserve: u64) -> (Arc<MemoryManager>, CancellationToken) {
    let stop = CancellationToken::new();
    let config = PoolConfig::new(base).with_priority_reserve(reserve);
    let manager = MemoryManager::new(config, stop.clone()).expect("valid config");
    (Arc::new(manager), stop)
}
