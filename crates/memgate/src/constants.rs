//! Process-wide defaults for the admission pool.
//!
//! These values seed [`PoolConfig::default`](crate::PoolConfig::default) and
//! are sized for a long-running service that dispatches many concurrent jobs
//! with declared working sets in the tens of megabytes.

// =============================================================================
// Pool Sizing
// =============================================================================

/// Default size of the quota pool (512 MiB).
///
/// This bounds the aggregate declared working set of all jobs admitted at
/// once. It is an accounting budget, not an allocation: the pool never
/// reserves real memory.
pub const DEFAULT_POOL_BYTES: u64 = 512 * 1024 * 1024;

/// Default slice of the pool reserved for high-priority callers (128 MiB).
///
/// A quarter of the default pool. Normal-priority callers see the pool as if
/// this slice did not exist, which keeps low-volume high-priority work at
/// zero wait even under a backlog of bulk requests.
pub const DEFAULT_PRIORITY_RESERVE_BYTES: u64 = DEFAULT_POOL_BYTES / 4;

// =============================================================================
// Heap Compaction
// =============================================================================

/// Default amount of returned quota between heap compactions (one pool).
///
/// Once more than this many bytes have been handed back since the last pass,
/// the pool invokes its [`Compactor`](crate::Compactor) hook. Tying the
/// threshold to the default pool size makes compaction fire roughly once per
/// pool's worth of churn, which in practice sheds resident memory without a
/// measurable throughput cost.
pub const DEFAULT_COMPACT_THRESHOLD_BYTES: u64 = DEFAULT_POOL_BYTES;
