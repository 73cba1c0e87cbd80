//! # memgate
//!
//! Priority-aware memory admission control for processes that dispatch many
//! concurrent jobs.
//!
//! Each job declares its peak working set up front, acquires that many bytes
//! of quota from a shared pool before allocating, and hands them back when
//! it finishes. When the pool cannot cover a request the caller parks until
//! enough quota is returned or the process shuts down. The pool only
//! accounts bytes; it never allocates memory itself.
//!
//! - **Two admission classes**: a slice of the pool is reserved for
//!   high-priority callers, and normal callers see the pool as if that
//!   slice did not exist. Each class is FIFO and the priority class always
//!   drains first.
//! - **Oversized borrows**: a request larger than the whole pool is
//!   admitted once the pool is fully idle, carrying the difference as debt
//!   that later returns pay down. Large jobs stay live instead of
//!   deadlocking on a budget they can never meet.
//! - **Heap compaction**: after a configurable amount of quota has churned
//!   through the pool, a process-wide [`Compactor`] hook runs to shed
//!   resident memory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use memgate::{MemoryManager, PoolConfig, Priority};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let stop = CancellationToken::new();
//!     let pool = Arc::new(MemoryManager::new(PoolConfig::new(1 << 30), stop.clone())?);
//!
//!     // Acquire quota for a job with a 16 MiB working set.
//!     if pool.request(16 << 20, Priority::Normal).await {
//!         // ... run the job within its declared working set ...
//!         pool.release(16 << 20);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compact;
pub mod config;
pub mod constants;
pub mod error;
mod ledger;
mod manager;
mod queue;

pub use compact::{Compactor, NoopCompactor};
pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use ledger::Priority;
pub use manager::{MemoryManager, PoolStatus};
