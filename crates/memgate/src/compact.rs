//! Heap compaction hooks.
//!
//! After enough quota has been handed back, the pool runs a process-wide
//! heap compaction to shed resident memory. What "compaction" means belongs
//! to the host: a jemalloc purge, a glibc `malloc_trim`, or nothing at all.
//! The pool only decides when to call the hook.

/// A process-wide heap compaction pass.
///
/// Invoked synchronously from the release path while the pool lock is held,
/// so implementations should reclaim what they can and come back; every
/// other caller of the pool stalls until the pass finishes. There is no
/// return value and no error: a hook that can fail should log and swallow.
pub trait Compactor: Send + Sync {
    /// Runs one compaction pass.
    fn compact(&self);
}

/// A compactor that does nothing.
///
/// The default for hosts without an allocator-specific reclamation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompactor;

impl Compactor for NoopCompactor {
    fn compact(&self) {}
}

impl<F> Compactor for F
where
    F: Fn() + Send + Sync,
{
    fn compact(&self) {
        self();
    }
}
