//! The admission controller.
//!
//! [`MemoryManager`] hands out quota for the declared peak working set of
//! concurrent jobs and bounds the total outstanding at once. Callers acquire
//! quota with [`request`](MemoryManager::request) before allocating and hand
//! it back with [`release`](MemoryManager::release) when done. A request the
//! pool cannot cover parks in a per-class FIFO until enough quota comes back
//! or the process stop signal fires.
//!
//! # Locking
//!
//! A single [`parking_lot::Mutex`] guards the ledger and both wait queues.
//! The lock is never held across an await point: the request path parks on a
//! one-shot grant signal created under the lock and awaited outside it, and
//! the release path runs synchronously under the lock from start to finish,
//! including the heap compaction pass when the churn counter crosses its
//! threshold. Compaction stalling other callers is accepted: the pass is
//! rare, and running it inline keeps the threshold accounting in one place.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::compact::{Compactor, NoopCompactor};
use crate::config::PoolConfig;
use crate::error::PoolResult;
use crate::ledger::{Credit, Ledger, Priority};
use crate::queue::{WaitQueues, Waiter};

/// Snapshot of the pool's accounting, queues, and lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStatus {
    /// Bytes currently admissible.
    pub available: u64,
    /// Nominal pool size.
    pub base: u64,
    /// Bytes reserved for high-priority callers.
    pub priority_reserve: u64,
    /// Debt outstanding from an oversized borrow.
    pub underflow: u64,
    /// Normal-class waiters currently parked.
    pub waiting_normal: usize,
    /// High-priority waiters currently parked.
    pub waiting_priority: usize,
    /// Bytes asked for by parked normal-class waiters.
    pub waiting_normal_bytes: u64,
    /// Bytes asked for by parked high-priority waiters.
    pub waiting_priority_bytes: u64,
    /// Requests granted over the pool's lifetime.
    pub grants: u64,
    /// Requests that parked before being granted or giving up.
    pub waits: u64,
    /// Heap compaction passes triggered.
    pub compactions: u64,
    /// Accounting violations observed (more quota returned than granted).
    pub violations: u64,
}

impl PoolStatus {
    /// Bytes granted and not yet returned.
    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.base - self.available + self.underflow
    }
}

/// Priority-aware admission control over a byte-denominated quota pool.
///
/// The pool starts at `base` bytes and admits requests until their sum would
/// exceed it; further requests park in FIFO order. A `priority_reserve`
/// slice of the pool is invisible to normal-class callers, so low-volume
/// high-priority work rides through a backlog of bulk requests with zero
/// wait. A single request larger than the whole pool is admitted once the
/// pool is fully idle, carrying the difference as debt that later returns
/// pay down first.
///
/// The pool accounts bytes; it never allocates, and nothing checks that a
/// release matches an earlier grant. Mismatched callers are caught only by
/// the over-return clamp, which logs an accounting violation and continues.
pub struct MemoryManager {
    state: Mutex<State>,
    compactor: Arc<dyn Compactor>,
    compact_threshold: u64,
    stop: CancellationToken,
    /// Send side of the wait-hint channel. Single slot, best effort.
    wait_tx: mpsc::Sender<()>,
    /// Read side of the wait-hint channel, handed out once.
    wait_rx: Mutex<Option<mpsc::Receiver<()>>>,
    grants: AtomicU64,
    waits: AtomicU64,
    compactions: AtomicU64,
    violations: AtomicU64,
}

struct State {
    ledger: Ledger,
    queues: WaitQueues,
}

impl MemoryManager {
    /// Creates a pool with a no-op compaction hook.
    ///
    /// The `stop` token is owned by the host process; cancelling it unparks
    /// every waiting request with a not-acquired result.
    pub fn new(config: PoolConfig, stop: CancellationToken) -> PoolResult<Self> {
        Self::with_compactor(config, stop, Arc::new(NoopCompactor))
    }

    /// Creates a pool that runs `compactor` after every threshold's worth of
    /// returned quota.
    pub fn with_compactor(
        config: PoolConfig,
        stop: CancellationToken,
        compactor: Arc<dyn Compactor>,
    ) -> PoolResult<Self> {
        config.validate()?;
        let (wait_tx, wait_rx) = mpsc::channel(1);

        Ok(Self {
            state: Mutex::new(State {
                ledger: Ledger::new(config.base, config.priority_reserve),
                queues: WaitQueues::new(),
            }),
            compactor,
            compact_threshold: config.compact_threshold,
            stop,
            wait_tx,
            wait_rx: Mutex::new(Some(wait_rx)),
            grants: AtomicU64::new(0),
            waits: AtomicU64::new(0),
            compactions: AtomicU64::new(0),
            violations: AtomicU64::new(0),
        })
    }

    /// Acquires `amount` bytes of quota, parking until the pool can cover
    /// the request.
    ///
    /// Returns `true` once the quota is reserved. Returns `false` only when
    /// the stop token fired while the request was parked; the quota was
    /// never granted. The stop token is observed only while parked, so a
    /// request arriving after shutdown can still succeed against a pool
    /// with capacity.
    ///
    /// A request is admitted ahead of the queues only when nobody it would
    /// overtake is already parked: no priority waiter, and for normal-class
    /// requests no normal waiter either. Otherwise it joins the back of its
    /// class queue, and admission within the class is strictly FIFO.
    ///
    /// Every `true` obliges the caller to a matching
    /// [`release`](Self::release); the pool does not enforce the match.
    pub async fn request(&self, amount: u64, priority: Priority) -> bool {
        let granted = {
            let mut state = self.state.lock();
            if state.queues.admission_clear(priority) && state.ledger.try_admit(amount, priority) {
                self.grants.fetch_add(1, Ordering::Relaxed);
                return true;
            }
            let (waiter, granted) = Waiter::new(amount);
            state.queues.push(priority, waiter);
            granted
        };

        // Best-effort hint that a request just parked; a full slot is
        // dropped. Tests use this to line waiters up deterministically.
        let _ = self.wait_tx.try_send(());
        self.waits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(amount, ?priority, "quota request parked");

        // When both signals are ready the grant wins: once a drain has
        // debited the pool the quota must be treated as held.
        tokio::select! {
            biased;
            outcome = granted => outcome.is_ok(),
            () = self.stop.cancelled() => false,
        }
    }

    /// Returns `amount` bytes of quota and unparks every waiter the
    /// replenished pool can now admit, priority class first, FIFO within a
    /// class, strictly head-only.
    ///
    /// Underflow debt from an oversized borrow is paid down before anything
    /// becomes available; a return swallowed whole by the debt unparks
    /// nobody. Returning more than was granted clamps the pool to `base`
    /// and logs an accounting violation rather than aborting.
    ///
    /// Runs entirely under the pool lock, including the compaction pass.
    pub fn release(&self, amount: u64) {
        let mut state = self.state.lock();

        if state.ledger.note_returned(amount, self.compact_threshold) {
            self.compactions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(amount, "compaction threshold crossed; compacting heap");
            self.compactor.compact();
        }

        match state.ledger.credit(amount) {
            Credit::PaidDebt => return,
            Credit::OverReturn { excess } => {
                self.violations.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    excess,
                    "more quota returned than granted; clamping available to pool base"
                );
            }
            Credit::Credited => {}
        }

        let State { ledger, queues } = &mut *state;
        let granted = queues.drain(ledger);
        if granted > 0 {
            self.grants.fetch_add(granted as u64, Ordering::Relaxed);
            tracing::trace!(granted, "drain unparked waiting requests");
        }
    }

    /// Snapshot of the pool's accounting and queues.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let state = self.state.lock();
        PoolStatus {
            available: state.ledger.available(),
            base: state.ledger.base(),
            priority_reserve: state.ledger.priority_reserve(),
            underflow: state.ledger.underflow(),
            waiting_normal: state.queues.waiting(Priority::Normal),
            waiting_priority: state.queues.waiting(Priority::High),
            waiting_normal_bytes: state.queues.waiting_bytes(Priority::Normal),
            waiting_priority_bytes: state.queues.waiting_bytes(Priority::High),
            grants: self.grants.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            compactions: self.compactions.load(Ordering::Relaxed),
            violations: self.violations.load(Ordering::Relaxed),
        }
    }

    /// Takes the read side of the wait-hint channel.
    ///
    /// A unit is sent, best effort into a single slot, every time a request
    /// parks. Intended for tests and instrumentation that need waiters
    /// lined up in a known order. Returns `None` after the first call.
    pub fn wait_hints(&self) -> Option<mpsc::Receiver<()>> {
        self.wait_rx.lock().take()
    }
}

impl fmt::Debug for MemoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status();
        f.debug_struct("MemoryManager")
            .field("available", &status.available)
            .field("base", &status.base)
            .field("priority_reserve", &status.priority_reserve)
            .field("underflow", &status.underflow)
            .field("waiting_normal", &status.waiting_normal)
            .field("waiting_priority", &status.waiting_priority)
            .finish()
    }
}
