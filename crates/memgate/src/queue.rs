//! Blocked requests and the two-class wait queues.
//!
//! A request the pool cannot cover parks as a [`Waiter`] in the FIFO for its
//! admission class. The release path drains the queues head-first, priority
//! class first, handing each admitted waiter its one-shot grant signal.

use std::collections::VecDeque;

use tokio::sync::oneshot;

use crate::ledger::{Ledger, Priority};

/// A single parked request.
///
/// Lives in exactly one class queue from park to grant. The pool owns the
/// send side of the grant signal; the parked caller owns the receive side
/// and also watches the process stop signal.
#[derive(Debug)]
pub(crate) struct Waiter {
    amount: u64,
    grant: oneshot::Sender<()>,
}

impl Waiter {
    /// Creates a waiter for `amount` bytes and the receive side of its grant
    /// signal.
    pub fn new(amount: u64) -> (Self, oneshot::Receiver<()>) {
        let (grant, granted) = oneshot::channel();
        (Self { amount, grant }, granted)
    }

    /// Fires the grant signal, consuming the waiter.
    ///
    /// A caller that already gave up on shutdown has dropped its receive
    /// side; the send result is ignored since the quota was debited either
    /// way.
    fn grant(self) {
        let _ = self.grant.send(());
    }
}

/// The two wait queues, one per admission class.
///
/// FIFO within a class; the priority queue strictly drains first.
#[derive(Debug, Default)]
pub(crate) struct WaitQueues {
    priority: VecDeque<Waiter>,
    normal: VecDeque<Waiter>,
}

impl WaitQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a fresh `class` request may try admission ahead of the
    /// queues: no priority waiter is parked, and for a normal-class request
    /// no normal waiter either. An arrival behind a non-empty queue of its
    /// own class joins the back instead of overtaking it.
    pub fn admission_clear(&self, class: Priority) -> bool {
        self.priority.is_empty() && (class.is_high() || self.normal.is_empty())
    }

    /// Parks a waiter at the back of its class queue.
    pub fn push(&mut self, class: Priority, waiter: Waiter) {
        match class {
            Priority::High => self.priority.push_back(waiter),
            Priority::Normal => self.normal.push_back(waiter),
        }
    }

    /// Releases parked waiters for as long as the ledger admits them,
    /// priority class first, strictly head-only. Returns how many waiters
    /// were granted.
    ///
    /// A head that does not fit ends its class without considering later
    /// entries, so a large request at the head cannot be starved by smaller
    /// ones behind it. A priority head that does not fit ends the whole
    /// drain: a parked priority waiter blocks the normal class outright, no
    /// matter the byte amounts involved.
    pub fn drain(&mut self, ledger: &mut Ledger) -> usize {
        let mut granted = 0;

        while let Some(head) = self.priority.front() {
            if !ledger.try_admit(head.amount, Priority::High) {
                return granted;
            }
            if let Some(waiter) = self.priority.pop_front() {
                waiter.grant();
                granted += 1;
            }
        }

        while let Some(head) = self.normal.front() {
            if !ledger.try_admit(head.amount, Priority::Normal) {
                break;
            }
            if let Some(waiter) = self.normal.pop_front() {
                waiter.grant();
                granted += 1;
            }
        }

        granted
    }

    /// Number of waiters parked in the `class` queue.
    pub fn waiting(&self, class: Priority) -> usize {
        match class {
            Priority::High => self.priority.len(),
            Priority::Normal => self.normal.len(),
        }
    }

    /// Total bytes asked for by waiters parked in the `class` queue.
    pub fn waiting_bytes(&self, class: Priority) -> u64 {
        let queue = match class {
            Priority::High => &self.priority,
            Priority::Normal => &self.normal,
        };
        queue.iter().map(|waiter| waiter.amount).sum()
    }
}
