//! Prune floor guard.
//!
//! The floor is a single atomic word: readers load it, prunes raise it with
//! `fetch_max`. Nothing holds it across backing-store I/O.
//!
//! The guard also counts writes. A write that commits after a prune's
//! deletion but checks the floor before the prune raises it would survive
//! below the floor; the counters let the prune notice such writes and sweep
//! its range once more.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic lower bound below which no record is visible.
#[derive(Debug, Default)]
pub struct Floor {
    value: AtomicU64,
    /// Writes between their first floor check and their last
    writes_in_flight: AtomicU64,
    /// Writes finished since creation, wrapping
    writes_done: AtomicU64,
}

/// Marks a write as in flight until dropped
#[derive(Debug)]
pub struct WriteTicket<'a> {
    floor: &'a Floor,
}

impl Drop for WriteTicket<'_> {
    fn drop(&mut self) {
        self.floor.writes_done.fetch_add(1, Ordering::SeqCst);
        self.floor.writes_in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Write activity observed at the start of a prune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEpoch(u64);

impl Floor {
    /// Creates a floor starting at `initial`
    pub fn new(initial: u64) -> Self {
        Self {
            value: AtomicU64::new(initial),
            ..Default::default()
        }
    }

    /// Current floor
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Returns `true` if records at `index` are visible
    pub fn admits(&self, index: u64) -> bool {
        index >= self.get()
    }

    /// Raises the floor to `end` unless it is already higher.
    ///
    /// Returns the floor after the update.
    pub fn advance(&self, end: u64) -> u64 {
        let previous = self.value.fetch_max(end, Ordering::SeqCst);
        previous.max(end)
    }

    /// Registers a write. Take the ticket before the first floor check.
    pub fn begin_write(&self) -> WriteTicket<'_> {
        self.writes_in_flight.fetch_add(1, Ordering::SeqCst);
        WriteTicket { floor: self }
    }

    /// Snapshot of finished writes, taken before a prune deletes anything
    pub fn write_epoch(&self) -> WriteEpoch {
        WriteEpoch(self.writes_done.load(Ordering::SeqCst))
    }

    /// Returns `true` if a write was in flight or finished since `epoch`.
    ///
    /// Called after the floor is raised. `false` means no write could have
    /// committed below the new floor without rolling itself back.
    pub fn writes_since(&self, epoch: WriteEpoch) -> bool {
        self.writes_in_flight.load(Ordering::SeqCst) > 0
            || self.writes_done.load(Ordering::SeqCst) != epoch.0
    }
}
