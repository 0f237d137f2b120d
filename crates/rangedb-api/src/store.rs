//! Range-indexed store.
//!
//! [`RangeDb`] layers chain-index semantics over a flat [`Backend`]:
//! records are addressed by `(index, key)`, and everything below the prune
//! floor is permanently empty.

use crate::floor::Floor;
use rangedb_core::{encode_key, Backend, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Name of the capability the store requires from its backend
pub(crate) const RANGE_DELETION: &str = "range deletion";

/// Store configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Floor the store starts with. Indices below it read as empty and
    /// ignore writes.
    pub initial_floor: u64,
}

impl StoreConfig {
    /// Start from the given floor
    pub fn with_initial_floor(mut self, floor: u64) -> Self {
        self.initial_floor = floor;
        self
    }
}

/// Key-value store indexed by `(index, key)` with a monotonic prune floor.
///
/// Thread-safe; share it behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use rangedb::{MemoryBackend, RangeDb};
///
/// let db = RangeDb::new(MemoryBackend::new())?;
/// db.set(1, b"block", b"body")?;
/// assert_eq!(db.get(1, b"block")?, Some(b"body".to_vec()));
///
/// db.prune(0, 2)?;
/// assert_eq!(db.floor(), 2);
/// assert!(!db.has(1, b"block")?);
/// # Ok::<(), rangedb::Error>(())
/// ```
#[derive(Debug)]
pub struct RangeDb<B: Backend> {
    pub(crate) backend: B,
    pub(crate) floor: Floor,
}

impl<B: Backend> RangeDb<B> {
    /// Creates a store with the floor at zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] if `backend` cannot delete
    /// index ranges. The error is fatal; see [`Error::is_fatal`].
    pub fn new(backend: B) -> Result<Self> {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Creates a store with custom configuration.
    ///
    /// # Errors
    ///
    /// Same as [`RangeDb::new`].
    pub fn with_config(backend: B, config: StoreConfig) -> Result<Self> {
        if backend.range_delete().is_none() {
            error!("Backing store has no range deletion; refusing to start");
            return Err(Error::CapabilityMissing(RANGE_DELETION));
        }

        Ok(Self {
            backend,
            floor: Floor::new(config.initial_floor),
        })
    }

    /// Smallest index that may hold records
    pub fn floor(&self) -> u64 {
        self.floor.get()
    }

    /// The backing store
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Retrieves the value stored at `(index, key)`.
    ///
    /// Indices below the floor read as absent without touching the backend.
    pub fn get(&self, index: u64, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if !self.floor.admits(index) {
            return Ok(None);
        }
        self.backend.get(&encode_key(index, key))
    }

    /// Returns `true` if a record exists at `(index, key)`.
    pub fn has(&self, index: u64, key: &[u8]) -> Result<bool> {
        if !self.floor.admits(index) {
            return Ok(false);
        }
        self.backend.has(&encode_key(index, key))
    }

    /// Stores `value` at `(index, key)`.
    ///
    /// A write below the floor succeeds without storing anything, including
    /// one that a concurrent prune overtakes while it is in flight.
    pub fn set(&self, index: u64, key: &[u8], value: &[u8]) -> Result<()> {
        let _ticket = self.floor.begin_write();
        if !self.floor.admits(index) {
            debug!(index, floor = self.floor(), "Dropping write below prune floor");
            return Ok(());
        }

        let composite = encode_key(index, key);
        if let Err(e) = self.backend.set(&composite, value) {
            if self.floor.admits(index) {
                return Err(e);
            }
            debug!(index, error = %e, "Write failed after prune passed its index");
            return Ok(());
        }

        // A prune may have passed this index while the write was in flight
        if !self.floor.admits(index) {
            warn!(index, floor = self.floor(), "Rolling back write overtaken by prune");
            if let Err(e) = self.backend.delete(&composite) {
                // Masked by the floor; the prune sweeps it on seeing this write
                warn!(index, error = %e, "Rollback failed");
            }
        }
        Ok(())
    }

    /// Removes the record at `(index, key)`. Absent records are fine.
    ///
    /// Never changes the floor.
    pub fn delete(&self, index: u64, key: &[u8]) -> Result<()> {
        self.backend.delete(&encode_key(index, key))
    }
}
