//! Prune engine.
//!
//! Pruning drops a half-open index range in one backend call and then
//! raises the floor. The floor only moves after the backend reports
//! success, so a failed prune can simply be retried.

use crate::store::{RangeDb, RANGE_DELETION};
use rangedb_core::{Backend, Error, Result};
use tracing::{debug, info, warn};

impl<B: Backend> RangeDb<B> {
    /// Deletes every record with an index in `[start, end)` and raises the
    /// floor to at least `end`.
    ///
    /// Ranges already below the floor are deleted again, which is harmless.
    /// If writes were active during the deletion, the range is swept a
    /// second time once the floor is raised, so no write that raced the
    /// prune stays stored below the floor.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRange`] if `start >= end`; nothing is touched.
    /// - Any backend error from the first deletion. The floor is unchanged
    ///   and the range may be partially deleted; retrying with the same or
    ///   a covering range completes it.
    pub fn prune(&self, start: u64, end: u64) -> Result<()> {
        if start >= end {
            return Err(Error::InvalidRange { start, end });
        }

        let deleter = self
            .backend
            .range_delete()
            .ok_or(Error::CapabilityMissing(RANGE_DELETION))?;

        let epoch = self.floor.write_epoch();
        if let Err(e) = deleter.delete_range(start, end) {
            warn!(start, end, error = %e, "Prune failed; floor unchanged");
            return Err(e);
        }

        let floor = self.floor.advance(end);

        if self.floor.writes_since(epoch) {
            debug!(start, end, "Writes raced the prune; sweeping range again");
            if let Err(e) = deleter.delete_range(start, end) {
                // The floor already masks anything left behind
                warn!(start, end, error = %e, "Second prune sweep failed");
            }
        }

        info!(start, end, floor, "Pruned index range");
        Ok(())
    }

    /// Deletes everything between the floor and `end`.
    ///
    /// Succeeds without touching the backend when `end` is at or below the
    /// floor.
    pub fn prune_below(&self, end: u64) -> Result<()> {
        let floor = self.floor();
        if end <= floor {
            return Ok(());
        }
        self.prune(floor, end)
    }
}
