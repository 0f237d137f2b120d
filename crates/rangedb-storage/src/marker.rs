//! Prune marker - the highest pruned index boundary, persisted on disk
//!
//! The marker lets a restarted node resume with the prune floor it had
//! before shutdown. It only ever moves forward.

use rangedb_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Marker file name inside the backend root directory
pub const MARKER_FILE: &str = "PRUNE_MARKER";
/// Temporary name used while replacing the marker
const MARKER_TMP: &str = "PRUNE_MARKER.tmp";
/// Current on-disk version
const MARKER_VERSION: u32 = 1;

/// On-disk contents of the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneMarker {
    /// Format version
    pub version: u32,
    /// Every index below this has been pruned
    pub floor: u64,
}

impl Default for PruneMarker {
    fn default() -> Self {
        Self {
            version: MARKER_VERSION,
            floor: 0,
        }
    }
}

/// Reads and advances the marker stored in `dir`
#[derive(Debug)]
pub struct MarkerFile {
    dir: PathBuf,
}

impl MarkerFile {
    /// Marker stored in the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load the marker, or the default when none has been written.
    ///
    /// An unreadable marker is treated as absent. Losing it only lowers the
    /// floor a restarted store starts from; it never resurrects data.
    pub fn load(&self) -> Result<PruneMarker> {
        let path = self.dir.join(MARKER_FILE);
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PruneMarker::default())
            }
            Err(e) => return Err(e.into()),
        };

        match bincode::deserialize::<PruneMarker>(&contents) {
            Ok(marker) => Ok(marker),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt prune marker");
                Ok(PruneMarker::default())
            }
        }
    }

    /// Raise the stored floor to at least `floor`.
    ///
    /// Returns the floor that is on disk afterwards.
    pub fn advance(&self, floor: u64) -> Result<u64> {
        let current = self.load()?;
        if floor <= current.floor {
            return Ok(current.floor);
        }

        let marker = PruneMarker {
            version: MARKER_VERSION,
            floor,
        };
        let encoded =
            bincode::serialize(&marker).map_err(|e| Error::Serialization(e.to_string()))?;

        let tmp_path = self.dir.join(MARKER_TMP);
        fs::write(&tmp_path, &encoded)?;
        fs::rename(&tmp_path, self.dir.join(MARKER_FILE))?;

        Ok(floor)
    }
}
