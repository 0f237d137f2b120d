//! # RangeDB
//!
//! A range-indexed key-value store for chain-indexed data (block bodies,
//! sidecars, proofs) with a bounded retention window.
//!
//! Records are addressed by `(index, key)`, where the index is typically a
//! slot number. Old indices are dropped in bulk with [`RangeDb::prune`],
//! which raises a monotonic *floor*. Once an index falls below the floor it
//! stays empty: reads report nothing and writes are silently dropped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rangedb::{FileBackend, FileDbConfig, RangeDb, StoreConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = FileBackend::open(FileDbConfig::new("./sidecars"))?;
//!
//!     // Resume from the floor recorded by earlier prunes
//!     let config = StoreConfig::default().with_initial_floor(backend.recorded_floor()?);
//!     let db = RangeDb::with_config(backend, config)?;
//!
//!     db.set(100, b"blob-0", b"...")?;
//!     db.prune(0, 100)?;
//!     assert!(db.has(100, b"blob-0")?);
//!     Ok(())
//! }
//! ```
//!
//! ## Backends
//!
//! Any [`Backend`] works as long as it can delete index ranges
//! ([`RangeDelete`]). A backend without that capability is rejected at
//! construction with a fatal [`Error::CapabilityMissing`]; pruning never
//! falls back to deleting keys one by one.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod floor;
pub mod logging;
mod prune;
mod store;

// Re-export core types
pub use rangedb_core::{
    encode_key, extract_index, split_key, Backend, Error, RangeDelete, Result, KEY_SEPARATOR,
};

// Backends
pub use rangedb_storage::{FileBackend, FileDbConfig, MemoryBackend};

pub use store::{RangeDb, StoreConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
