//! # RangeDB Storage
//!
//! Concrete backing stores for RangeDB.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of RangeDB.**
//!
//! Users should depend on the main [`rangedb`](https://crates.io/crates/rangedb)
//! crate instead, which re-exports these backends.
//!
//! ---
//!
//! - **MemoryBackend**: ordered in-memory map, lost on drop
//! - **FileBackend**: one directory per index, one file per record
//! - **Prune marker**: persisted prune boundary for the file backend
//!
//! Both backends support bulk range deletion and can therefore back a
//! `RangeDb`.

#![warn(missing_docs)]

pub mod file;
pub mod marker;
pub mod memory;

pub use file::{FileBackend, FileDbConfig};
pub use marker::{MarkerFile, PruneMarker};
pub use memory::MemoryBackend;
