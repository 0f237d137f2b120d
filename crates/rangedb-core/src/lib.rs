//! # RangeDB Core
//!
//! Core types for RangeDB: the error type, the composite key codec and the
//! backing store contract.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of RangeDB.**
//!
//! Users should depend on the main [`rangedb`](https://crates.io/crates/rangedb)
//! crate instead, which re-exports everything needed from here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod key;

pub use backend::{Backend, RangeDelete};
pub use error::{Error, Result};
pub use key::{encode_key, extract_index, split_key, KEY_SEPARATOR};
