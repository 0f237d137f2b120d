//! Error types for RangeDB.

use std::fmt;
use std::num::ParseIntError;

/// The main error type for RangeDB operations.
#[derive(Debug)]
pub enum Error {
    /// Composite key carries no separator byte
    InvalidKeyFormat,

    /// Index segment of a composite key is not an unsigned decimal integer
    IndexParse(ParseIntError),

    /// Prune range with `start >= end`
    InvalidRange {
        /// Inclusive lower bound that was requested
        start: u64,
        /// Exclusive upper bound that was requested
        end: u64,
    },

    /// The backing store lacks a capability the store requires.
    ///
    /// Raised only while constructing a store. Treat it as a deployment
    /// defect: the process should refuse to start.
    CapabilityMissing(&'static str),

    /// A lock was poisoned (internal error)
    LockPoisoned,

    /// I/O error from the backing store
    Io(std::io::Error),

    /// Serialization/deserialization error
    Serialization(String),

    /// Backing store error
    Storage(String),
}

impl Error {
    /// Returns `true` if this error must halt initialization.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::CapabilityMissing(_))
    }

    /// Returns `true` if this error originated in the backing store.
    pub fn is_backing(&self) -> bool {
        matches!(
            self,
            Error::LockPoisoned | Error::Io(_) | Error::Serialization(_) | Error::Storage(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyFormat => write!(f, "invalid key format"),
            Error::IndexParse(e) => write!(f, "invalid index: {}", e),
            Error::InvalidRange { start, end } => {
                write!(f, "invalid range: start {} must be below end {}", start, end)
            }
            Error::CapabilityMissing(what) => {
                write!(f, "backing store does not support {}", what)
            }
            Error::LockPoisoned => write!(f, "Lock poisoned"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::IndexParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ParseIntError> for Error {
    fn from(err: ParseIntError) -> Self {
        Error::IndexParse(err)
    }
}

/// A specialized `Result` type for RangeDB operations.
pub type Result<T> = std::result::Result<T, Error>;
