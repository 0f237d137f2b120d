//! Backing store contract.
//!
//! A [`Backend`] is the flat key-value medium a range-indexed store is built
//! on. Keys handed to it are composite keys produced by
//! [`encode_key`](crate::key::encode_key). Backends that can drop a whole
//! index range in one call also implement [`RangeDelete`] and expose it
//! through [`Backend::range_delete`].

use crate::Result;
use std::sync::Arc;

/// Point operations every backing store must provide.
///
/// All methods take `&self`; implementations serialize access internally
/// so a single backend can be shared across threads.
pub trait Backend: Send + Sync {
    /// Retrieve a value by composite key
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite a value
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove a value. Removing an absent key succeeds.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Check whether a key is present
    fn has(&self, key: &[u8]) -> Result<bool>;

    /// Bulk range deletion, if this backend supports it.
    ///
    /// Backends implementing [`RangeDelete`] override this to return
    /// `Some(self)`.
    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        None
    }
}

/// Index-granular bulk deletion.
pub trait RangeDelete: Send + Sync {
    /// Delete every record whose index lies in `[start, end)`.
    ///
    /// Must be idempotent: deleting indices that hold no records succeeds.
    /// A failure may leave the range partially deleted.
    fn delete_range(&self, start: u64, end: u64) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        (**self).has(key)
    }

    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        (**self).range_delete()
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        (**self).has(key)
    }

    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        (**self).range_delete()
    }
}
