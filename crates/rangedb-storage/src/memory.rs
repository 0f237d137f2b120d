//! In-memory backing store.
//!
//! Keeps composite keys in a `BTreeMap`. Useful for tests and for nodes
//! that do not need chain-indexed data to survive a restart.

use rangedb_core::{extract_index, Backend, Error, RangeDelete, Result};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Ordered in-memory key-value store with range deletion.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records
    pub fn len(&self) -> Result<usize> {
        let data = self.data.read().map_err(|_| Error::LockPoisoned)?;
        Ok(data.len())
    }

    /// Returns `true` if nothing is stored
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let data = self.data.read().map_err(|_| Error::LockPoisoned)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut data = self.data.write().map_err(|_| Error::LockPoisoned)?;
        data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut data = self.data.write().map_err(|_| Error::LockPoisoned)?;
        data.remove(key);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        let data = self.data.read().map_err(|_| Error::LockPoisoned)?;
        Ok(data.contains_key(key))
    }

    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        Some(self)
    }
}

impl RangeDelete for MemoryBackend {
    fn delete_range(&self, start: u64, end: u64) -> Result<()> {
        let mut data = self.data.write().map_err(|_| Error::LockPoisoned)?;
        // Decimal keys do not sort numerically, so every key is checked.
        // Keys that are not composite keys are left alone.
        data.retain(|key, _| match extract_index(key) {
            Ok(index) => !(start..end).contains(&index),
            Err(_) => true,
        });
        Ok(())
    }
}
