// Common test utilities for RangeDB integration tests
#![allow(dead_code)]

use rangedb::{
    Backend, Error, FileBackend, FileDbConfig, MemoryBackend, RangeDb, RangeDelete, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Barrier, RwLock};
use tempfile::TempDir;

pub const KEY: &[u8] = b"key";
pub const VALUE: &[u8] = b"value";

/// Backend with point operations only
#[derive(Debug, Default)]
pub struct PointOnlyBackend {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl Backend for PointOnlyBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().map_err(|_| Error::LockPoisoned)?.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data
            .write()
            .map_err(|_| Error::LockPoisoned)?
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.data.write().map_err(|_| Error::LockPoisoned)?.remove(key);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.data.read().map_err(|_| Error::LockPoisoned)?.contains_key(key))
    }
}

/// Memory backend whose range deletion fails a set number of times.
///
/// A failing call still deletes the first index of the range, leaving the
/// range partially pruned.
pub struct FlakyBackend {
    inner: MemoryBackend,
    failures_left: AtomicUsize,
}

impl FlakyBackend {
    pub fn failing(times: usize) -> Self {
        Self {
            inner: MemoryBackend::new(),
            failures_left: AtomicUsize::new(times),
        }
    }
}

impl Backend for FlakyBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.inner.delete(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        self.inner.has(key)
    }

    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        Some(self)
    }
}

impl RangeDelete for FlakyBackend {
    fn delete_range(&self, start: u64, end: u64) -> Result<()> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            self.inner.delete_range(start, start + 1)?;
            return Err(Error::Storage("injected range deletion failure".into()));
        }
        self.inner.delete_range(start, end)
    }
}

/// Memory backend whose first range deletion parks after deleting.
///
/// The deleting thread meets the test at `deleted` once the records are
/// gone, then waits at `resume` before returning, holding the prune
/// between its deletion and its floor update.
pub struct GatedBackend {
    pub inner: MemoryBackend,
    pub deleted: Barrier,
    pub resume: Barrier,
    gated: AtomicBool,
}

impl GatedBackend {
    pub fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            deleted: Barrier::new(2),
            resume: Barrier::new(2),
            gated: AtomicBool::new(true),
        }
    }
}

impl Backend for GatedBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.inner.delete(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        self.inner.has(key)
    }

    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        Some(self)
    }
}

impl RangeDelete for GatedBackend {
    fn delete_range(&self, start: u64, end: u64) -> Result<()> {
        self.inner.delete_range(start, end)?;
        if self.gated.swap(false, Ordering::SeqCst) {
            self.deleted.wait();
            self.resume.wait();
        }
        Ok(())
    }
}

/// Store over a fresh file backend in a temporary directory
pub struct FileFixture {
    pub temp_dir: TempDir,
    pub db: RangeDb<FileBackend>,
}

impl FileFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = FileDbConfig::new(temp_dir.path().join("db"))
            .with_extension("txt")
            .with_dir_permissions(0o700);
        let backend = FileBackend::open(config).expect("Failed to open file backend");
        let db = RangeDb::new(backend).expect("File backend supports range deletion");
        Self { temp_dir, db }
    }
}

pub fn memory_db() -> RangeDb<MemoryBackend> {
    RangeDb::new(MemoryBackend::new()).expect("Memory backend supports range deletion")
}

/// Writes `KEY` at every index in `from..=to`
pub fn populate<B: Backend>(db: &RangeDb<B>, from: u64, to: u64) -> Result<()> {
    for index in from..=to {
        db.set(index, KEY, VALUE)?;
    }
    Ok(())
}

pub fn require_exist<B: Backend>(db: &RangeDb<B>, from: u64, to: u64) {
    for index in from..=to {
        assert!(
            db.has(index, KEY).unwrap(),
            "Index {} should not have been pruned",
            index
        );
    }
}

pub fn require_not_exist<B: Backend>(db: &RangeDb<B>, from: u64, to: u64) {
    for index in from..=to {
        assert!(
            !db.has(index, KEY).unwrap(),
            "Index {} should have been pruned",
            index
        );
    }
}

/// Every index below the floor must read as empty
pub fn require_empty_below_floor<B: Backend>(db: &RangeDb<B>) {
    let floor = db.floor();
    if floor > 0 {
        require_not_exist(db, 0, floor - 1);
    }
}
