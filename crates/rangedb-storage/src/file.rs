//! Filesystem backing store
//!
//! Records live one directory per index:
//!
//! ```text
//! <root>/
//!   PRUNE_MARKER
//!   41/
//!     <hex(sub-key)>.<extension>
//!   42/
//!     <first 128 hex chars>/<next 128>/.../<rest>.<extension>
//! ```
//!
//! Hex-encoded sub-keys longer than one path component are split across
//! nested directories, so any sub-key length fits under `NAME_MAX`.
//!
//! Range deletion removes whole index directories, so pruning cost scales
//! with the number of indices stored rather than the number of records.
//! A directory is first renamed aside and then removed; writers racing the
//! prune recreate a fresh index directory instead of adding files to the
//! one being torn down.

use crate::marker::MarkerFile;
use rangedb_core::key::parse_index;
use rangedb_core::{split_key, Backend, Error, RangeDelete, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Default record file extension
const DEFAULT_EXTENSION: &str = "sidecar";
/// Default permission bits for created directories
const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Longest hex run stored in a single path component
const MAX_NAME_HEX: usize = 128;
/// Longest accepted extension; keeps file names under 255 bytes
const MAX_EXTENSION_LEN: usize = 64;
/// Name prefix of index directories detached by a range deletion
const DETACHED_PREFIX: &str = ".pruning-";
/// Attempts for a write whose directory keeps vanishing under a prune
const WRITE_ATTEMPTS: usize = 8;

/// Filesystem backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDbConfig {
    /// Directory holding one subdirectory per index
    pub root_dir: PathBuf,
    /// Extension appended to every record file
    pub extension: String,
    /// Permission bits for created directories (unix only)
    pub dir_permissions: u32,
}

impl Default for FileDbConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("rangedb"),
            extension: DEFAULT_EXTENSION.to_string(),
            dir_permissions: DEFAULT_DIR_PERMISSIONS,
        }
    }
}

impl FileDbConfig {
    /// Config rooted at `root_dir` with default extension and permissions
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Default::default()
        }
    }

    /// Set the record file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the permission bits for created directories
    pub fn with_dir_permissions(mut self, mode: u32) -> Self {
        self.dir_permissions = mode;
        self
    }
}

/// Key-value store mapping composite keys onto files
#[derive(Debug)]
pub struct FileBackend {
    config: FileDbConfig,
    marker: MarkerFile,
    /// Serializes marker updates between concurrent range deletions
    marker_lock: Mutex<()>,
    /// Suffix source for temporary files and detached directories
    tmp_counter: AtomicU64,
}

impl FileBackend {
    /// Open or create a backend rooted at `config.root_dir`
    ///
    /// Directories left detached by a range deletion that was interrupted
    /// are removed here.
    pub fn open(config: FileDbConfig) -> Result<Self> {
        let ext = &config.extension;
        if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN || ext.contains(['/', '\\']) {
            return Err(Error::Storage(format!(
                "invalid record file extension {:?}",
                config.extension
            )));
        }

        create_dir(&config.root_dir, config.dir_permissions)?;
        remove_stale_detached(&config.root_dir)?;
        info!(root = %config.root_dir.display(), "Opened file backend");

        Ok(Self {
            marker: MarkerFile::new(&config.root_dir),
            config,
            marker_lock: Mutex::new(()),
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// The configuration this backend was opened with
    pub fn config(&self) -> &FileDbConfig {
        &self.config
    }

    /// Highest prune boundary recorded by earlier range deletions.
    ///
    /// Pass this as the initial floor when reopening a store.
    pub fn recorded_floor(&self) -> Result<u64> {
        Ok(self.marker.load()?.floor)
    }

    fn index_dir(&self, index: u64) -> PathBuf {
        self.config.root_dir.join(index.to_string())
    }

    /// Directory and file holding a record
    fn record_path(&self, composite: &[u8]) -> Result<(PathBuf, PathBuf)> {
        let (index, key) = split_key(composite)?;
        let encoded = hex::encode(key);

        let mut dir = self.index_dir(index);
        let mut rest = encoded.as_str();
        while rest.len() > MAX_NAME_HEX {
            let (chunk, tail) = rest.split_at(MAX_NAME_HEX);
            dir.push(chunk);
            rest = tail;
        }

        let file = dir.join(format!("{}.{}", rest, self.config.extension));
        Ok((dir, file))
    }

    /// One attempt at writing `value` aside and renaming it into place
    fn write_record(&self, dir: &Path, tmp: &Path, path: &Path, value: &[u8]) -> io::Result<()> {
        create_dir(dir, self.config.dir_permissions)?;
        if let Err(e) = fs::write(tmp, value) {
            let _ = fs::remove_file(tmp);
            return Err(e);
        }
        if let Err(e) = fs::rename(tmp, path) {
            let _ = fs::remove_file(tmp);
            return Err(e);
        }
        Ok(())
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let (_, path) = self.record_path(key)?;
        match fs::read(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let (dir, path) = self.record_path(key)?;

        // Write aside, then rename, so readers never see a torn value
        let seq = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(format!(".tmp{}", seq));
        let tmp_path = PathBuf::from(tmp_name);

        let mut attempt = 1;
        loop {
            match self.write_record(&dir, &tmp_path, &path, value) {
                // A range deletion detached the index directory mid-write
                Err(e) if e.kind() == ErrorKind::NotFound && attempt < WRITE_ATTEMPTS => {
                    attempt += 1;
                }
                result => return result.map_err(Error::from),
            }
        }
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let (_, path) = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        let (_, path) = self.record_path(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn range_delete(&self) -> Option<&dyn RangeDelete> {
        Some(self)
    }
}

impl RangeDelete for FileBackend {
    fn delete_range(&self, start: u64, end: u64) -> Result<()> {
        let root = &self.config.root_dir;
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            // Anything not named by a decimal index is not ours to prune
            let Ok(index) = parse_index(name.as_encoded_bytes()) else {
                continue;
            };
            if !(start..end).contains(&index) || !entry.file_type()?.is_dir() {
                continue;
            }

            // Rename is atomic: nothing can be added to the directory once
            // it is detached, so the removal below cannot race a writer
            let seq = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
            let detached = root.join(format!("{}{}-{}", DETACHED_PREFIX, index, seq));
            match fs::rename(entry.path(), &detached) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
            fs::remove_dir_all(&detached)?;
            removed += 1;
        }

        let _guard = self.marker_lock.lock().map_err(|_| Error::LockPoisoned)?;
        let floor = self.marker.advance(end)?;
        debug!(start, end, removed, floor, "Deleted index range");

        Ok(())
    }
}

fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

fn remove_stale_detached(root: &Path) -> Result<()> {
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_name().as_encoded_bytes().starts_with(DETACHED_PREFIX.as_bytes()) {
            continue;
        }
        warn!(path = %entry.path().display(), "Removing directory left by an interrupted prune");
        match fs::remove_dir_all(entry.path()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
