//! # Filesystem Content Store
//!
//! Keys map to files under a root directory: `documents/plan-1.json` is
//! `{root}/documents/plan-1.json`.
//!
//! ## Atomic Replacement
//!
//! `write` never truncates the target in place. The bytes go to a hidden
//! temporary sibling (`.plan-1.json.tmp-<pid>-<n>`), the file is fsynced,
//! then renamed over the target and the directory is synced. A crash or a
//! failed write leaves either the old document or the new one, never a
//! mix. Temporary files are hidden from `list`.
//!
//! The rename is the commit point checked by
//! [`ContentStore::write_if`]: an abandoned write removes its temporary
//! file and leaves the target untouched.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{validate_key, ContentStore, StorageError, StorageResult};

/// A [`ContentStore`] rooted at a directory.
#[derive(Debug)]
pub struct FsContentStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FsContentStore {
    /// A store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |p, seg| p.join(seg)))
    }

    fn tmp_path_for(&self, target: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!(".{name}.tmp-{}-{n}", std::process::id()))
    }

    fn collect_keys(&self, dir: &Path, rel: &str, prefix: &str, out: &mut Vec<String>) -> StorageResult<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_error(rel, e)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| io_error(rel, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let key = if rel.is_empty() {
                name
            } else {
                format!("{rel}/{name}")
            };
            let file_type = entry.file_type().map_err(|e| io_error(&key, e))?;
            if file_type.is_dir() {
                // Only descend where the prefix can still match.
                let dir_key = format!("{key}/");
                if dir_key.starts_with(prefix) || prefix.starts_with(&dir_key) {
                    self.collect_keys(&entry.path(), &key, prefix, out)?;
                }
            } else if file_type.is_file() && key.starts_with(prefix) {
                out.push(key);
            }
        }
        Ok(())
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    if source.kind() == ErrorKind::NotFound {
        StorageError::NotFound {
            key: key.to_string(),
        }
    } else {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

fn sync_dir(dir: &Path) -> std::io::Result<()> {
    // Directory fsync is not supported everywhere; treat it as best effort.
    match OpenOptions::new().read(true).open(dir) {
        Ok(f) => f.sync_all().or(Ok(())),
        Err(_) => Ok(()),
    }
}

impl ContentStore for FsContentStore {
    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;
        tracing::debug!(key, path = %path.display(), "reading content");
        fs::read(&path).map_err(|e| io_error(key, e))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.write_if(key, bytes, &|| true).map(|_| ())
    }

    fn write_if(&self, key: &str, bytes: &[u8], commit: &dyn Fn() -> bool) -> StorageResult<bool> {
        let path = self.path_for(key)?;
        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| io_error(key, e))?;

        let tmp = self.tmp_path_for(&path);
        if let Err(e) = write_and_sync(&tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(key, e));
        }
        // Commit point: the staged file is discarded unless the caller
        // still wants it.
        if !commit() {
            let _ = fs::remove_file(&tmp);
            tracing::debug!(key, "staged write abandoned");
            return Ok(false);
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(key, e));
        }
        sync_dir(&dir).map_err(|e| io_error(key, e))?;
        tracing::debug!(key, bytes = bytes.len(), "wrote content");
        Ok(true)
    }

    fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        self.collect_keys(&self.root, "", prefix, &mut keys)?;
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).map_err(|e| io_error(key, e))
    }
}
