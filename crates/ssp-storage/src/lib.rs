#![deny(missing_docs)]

//! # ssp-storage — Document Content Store
//!
//! The SSP core never touches a filesystem directly. It reads and writes
//! whole documents through the [`ContentStore`] trait: `read(key)`,
//! `write(key, bytes)`, `list(prefix)` and `delete(key)`, where keys are
//! relative `/`-separated paths such as `documents/plan-1.json` or
//! `profiles/standard/moderate.json`.
//!
//! ## Backends
//!
//! - [`FsContentStore`]: files under a root directory. Writes land in a
//!   temporary sibling, are fsynced, then atomically renamed over the
//!   target, so a reader never observes a half-written document.
//! - [`MemoryContentStore`]: a sorted map, for tests and embedding.
//! - [`TimeoutStore`]: wraps any backend and bounds every call with a
//!   deadline, surfacing [`StorageError::Timeout`] instead of blocking.
//!   A write reported as timed out never lands afterwards; see
//!   [`ContentStore::write_if`].
//!
//! ## Crate Policy
//!
//! - Depends only on `ssp-core` internally.
//! - No retries: a failed call is reported once and the caller decides.

pub mod fs;
pub mod memory;
pub mod timeout;

use std::sync::Arc;

pub use ssp_core::StorageError;

pub use fs::FsContentStore;
pub use memory::MemoryContentStore;
pub use timeout::{TimeoutStore, DEFAULT_MAX_IN_FLIGHT, DEFAULT_STORAGE_TIMEOUT};

/// Result alias for content-store calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// Whole-object storage for documents and reference content.
pub trait ContentStore: Send + Sync {
    /// Bytes stored under `key`.
    fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Replace whatever is stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()>;

    /// All keys starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Remove `key`; [`StorageError::NotFound`] if absent.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Like [`write`](Self::write), but the change only becomes visible if
    /// `commit` returns `true` at the backend's commit point. Returns
    /// whether the write was committed.
    ///
    /// Backends that stage data before publishing it check `commit` after
    /// staging. The default has no such point and checks before writing.
    fn write_if(&self, key: &str, bytes: &[u8], commit: &dyn Fn() -> bool) -> StorageResult<bool> {
        if !commit() {
            return Ok(false);
        }
        self.write(key, bytes).map(|()| true)
    }

    /// Like [`delete`](Self::delete), gated the same way as
    /// [`write_if`](Self::write_if).
    fn delete_if(&self, key: &str, commit: &dyn Fn() -> bool) -> StorageResult<bool> {
        if !commit() {
            return Ok(false);
        }
        self.delete(key).map(|()| true)
    }
}

impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        (**self).write(key, bytes)
    }

    fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }

    fn write_if(&self, key: &str, bytes: &[u8], commit: &dyn Fn() -> bool) -> StorageResult<bool> {
        (**self).write_if(key, bytes, commit)
    }

    fn delete_if(&self, key: &str, commit: &dyn Fn() -> bool) -> StorageResult<bool> {
        (**self).delete_if(key, commit)
    }
}

/// Check that `key` is a relative, `/`-separated path with no empty, `.` or
/// `..` segments and no backslashes.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.contains('\\')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("documents/plan-1.json").is_ok());
        assert!(validate_key("a").is_ok());
        for bad in ["", "/abs", "a//b", "a/../b", "./a", "a/", "a\\b"] {
            assert!(
                matches!(validate_key(bad), Err(StorageError::InvalidKey { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_arc_delegates() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        store.write("k", b"v").unwrap();
        assert_eq!(store.read("k").unwrap(), b"v");
        assert_eq!(store.list("").unwrap(), vec!["k".to_string()]);
        store.delete("k").unwrap();
        assert!(store.read("k").unwrap_err().is_not_found());
    }

    #[test]
    fn test_gated_write_and_delete_honour_commit() {
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        assert!(!store.write_if("k", b"v", &|| false).unwrap());
        assert!(store.read("k").unwrap_err().is_not_found());

        assert!(store.write_if("k", b"v", &|| true).unwrap());
        assert_eq!(store.read("k").unwrap(), b"v");

        assert!(!store.delete_if("k", &|| false).unwrap());
        assert_eq!(store.read("k").unwrap(), b"v");
        assert!(store.delete_if("k", &|| true).unwrap());
        assert!(store.read("k").unwrap_err().is_not_found());
    }
}
