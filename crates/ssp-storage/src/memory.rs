//! # In-Memory Content Store

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{validate_key, ContentStore, StorageError, StorageResult};

/// A [`ContentStore`] backed by a sorted map.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryContentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from `(key, bytes)` pairs.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> StorageResult<Self>
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let store = Self::new();
        for (key, bytes) in entries {
            let key: String = key.into();
            let bytes: Vec<u8> = bytes.into();
            store.write(&key, &bytes)?;
        }
        Ok(store)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ContentStore for MemoryContentStore {
    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        self.entries.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.entries
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_is_not_found() {
        let store = MemoryContentStore::new();
        assert!(store.read("documents/x.json").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_by_prefix_sorted() {
        let store = MemoryContentStore::with_entries([
            ("profiles/standard/b_high.json", "{}"),
            ("profiles/standard/a_low.json", "{}"),
            ("profiles/agency-specific/x.json", "{}"),
            ("documents/d.json", "{}"),
        ])
        .unwrap();
        assert_eq!(
            store.list("profiles/standard/").unwrap(),
            vec![
                "profiles/standard/a_low.json".to_string(),
                "profiles/standard/b_high.json".to_string()
            ]
        );
        assert_eq!(store.list("").unwrap().len(), 4);
        assert!(store.list("nothing/").unwrap().is_empty());
    }

    #[test]
    fn test_write_replaces() {
        let store = MemoryContentStore::new();
        store.write("k", b"one").unwrap();
        store.write("k", b"two").unwrap();
        assert_eq!(store.read("k").unwrap(), b"two");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let store = MemoryContentStore::new();
        store.write("k", b"one").unwrap();
        store.delete("k").unwrap();
        assert!(store.is_empty());
        assert!(store.delete("k").unwrap_err().is_not_found());
    }
}
