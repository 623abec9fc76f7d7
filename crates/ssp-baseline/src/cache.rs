//! # Baseline Cache
//!
//! Resolved profiles keyed by (tier, kind). Entries live until
//! [`BaselineCache::invalidate`] or [`BaselineCache::clear`] is called.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use ssp_core::{ProfileKind, Tier};

use crate::resolver::BaselineProfile;

/// Shared cache of resolved baselines.
#[derive(Debug, Default)]
pub struct BaselineCache {
    entries: RwLock<HashMap<(Tier, ProfileKind), Arc<BaselineProfile>>>,
}

impl BaselineCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached profile for (tier, kind), if any.
    pub fn get(&self, tier: Tier, kind: ProfileKind) -> Option<Arc<BaselineProfile>> {
        self.entries.read().get(&(tier, kind)).cloned()
    }

    /// Store `profile` unless another thread got there first; returns the
    /// entry that ends up cached.
    pub fn insert(&self, profile: BaselineProfile) -> Arc<BaselineProfile> {
        let key = (profile.tier, profile.kind);
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert_with(|| Arc::new(profile)))
    }

    /// Drop the entry for (tier, kind). Returns whether one was present.
    pub fn invalidate(&self, tier: Tier, kind: ProfileKind) -> bool {
        let removed = self.entries.write().remove(&(tier, kind)).is_some();
        tracing::debug!(%tier, %kind, removed, "baseline cache invalidated");
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
        tracing::debug!("baseline cache cleared");
    }

    /// Number of cached baselines.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssp_core::ControlId;
    use std::collections::BTreeSet;

    fn profile(tier: Tier, ids: &[&str]) -> BaselineProfile {
        BaselineProfile {
            tier,
            kind: ProfileKind::Standard,
            controls: ids.iter().map(|s| ControlId::parse(s).unwrap()).collect::<BTreeSet<_>>(),
            source_key: format!("profiles/standard/{}.json", tier.keyword()),
            title: None,
            source_digest: "00".repeat(32),
        }
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = BaselineCache::new();
        let first = cache.insert(profile(Tier::Low, &["AC-1"]));
        let second = cache.insert(profile(Tier::Low, &["AC-1", "AC-2"]));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.get(Tier::Low, ProfileKind::Standard).unwrap().controls.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = BaselineCache::new();
        cache.insert(profile(Tier::Low, &["AC-1"]));
        cache.insert(profile(Tier::High, &["AC-1"]));
        assert_eq!(cache.len(), 2);
        assert!(cache.invalidate(Tier::Low, ProfileKind::Standard));
        assert!(!cache.invalidate(Tier::Low, ProfileKind::Standard));
        assert!(cache.get(Tier::Low, ProfileKind::Standard).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }
}
