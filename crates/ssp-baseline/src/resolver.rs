//! # Baseline Resolver
//!
//! Turns a (tier, kind) request into an immutable [`BaselineProfile`].
//!
//! ## Import Walk
//!
//! Each profile contributes the ids of its `include-controls` selectors.
//! An import whose `href` names a profile document in the store (a relative
//! reference ending in `.json`, `.yaml` or `.yml`, resolved against the
//! importing document's directory) is resolved recursively and merged.
//! The document's own `exclude-controls` are removed last. Imports of
//! documents without a `profile` root (catalogs) and external references
//! (`https://...`, `#fragment`) contribute nothing beyond their selectors.
//!
//! A document that imports itself, directly or transitively, is an
//! [`InvalidProfile`](SspError::InvalidProfile).

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use ssp_core::{ControlId, ProfileKind, SspError, SspResult, Tier};
use ssp_storage::ContentStore;

use crate::cache::BaselineCache;
use crate::locate::{locate, ProfileMatching};
use crate::profile::{parse_profile, ProfileBody, ProfileFormat};

/// The resolved required-control set of one (tier, kind) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineProfile {
    /// Requested tier.
    pub tier: Tier,
    /// Requested profile kind.
    pub kind: ProfileKind,
    /// Canonical required controls, ordered.
    pub controls: BTreeSet<ControlId>,
    /// Key of the profile document the set was resolved from.
    pub source_key: String,
    /// `profile.metadata.title`, when present.
    pub title: Option<String>,
    /// Lowercase hex SHA-256 of the source document bytes.
    pub source_digest: String,
}

impl BaselineProfile {
    /// Whether `id` is required.
    pub fn requires(&self, id: &ControlId) -> bool {
        self.controls.contains(id)
    }

    /// Number of required controls.
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Always false for a resolved profile; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

/// Resolves baselines from profile documents in a content store.
pub struct BaselineResolver {
    store: Arc<dyn ContentStore>,
    cache: Arc<BaselineCache>,
    matching: ProfileMatching,
}

impl std::fmt::Debug for BaselineResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaselineResolver")
            .field("cache", &self.cache)
            .field("matching", &self.matching)
            .finish_non_exhaustive()
    }
}

impl BaselineResolver {
    /// Resolver over `store` with a private cache and first-match location.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            cache: Arc::new(BaselineCache::new()),
            matching: ProfileMatching::default(),
        }
    }

    /// Share an existing cache.
    pub fn with_cache(mut self, cache: Arc<BaselineCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Choose the multi-candidate policy.
    pub fn with_matching(mut self, matching: ProfileMatching) -> Self {
        self.matching = matching;
        self
    }

    /// The cache this resolver fills.
    pub fn cache(&self) -> &Arc<BaselineCache> {
        &self.cache
    }

    /// The multi-candidate policy in effect.
    pub fn matching(&self) -> ProfileMatching {
        self.matching
    }

    /// Required controls for (tier, kind).
    ///
    /// # Errors
    ///
    /// As [`BaselineResolver::resolve`].
    pub fn resolve_required_controls(
        &self,
        tier: Tier,
        kind: ProfileKind,
    ) -> SspResult<BTreeSet<ControlId>> {
        Ok(self.resolve(tier, kind)?.controls.clone())
    }

    /// The resolved baseline for (tier, kind), from cache when present.
    ///
    /// # Errors
    ///
    /// - [`SspError::ProfileNotFound`] / [`SspError::AmbiguousProfile`]
    ///   from location.
    /// - [`SspError::InvalidProfile`] for an undecodable document or an
    ///   import cycle.
    /// - [`SspError::MalformedIdentifier`] for any bad id in the walk.
    /// - [`SspError::EmptyProfile`] when the walk yields no ids.
    /// - [`SspError::StorageUnavailable`] when the store fails.
    pub fn resolve(&self, tier: Tier, kind: ProfileKind) -> SspResult<Arc<BaselineProfile>> {
        if let Some(hit) = self.cache.get(tier, kind) {
            tracing::debug!(%tier, %kind, key = %hit.source_key, "baseline cache hit");
            return Ok(hit);
        }
        tracing::debug!(%tier, %kind, "baseline cache miss");
        let profile = self.resolve_uncached(tier, kind)?;
        Ok(self.cache.insert(profile))
    }

    /// Resolve from the store, bypassing and not filling the cache.
    ///
    /// # Errors
    ///
    /// As [`BaselineResolver::resolve`].
    pub fn resolve_uncached(&self, tier: Tier, kind: ProfileKind) -> SspResult<BaselineProfile> {
        let key = locate(self.store.as_ref(), tier, kind, self.matching)?;
        let bytes = self.store.read(&key)?;
        let body = parse_profile(&key, &bytes)?
            .profile
            .ok_or_else(|| SspError::InvalidProfile {
                key: key.clone(),
                reason: "document has no profile root".to_string(),
            })?;

        let mut walk = ImportWalk {
            store: self.store.as_ref(),
            stack: Vec::new(),
        };
        let controls = walk.collect(&key, &body)?;
        if controls.is_empty() {
            return Err(SspError::EmptyProfile { key });
        }

        let profile = BaselineProfile {
            tier,
            kind,
            controls,
            title: body.title().map(str::to_string),
            source_digest: sha256_hex(&bytes),
            source_key: key,
        };
        tracing::info!(
            %tier,
            %kind,
            key = %profile.source_key,
            controls = profile.controls.len(),
            "resolved baseline"
        );
        Ok(profile)
    }
}

// ---------------------------------------------------------------------------
// Import walk
// ---------------------------------------------------------------------------

struct ImportWalk<'a> {
    store: &'a dyn ContentStore,
    stack: Vec<String>,
}

impl ImportWalk<'_> {
    fn collect(&mut self, key: &str, body: &ProfileBody) -> SspResult<BTreeSet<ControlId>> {
        self.stack.push(key.to_string());

        let mut controls = BTreeSet::new();
        for raw in body.included_ids() {
            controls.insert(parse_profile_id(key, raw)?);
        }

        for href in body.imports.iter().filter_map(|i| i.href.as_deref()) {
            let Some(target) = import_key(key, href) else {
                continue;
            };
            if self.stack.contains(&target) {
                let mut chain = self.stack.clone();
                chain.push(target.clone());
                return Err(SspError::InvalidProfile {
                    key: target,
                    reason: format!("import cycle: {}", chain.join(" -> ")),
                });
            }
            let bytes = match self.store.read(&target) {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => {
                    tracing::warn!(key, href, target = %target, "imported document not in content store; skipped");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            match parse_profile(&target, &bytes)?.profile {
                Some(imported) => controls.extend(self.collect(&target, &imported)?),
                None => tracing::debug!(key, target = %target, "import is not a profile; no controls merged"),
            }
        }

        for raw in body.excluded_ids() {
            controls.remove(&parse_profile_id(key, raw)?);
        }

        self.stack.pop();
        Ok(controls)
    }
}

fn parse_profile_id(key: &str, raw: &str) -> SspResult<ControlId> {
    ControlId::parse(raw).map_err(|e| {
        tracing::debug!(key, id = raw, "malformed control id in profile");
        e
    })
}

/// Store key named by `href` relative to `from`, when it names a profile
/// document inside the store.
fn import_key(from: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.contains("://") {
        return None;
    }
    let href = href.split(['#', '?']).next().unwrap_or(href);

    if let Some(absolute) = href.strip_prefix('/') {
        return normalize(Vec::new(), absolute);
    }
    let mut base: Vec<&str> = from.split('/').collect();
    base.pop();
    normalize(base, href)
}

fn normalize<'a>(mut segments: Vec<&'a str>, relative: &'a str) -> Option<String> {
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }
    let key = segments.join("/");
    ProfileFormat::from_key(&key).map(|_| key)
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
