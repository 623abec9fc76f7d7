//! # Profile Location
//!
//! Maps a (tier, kind) pair to one profile document key.
//!
//! Candidates are the keys under `profiles/<kind>/` with a profile extension
//! whose lowercase file name contains the tier keyword. The keyword test is a
//! plain substring match, so `fedramp_moderate_v5.json` and
//! `moderate-tailored.yaml` both qualify for `MODERATE`. When several keys
//! qualify, [`ProfileMatching`] picks the behavior.

use serde::{Deserialize, Serialize};
use ssp_core::{ProfileKind, SspError, SspResult, Tier};
use ssp_storage::ContentStore;

use crate::profile::ProfileFormat;

/// What to do when more than one document matches a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileMatching {
    /// Take the first candidate in sorted key order.
    #[default]
    FirstMatch,
    /// Require exactly one candidate; more is
    /// [`AmbiguousProfile`](SspError::AmbiguousProfile).
    Unique,
}

impl std::str::FromStr for ProfileMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_match" => Ok(Self::FirstMatch),
            "unique" => Ok(Self::Unique),
            other => Err(format!("unknown profile matching {other:?}: expected first_match or unique")),
        }
    }
}

/// `profiles/<kind>/`
pub fn profile_prefix(kind: ProfileKind) -> String {
    format!("profiles/{}/", kind.as_str())
}

fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Sorted candidate keys for `tier` under `profiles/<kind>/`.
pub fn candidates(store: &dyn ContentStore, tier: Tier, kind: ProfileKind) -> SspResult<Vec<String>> {
    let prefix = profile_prefix(kind);
    let keyword = tier.keyword();
    let mut keys: Vec<String> = store
        .list(&prefix)?
        .into_iter()
        .filter(|key| ProfileFormat::from_key(key).is_some())
        .filter(|key| file_name(key).to_lowercase().contains(keyword))
        .collect();
    keys.sort();
    Ok(keys)
}

/// The profile document key for (tier, kind).
///
/// # Errors
///
/// - [`SspError::ProfileNotFound`] when nothing matches.
/// - [`SspError::AmbiguousProfile`] under [`ProfileMatching::Unique`] when
///   more than one key matches.
/// - [`SspError::StorageUnavailable`] when the listing fails.
pub fn locate(
    store: &dyn ContentStore,
    tier: Tier,
    kind: ProfileKind,
    matching: ProfileMatching,
) -> SspResult<String> {
    let mut keys = candidates(store, tier, kind)?;
    match (keys.len(), matching) {
        (0, _) => Err(SspError::ProfileNotFound { tier, kind }),
        (1, _) => Ok(keys.remove(0)),
        (_, ProfileMatching::Unique) => Err(SspError::AmbiguousProfile {
            tier,
            kind,
            candidates: keys,
        }),
        (n, ProfileMatching::FirstMatch) => {
            let chosen = keys.remove(0);
            tracing::warn!(
                %tier,
                %kind,
                candidates = n,
                chosen = %chosen,
                "several profile documents match tier; using the first"
            );
            Ok(chosen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssp_storage::MemoryContentStore;

    fn store(keys: &[&str]) -> MemoryContentStore {
        MemoryContentStore::with_entries(keys.iter().map(|k| (*k, "{}"))).unwrap()
    }

    #[test]
    fn test_substring_match_case_insensitive() {
        let s = store(&[
            "profiles/standard/NIST_SP-800-53_rev5_MODERATE-baseline_profile.json",
            "profiles/standard/NIST_SP-800-53_rev5_LOW-baseline_profile.json",
        ]);
        let key = locate(&s, Tier::Moderate, ProfileKind::Standard, ProfileMatching::FirstMatch).unwrap();
        assert!(key.contains("MODERATE"));
    }

    #[test]
    fn test_ignores_other_kinds_and_extensions() {
        let s = store(&[
            "profiles/agency-specific/high.json",
            "profiles/standard/high.md",
            "documents/high.json",
        ]);
        assert!(matches!(
            locate(&s, Tier::High, ProfileKind::Standard, ProfileMatching::FirstMatch),
            Err(SspError::ProfileNotFound { tier: Tier::High, kind: ProfileKind::Standard })
        ));
        assert_eq!(
            locate(&s, Tier::High, ProfileKind::AgencySpecific, ProfileMatching::Unique).unwrap(),
            "profiles/agency-specific/high.json"
        );
    }

    #[test]
    fn test_first_match_is_sorted_first() {
        let s = store(&[
            "profiles/standard/b_moderate.yaml",
            "profiles/standard/a_moderate.json",
        ]);
        assert_eq!(
            locate(&s, Tier::Moderate, ProfileKind::Standard, ProfileMatching::FirstMatch).unwrap(),
            "profiles/standard/a_moderate.json"
        );
    }

    #[test]
    fn test_unique_rejects_collisions() {
        let s = store(&[
            "profiles/standard/b_moderate.yaml",
            "profiles/standard/a_moderate.json",
        ]);
        match locate(&s, Tier::Moderate, ProfileKind::Standard, ProfileMatching::Unique) {
            Err(SspError::AmbiguousProfile { candidates, .. }) => assert_eq!(
                candidates,
                vec![
                    "profiles/standard/a_moderate.json".to_string(),
                    "profiles/standard/b_moderate.yaml".to_string()
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_keyword_matches_file_name_not_directory() {
        let s = store(&["profiles/standard/low/baseline.json"]);
        assert!(matches!(
            locate(&s, Tier::Low, ProfileKind::Standard, ProfileMatching::FirstMatch),
            Err(SspError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_matching_from_str() {
        assert_eq!("first-match".parse::<ProfileMatching>().unwrap(), ProfileMatching::FirstMatch);
        assert_eq!("UNIQUE".parse::<ProfileMatching>().unwrap(), ProfileMatching::Unique);
        assert!("strict".parse::<ProfileMatching>().is_err());
    }
}
