//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every field has a default, so
//! an empty file (or no file) yields a working configuration.
//!
//! ```yaml
//! content_root: /srv/ssp/content
//! storage_timeout_ms: 2000
//! storage_max_in_flight: 64
//! profile_matching: unique
//! catalog: catalogs/NIST_SP-800-53_rev5_catalog.json
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use ssp_baseline::ProfileMatching;

/// Default content store root, relative to the working directory.
pub const DEFAULT_CONTENT_ROOT: &str = "./content";

/// Default per-call storage deadline in milliseconds.
pub const DEFAULT_STORAGE_TIMEOUT_MS: u64 = 5_000;

/// Settings for the `ssp` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SspConfig {
    /// Root directory of the filesystem content store.
    pub content_root: PathBuf,
    /// Deadline applied to every content store call.
    pub storage_timeout_ms: u64,
    /// Cap on storage calls still running, including ones past their deadline.
    pub storage_max_in_flight: usize,
    /// Behaviour when several profile documents match a tier.
    pub profile_matching: ProfileMatching,
    /// Content key of an OSCAL catalog replacing the built-in table.
    pub catalog: Option<String>,
}

impl Default for SspConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            storage_timeout_ms: DEFAULT_STORAGE_TIMEOUT_MS,
            storage_max_in_flight: ssp_storage::DEFAULT_MAX_IN_FLIGHT,
            profile_matching: ProfileMatching::default(),
            catalog: None,
        }
    }
}

impl SspConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid configuration")
    }

    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Effective configuration: the file at `config_path` if given,
    /// otherwise defaults, with `root_override` replacing `content_root`.
    pub fn resolve(config_path: Option<&Path>, root_override: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(root) = root_override {
            config.content_root = root.to_path_buf();
        }
        tracing::debug!(
            content_root = %config.content_root.display(),
            storage_timeout_ms = config.storage_timeout_ms,
            "configuration resolved"
        );
        Ok(config)
    }

    /// Storage deadline as a [`Duration`].
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SspConfig::default();
        assert_eq!(config.content_root, PathBuf::from("./content"));
        assert_eq!(config.storage_timeout(), ssp_storage::timeout::DEFAULT_STORAGE_TIMEOUT);
        assert_eq!(config.storage_max_in_flight, ssp_storage::DEFAULT_MAX_IN_FLIGHT);
        assert_eq!(config.profile_matching, ProfileMatching::FirstMatch);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(SspConfig::from_yaml_str("").unwrap(), SspConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = SspConfig::from_yaml_str("profile_matching: unique\n").unwrap();
        assert_eq!(config.profile_matching, ProfileMatching::Unique);
        assert_eq!(config.storage_timeout_ms, DEFAULT_STORAGE_TIMEOUT_MS);

        let capped = SspConfig::from_yaml_str("storage_max_in_flight: 8\n").unwrap();
        assert_eq!(capped.storage_max_in_flight, 8);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(SspConfig::from_yaml_str("content_rot: /tmp\n").is_err());
    }

    #[test]
    fn test_load_and_root_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssp.yaml");
        std::fs::write(
            &path,
            "content_root: /srv/content\nstorage_timeout_ms: 250\ncatalog: catalogs/c.json\n",
        )
        .unwrap();

        let loaded = SspConfig::resolve(Some(&path), None).unwrap();
        assert_eq!(loaded.content_root, PathBuf::from("/srv/content"));
        assert_eq!(loaded.storage_timeout(), Duration::from_millis(250));
        assert_eq!(loaded.catalog.as_deref(), Some("catalogs/c.json"));

        let overridden = SspConfig::resolve(Some(&path), Some(Path::new("/other"))).unwrap();
        assert_eq!(overridden.content_root, PathBuf::from("/other"));
        assert_eq!(overridden.storage_timeout_ms, 250);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SspConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
