//! Service wiring shared by every subcommand.

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{Context, Result};
use ssp_baseline::BaselineResolver;
use ssp_catalog::Catalog;
use ssp_plan::{DocumentStore, Validator};
use ssp_storage::{ContentStore, FsContentStore, TimeoutStore};

use crate::config::SspConfig;

/// The services behind the CLI, built once from an [`SspConfig`].
///
/// The filesystem store is wrapped in a [`TimeoutStore`] so every
/// collaborator call observes `storage_timeout_ms`.
pub struct SspContext {
    /// Effective configuration.
    pub config: SspConfig,
    /// Deadline-bounded content store shared by every service.
    pub content: Arc<dyn ContentStore>,
    /// Tier baseline resolver.
    pub resolver: Arc<BaselineResolver>,
    /// Compliance document store.
    pub documents: Arc<DocumentStore>,
    /// Document validator.
    pub validator: Validator,
}

impl std::fmt::Debug for SspContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SspContext")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl SspContext {
    /// Wire the content store, resolver, document store and validator.
    pub fn open(config: SspConfig) -> Self {
        let fs_store = Arc::new(FsContentStore::new(config.content_root.clone()));
        let content: Arc<dyn ContentStore> = Arc::new(
            TimeoutStore::new(fs_store, config.storage_timeout())
                .with_max_in_flight(config.storage_max_in_flight),
        );
        let resolver =
            Arc::new(BaselineResolver::new(content.clone()).with_matching(config.profile_matching));
        let documents = Arc::new(DocumentStore::new(content.clone(), resolver.clone()));
        let validator = Validator::new(documents.clone());
        Self {
            config,
            content,
            resolver,
            documents,
            validator,
        }
    }

    /// The configured OSCAL catalog, or the built-in table.
    pub fn catalog(&self) -> Result<Cow<'static, Catalog>> {
        match &self.config.catalog {
            Some(key) => {
                let catalog = Catalog::load(self.content.as_ref(), key)
                    .with_context(|| format!("failed to load catalog {key}"))?;
                Ok(Cow::Owned(catalog))
            }
            None => Ok(Cow::Borrowed(Catalog::builtin())),
        }
    }
}
