//! SDK module version resolution
//!
//! This module provides:
//! - Registry access (`Registry` trait, `HttpRegistry`)
//! - Version tag parsing, stable-channel filtering and numeric ordering
//! - Grouping of module tags by shared platform version

pub mod group;
pub mod registry;
pub mod tag;

use crate::error::Result;
use futures::future::try_join_all;
use tracing::{debug, info, instrument};

pub use group::{group_versions, ModuleVersions, VersionGroup};
pub use registry::{HttpRegistry, Registry};
pub use tag::{
    compare_numeric, filter_stable, parse_version_tag, platform_triple, ParsedVersion, VersionTag,
};

/// Resolves compatible module versions from a registry
#[derive(Debug, Clone)]
pub struct VersionResolver<R> {
    registry: R,
}

impl<R: Registry> VersionResolver<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Fetch every tag published for `module`, newest first.
    ///
    /// The returned iterator is one-shot; call again to re-fetch.
    pub async fn fetch_versions(&self, module: &str) -> Result<impl Iterator<Item = VersionTag>> {
        let mut tags = self.registry.fetch_versions(module).await?;
        tag::sort_descending(&mut tags);
        debug!(module, count = tags.len(), "fetched versions");
        Ok(tags.into_iter())
    }

    /// Fetch all modules concurrently and group their stable tags by platform version
    #[instrument(skip_all, fields(modules = ?modules))]
    pub async fn resolve(&self, modules: &[&str]) -> Result<VersionGroup> {
        let fetched = try_join_all(modules.iter().map(|module| async move {
            let tags: Vec<VersionTag> = self.fetch_versions(module).await?.collect();
            Ok::<_, crate::error::ScaffoldError>((*module, tags))
        }))
        .await?;

        let group = group_versions(&fetched)?;
        info!(platform_versions = group.len(), latest = ?group.latest(), "resolved versions");
        Ok(group)
    }
}
