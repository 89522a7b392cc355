//! Package registry access
//!
//! The registry is queried once per module; the versions document is a JSON
//! object whose `versions` keys are the published tags.

use super::tag::VersionTag;
use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;
use url::Url;

/// Source of published version tags for a module
pub trait Registry {
    /// Every tag published for `module`, in no particular order
    fn fetch_versions(&self, module: &str) -> impl Future<Output = Result<Vec<VersionTag>>> + Send;
}

/// Registry document; only the version keys matter
#[derive(Debug, Deserialize)]
struct PackageDocument {
    versions: HashMap<String, IgnoredAny>,
}

/// npm-compatible registry reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpRegistry {
    /// Create a registry client with a custom user agent
    pub fn new(base_url: Url, user_agent: &str) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a registry client from a product config.
    ///
    /// An explicit URL wins over the product's environment variable, which
    /// wins over the product default.
    pub fn from_config<C: ProductConfig>(config: &C, override_url: Option<&str>) -> Result<Self> {
        let url_str = match override_url {
            Some(url) => url.to_string(),
            None => std::env::var(config.registry_url_env())
                .unwrap_or_else(|_| config.default_registry_url().to_string()),
        };
        let url = Url::parse(&url_str).map_err(|e| {
            ScaffoldError::Validation(format!("Invalid registry URL {}: {}", url_str, e))
        })?;
        Ok(Self::new(url, config.user_agent()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the document URL for a module.
    ///
    /// Scoped names travel as a single segment (`@scope%2Fname`).
    fn module_url(&self, module: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScaffoldError::network(module, format!("URL cannot have path segments: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(module);
        Ok(url)
    }
}

impl Registry for HttpRegistry {
    async fn fetch_versions(&self, module: &str) -> Result<Vec<VersionTag>> {
        let url = self.module_url(module)?;
        debug!(%url, "querying registry");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScaffoldError::network(module, e))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::network(
                module,
                format!("HTTP error {} from {}", response.status(), url),
            ));
        }

        let document: PackageDocument = response
            .json()
            .await
            .map_err(|e| ScaffoldError::network(module, format!("malformed registry response: {}", e)))?;

        Ok(document.versions.into_keys().collect())
    }
}
