//! Platform manifest (`manifest.json`) types and generation

use crate::error::Result;
use crate::project::ProjectDescriptor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Manifest schema version understood by the platform
pub const FORMAT_VERSION: u32 = 2;

/// Script entry point relative to the project root
pub const SCRIPT_ENTRY: &str = "scripts/index.js";

const INITIAL_VERSION: [u32; 3] = [1, 0, 0];

/// Root of `manifest.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformManifest {
    pub format_version: u32,
    pub header: ManifestHeader,
    pub modules: Vec<ManifestModule>,
    pub dependencies: Vec<ManifestDependency>,
}

/// Pack identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub name: String,
    pub description: String,
    pub min_engine_version: [u64; 3],
    pub uuid: Uuid,
    pub version: [u32; 3],
}

/// A data or script module of the pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestModule {
    #[serde(rename = "type")]
    pub kind: ModuleKind,

    /// Only set on script modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub uuid: Uuid,

    /// Only set on script modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    pub version: [u32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Data,
    Script,
}

/// An SDK module the scripts depend on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDependency {
    pub module_name: String,
    pub version: String,
}

impl PlatformManifest {
    /// Build the manifest for a project; identifiers are fresh on every call
    pub fn for_project(descriptor: &ProjectDescriptor) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            header: ManifestHeader {
                name: descriptor.name.clone(),
                description: descriptor.description.clone(),
                min_engine_version: descriptor.platform_version,
                uuid: Uuid::new_v4(),
                version: INITIAL_VERSION,
            },
            modules: vec![
                ManifestModule {
                    kind: ModuleKind::Data,
                    language: None,
                    uuid: Uuid::new_v4(),
                    entry: None,
                    version: INITIAL_VERSION,
                },
                ManifestModule {
                    kind: ModuleKind::Script,
                    language: Some("javascript".to_string()),
                    uuid: Uuid::new_v4(),
                    entry: Some(SCRIPT_ENTRY.to_string()),
                    version: INITIAL_VERSION,
                },
            ],
            dependencies: descriptor
                .module_versions
                .iter()
                .map(|(module, version)| ManifestDependency {
                    module_name: module.clone(),
                    version: version.clone(),
                })
                .collect(),
        }
    }
}

/// Render `manifest.json`
pub fn render(descriptor: &ProjectDescriptor) -> Result<String> {
    super::to_json(&PlatformManifest::for_project(descriptor))
}
