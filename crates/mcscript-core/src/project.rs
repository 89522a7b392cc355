//! Project descriptor shared by the template generators

use crate::error::{Result, ScaffoldError};
use crate::templates::TemplateVariant;
use crate::versions::{parse_version_tag, platform_triple, ModuleVersions};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything the generators need to know about the project being created.
///
/// Built once per run after versions are resolved; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub variant: TemplateVariant,
    pub target_path: PathBuf,
    pub name: String,
    pub description: String,
    /// Chosen platform version as `[major, minor, patch]`
    pub platform_version: [u64; 3],
    /// Module → registry tag selected for the platform version
    pub npm_versions: BTreeMap<String, String>,
    /// Module → npm version with the build channel suffix (e.g. `1.8.0-beta`)
    pub module_versions: BTreeMap<String, String>,
}

impl ProjectDescriptor {
    /// Build a descriptor from the tags selected for one platform version.
    ///
    /// Fails when a required module has no tag for the chosen platform
    /// version, or when a tag or the platform version cannot be parsed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        variant: TemplateVariant,
        target_path: PathBuf,
        name: impl Into<String>,
        description: impl Into<String>,
        platform_version: &str,
        selection: &ModuleVersions,
        required_modules: &[&str],
        channel_suffix: &str,
    ) -> Result<Self> {
        let mut npm_versions = BTreeMap::new();
        let mut module_versions = BTreeMap::new();

        for module in required_modules {
            let tag = selection.get(*module).ok_or_else(|| {
                ScaffoldError::Validation(format!(
                    "No stable release of {} targets platform version {}",
                    module, platform_version
                ))
            })?;
            let parsed = parse_version_tag(tag)?;
            npm_versions.insert(module.to_string(), tag.clone());
            module_versions.insert(
                module.to_string(),
                format!("{}{}", parsed.npm_version, channel_suffix),
            );
        }

        Ok(Self {
            variant,
            target_path,
            name: name.into(),
            description: description.into(),
            platform_version: platform_triple(platform_version)?,
            npm_versions,
            module_versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(entries: &[(&str, &str)]) -> ModuleVersions {
        entries
            .iter()
            .map(|(m, t)| (m.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn test_descriptor_from_selection() {
        let descriptor = ProjectDescriptor::new(
            TemplateVariant::Javascript,
            PathBuf::from("/work/demo"),
            "demo",
            "A demo pack",
            "1.20.30",
            &selection(&[
                ("@minecraft/server", "1.8.0-beta.1.20.30-stable"),
                ("@minecraft/server-ui", "1.1.0-beta.1.20.30-stable"),
            ]),
            &["@minecraft/server", "@minecraft/server-ui"],
            "-beta",
        )
        .unwrap();

        assert_eq!(descriptor.platform_version, [1, 20, 30]);
        assert_eq!(
            descriptor.npm_versions["@minecraft/server"],
            "1.8.0-beta.1.20.30-stable"
        );
        assert_eq!(descriptor.module_versions["@minecraft/server"], "1.8.0-beta");
        assert_eq!(descriptor.module_versions["@minecraft/server-ui"], "1.1.0-beta");
    }

    #[test]
    fn test_missing_module_is_validation_error() {
        let err = ProjectDescriptor::new(
            TemplateVariant::Typescript,
            PathBuf::from("/work/demo"),
            "demo",
            "",
            "1.20.40",
            &selection(&[("@minecraft/server-ui", "1.2.0-beta.1.20.40-stable")]),
            &["@minecraft/server", "@minecraft/server-ui"],
            "-beta",
        )
        .unwrap_err();

        match err {
            ScaffoldError::Validation(message) => assert!(message.contains("@minecraft/server")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_platform_version_is_format_error() {
        let err = ProjectDescriptor::new(
            TemplateVariant::Typescript,
            PathBuf::from("/work/demo"),
            "demo",
            "",
            "1.21",
            &selection(&[("@minecraft/server", "1.9.0-beta.1.21-stable")]),
            &["@minecraft/server"],
            "-beta",
        )
        .unwrap_err();

        assert!(matches!(err, ScaffoldError::Format { tag } if tag == "1.21"));
    }
}
