//! Project templates
//!
//! This module provides:
//! - The fixed set of template variants and their generator tables
//! - One generator per emitted file (package, manifest, entry script, compiler config)
//! - `TemplateEngine`, which runs a variant's generators concurrently

pub mod manifest;
pub mod package;
pub mod script;
pub mod tsconfig;

use crate::error::{Result, ScaffoldError};
use crate::project::ProjectDescriptor;
use futures::future::join_all;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};

pub use manifest::PlatformManifest;

/// Supported project templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVariant {
    Typescript,
    Javascript,
}

impl TemplateVariant {
    /// Every variant, in the order offered to the user
    pub const ALL: [TemplateVariant; 2] = [TemplateVariant::Typescript, TemplateVariant::Javascript];

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateVariant::Typescript => "Typescript",
            TemplateVariant::Javascript => "Javascript",
        }
    }

    /// Generators run for this variant, in table order
    pub fn generators(self) -> &'static [Generator] {
        match self {
            TemplateVariant::Typescript => &[
                Generator::Package,
                Generator::Manifest,
                Generator::CompilerConfig,
                Generator::EntryScript,
            ],
            TemplateVariant::Javascript => {
                &[Generator::Package, Generator::Manifest, Generator::EntryScript]
            }
        }
    }

    /// Where the entry script source lives
    pub fn entry_source(self) -> &'static str {
        match self {
            TemplateVariant::Typescript => "src/index.ts",
            TemplateVariant::Javascript => manifest::SCRIPT_ENTRY,
        }
    }

    /// Parse a variant name, case-insensitively (`ts`/`js` accepted)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Some(TemplateVariant::Typescript),
            "javascript" | "js" => Some(TemplateVariant::Javascript),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A sub-generator; each writes exactly one file under the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Package,
    Manifest,
    EntryScript,
    CompilerConfig,
}

impl Generator {
    /// Path of the generated file relative to the project root
    pub fn relative_path(self, variant: TemplateVariant) -> &'static str {
        match self {
            Generator::Package => "package.json",
            Generator::Manifest => "manifest.json",
            Generator::EntryScript => variant.entry_source(),
            Generator::CompilerConfig => "tsconfig.json",
        }
    }

    /// Produce the file contents
    pub fn render(self, descriptor: &ProjectDescriptor) -> Result<String> {
        match self {
            Generator::Package => package::render(descriptor),
            Generator::Manifest => manifest::render(descriptor),
            Generator::EntryScript => script::render(descriptor),
            Generator::CompilerConfig => tsconfig::render(descriptor),
        }
    }

    /// Render and write the file, creating parent directories as needed
    pub async fn write(self, descriptor: &ProjectDescriptor) -> Result<PathBuf> {
        let path = descriptor
            .target_path
            .join(self.relative_path(descriptor.variant));
        let contents = self.render(descriptor)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScaffoldError::file_system(parent, e))?;
        }
        fs::write(&path, contents)
            .await
            .map_err(|e| ScaffoldError::file_system(&path, e))?;

        debug!(path = %path.display(), "wrote file");
        Ok(path)
    }
}

/// Serialize as pretty JSON with three-space indentation
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"   ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes a project's files from its descriptor
pub trait Materializer {
    /// Write every file of `descriptor.variant` under `descriptor.target_path`.
    ///
    /// `package_written` fires once `package.json` is on disk; it is dropped
    /// unsent if that file could not be written.
    fn materialize(
        &self,
        descriptor: &ProjectDescriptor,
        package_written: Option<oneshot::Sender<()>>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Runs a variant's generators concurrently
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Materializer for TemplateEngine {
    #[instrument(skip_all, fields(variant = %descriptor.variant, target = %descriptor.target_path.display()))]
    async fn materialize(
        &self,
        descriptor: &ProjectDescriptor,
        package_written: Option<oneshot::Sender<()>>,
    ) -> Result<()> {
        let mut package_written = package_written;

        let tasks: Vec<_> = descriptor
            .variant
            .generators()
            .iter()
            .map(|&generator| {
                let signal = match generator {
                    Generator::Package => package_written.take(),
                    _ => None,
                };
                async move {
                    let result = generator.write(descriptor).await;
                    if let (Ok(_), Some(tx)) = (&result, signal) {
                        let _ = tx.send(());
                    }
                    (generator, result)
                }
            })
            .collect();

        let mut first_failure = None;
        for (generator, result) in join_all(tasks).await {
            if let Err(err) = result {
                let file = generator.relative_path(descriptor.variant).to_string();
                if first_failure.is_none() {
                    first_failure = Some(ScaffoldError::Template {
                        file,
                        source: Box::new(err),
                    });
                } else {
                    warn!(file = %file, error = %err, "additional generator failure");
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TemplateVariant;
    use crate::project::ProjectDescriptor;
    use std::collections::BTreeMap;
    use std::path::Path;

    /// Files a variant produces, relative to the project root
    pub fn expected_files(variant: TemplateVariant) -> Vec<&'static str> {
        variant
            .generators()
            .iter()
            .map(|g| g.relative_path(variant))
            .collect()
    }

    /// Whether every file of the variant exists under `root`
    pub fn is_materialized(variant: TemplateVariant, root: &Path) -> bool {
        expected_files(variant)
            .iter()
            .all(|file| root.join(file).is_file())
    }

    /// Descriptor for a `demo` project at `target`
    pub fn descriptor(variant: TemplateVariant, target: impl AsRef<Path>) -> ProjectDescriptor {
        let npm_versions = BTreeMap::from([
            (
                "@minecraft/server".to_string(),
                "1.8.0-beta.1.20.30-stable".to_string(),
            ),
            (
                "@minecraft/server-ui".to_string(),
                "1.1.0-beta.1.20.30-stable".to_string(),
            ),
        ]);
        let module_versions = BTreeMap::from([
            ("@minecraft/server".to_string(), "1.8.0-beta".to_string()),
            ("@minecraft/server-ui".to_string(), "1.1.0-beta".to_string()),
        ]);

        ProjectDescriptor {
            variant,
            target_path: target.as_ref().to_path_buf(),
            name: "demo".to_string(),
            description: "A demo pack".to_string(),
            platform_version: [1, 20, 30],
            npm_versions,
            module_versions,
        }
    }
}
