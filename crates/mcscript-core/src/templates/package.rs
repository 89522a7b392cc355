//! Package descriptor (`package.json`) generation

use super::TemplateVariant;
use crate::error::Result;
use crate::project::ProjectDescriptor;
use serde_json::{json, Map, Value};

/// Render `package.json`.
///
/// Every required module is pinned to its channel-suffixed version. The
/// Typescript variant also gets the compiler and build scripts.
pub fn render(descriptor: &ProjectDescriptor) -> Result<String> {
    let mut dependencies: Map<String, Value> = descriptor
        .module_versions
        .iter()
        .map(|(module, version)| (module.clone(), Value::String(version.clone())))
        .collect();

    let mut package = Map::new();
    if descriptor.variant == TemplateVariant::Typescript {
        package.insert(
            "scripts".to_string(),
            json!({
                "dev": "bun tsc -w",
                "build": "bun tsc",
            }),
        );
        dependencies.insert("typescript".to_string(), json!("latest"));
    }
    package.insert("dependencies".to_string(), Value::Object(dependencies));

    super::to_json(&package)
}
