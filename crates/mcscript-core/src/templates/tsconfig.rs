//! Compiler configuration (`tsconfig.json`) for the Typescript variant

use crate::error::Result;
use crate::project::ProjectDescriptor;
use serde_json::json;

/// Render `tsconfig.json`; sources under `src/` compile into `scripts/`
pub fn render(_descriptor: &ProjectDescriptor) -> Result<String> {
    super::to_json(&json!({
        "compilerOptions": {
            "module": "ES2020",
            "target": "ES2021",
            "moduleResolution": "node",
            "allowSyntheticDefaultImports": true,
            "baseUrl": "./src",
            "rootDir": "./src",
            "outDir": "./scripts",
            "forceConsistentCasingInFileNames": true,
        },
        "exclude": ["./node_modules"],
        "include": ["./src"],
    }))
}
