//! Entry script source

use crate::error::Result;
use crate::project::ProjectDescriptor;

const HELLO_WORLD: &str = r#"import { world } from "@minecraft/server";

world.afterEvents.worldInitialize.subscribe(() => {
   world.sendMessage("Hello World!");
});
"#;

/// Render the entry script; the source is valid as both JS and TS
pub fn render(_descriptor: &ProjectDescriptor) -> Result<String> {
    Ok(HELLO_WORLD.to_string())
}
