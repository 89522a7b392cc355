//! MCPE-Script core - scaffolding for Bedrock script projects
//!
//! This library creates a new scripted add-on project: it resolves
//! compatible `@minecraft/*` SDK module versions from the npm registry,
//! writes the chosen template and installs dependencies, rolling the project
//! directory back if anything fails.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - version resolution (`versions`), template
//!   generation (`templates`), tool management (`runtime`)
//! - **Layer 2: Workflow Orchestration** - `Scaffolder` driving the state machine,
//!   with `Prompter`/`Reporter`/`Installer`/`Registry`/`ProjectDirectory` seams for custom front ends
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use mcscript_core::{BunInstaller, HttpRegistry, Scaffolder, SilentReporter};
//!
//! let registry = HttpRegistry::from_config(&MyConfig, None)?;
//! let mut scaffolder = Scaffolder::new(&MyConfig, registry, BunInstaller::new(), ".");
//! let outcome = scaffolder.run(&mut my_prompter, &mut SilentReporter).await?;
//! println!("created {}", outcome.path.display());
//! ```

pub mod error;
pub mod product;
pub mod project;
pub mod runtime;
pub mod scaffold;
pub mod templates;
pub mod versions;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{Result, ScaffoldError};
pub use product::ProductConfig;
pub use project::ProjectDescriptor;
pub use scaffold::{
    BunInstaller, Installer, InterruptGuard, LocalDirectory, ProjectDirectory, Prompter, Reporter,
    ScaffoldOutcome, ScaffoldState, Scaffolder, SilentReporter,
};
pub use templates::{Materializer, TemplateEngine, TemplateVariant};
pub use versions::{HttpRegistry, Registry, VersionGroup, VersionResolver};

#[cfg(feature = "tui")]
pub use tui::run;
