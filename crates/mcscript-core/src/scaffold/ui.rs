//! Terminal collaborators injected into the orchestrator
//!
//! The orchestrator never touches the terminal itself: input comes through a
//! [`Prompter`] and progress goes out through a [`Reporter`].

use crate::error::{Result, ScaffoldError};
use crate::templates::TemplateVariant;
use crate::versions::VersionGroup;
use std::path::{Component, Path, PathBuf};

/// Validation applied to the project name, both inside the prompt and
/// again by the orchestrator.
#[derive(Debug, Clone)]
pub struct ProjectNameRule {
    base_dir: PathBuf,
}

impl ProjectNameRule {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Accepts a non-empty single directory name that does not exist yet
    pub fn check(&self, input: &str) -> Result<()> {
        let name = input.trim();
        if name.is_empty() {
            return Err(ScaffoldError::Validation(
                "Project name cannot be empty.".to_string(),
            ));
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(ScaffoldError::Validation(format!(
                    "\"{}\" is not a valid directory name.",
                    name
                )))
            }
        }

        if self.base_dir.join(name).exists() {
            return Err(ScaffoldError::Validation(format!(
                "Directory \"{}\" already exists!",
                name
            )));
        }

        Ok(())
    }
}

/// Source of user choices.
///
/// Every method returns [`ScaffoldError::Cancelled`] when the user aborts.
pub trait Prompter {
    /// Project name; implementations should re-prompt while `rule` rejects the input
    fn project_name(&mut self, rule: &ProjectNameRule) -> Result<String>;

    /// Free-text project description
    fn description(&mut self) -> Result<String>;

    /// One of `variants`
    fn template(&mut self, variants: &[TemplateVariant]) -> Result<TemplateVariant>;

    /// One of the group's platform versions; the first one is the latest
    fn platform_version(&mut self, group: &VersionGroup) -> Result<String>;
}

/// Sink for progress output
pub trait Reporter {
    /// A long-running step began
    fn step_started(&mut self, message: &str);

    /// The current step finished successfully
    fn step_succeeded(&mut self, message: &str);

    /// The current step failed
    fn step_failed(&mut self, message: &str);

    /// A standalone informational line, e.g. the pinned module versions
    fn info(&mut self, message: &str);
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn step_started(&mut self, _message: &str) {}
    fn step_succeeded(&mut self, _message: &str) {}
    fn step_failed(&mut self, _message: &str) {}
    fn info(&mut self, _message: &str) {}
}
