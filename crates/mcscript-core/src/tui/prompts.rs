//! Charm-style CLI prompts using cliclack

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::runtime::tool;
use crate::scaffold::{
    BunInstaller, InterruptGuard, ProjectNameRule, Prompter, Reporter, ScaffoldOutcome, Scaffolder,
};
use crate::templates::TemplateVariant;
use crate::versions::{HttpRegistry, VersionGroup};
use cliclack::ProgressBar;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory the project folder is created in (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Project name
    pub name: Option<String>,

    /// Project description
    pub description: Option<String>,

    /// Template to use (typescript/javascript)
    pub template: Option<String>,

    /// Platform version to target
    pub platform_version: Option<String>,

    /// Registry base URL, overriding the product's environment variable and default
    pub registry_url: Option<String>,

    /// Skip the bun installation check
    pub skip_bun_check: bool,

    /// Accept defaults for every prompt not answered by a flag (non-interactive mode)
    pub yes: bool,

    /// Raised while project files are being written; shared with the Ctrl+C handler
    pub interrupts: InterruptGuard,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<ScaffoldOutcome> {
    cliclack::intro(format!("Welcome to the {}!", config.display_name()))?;

    // Step 1: Make sure the installer is available
    if args.skip_bun_check {
        cliclack::log::info("Skipping Bun check")?;
    } else {
        ensure_bun().await?;
    }

    // Step 2: Wire up the scaffolder
    let registry = HttpRegistry::from_config(config, args.registry_url.as_deref())?;
    let base_dir = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| ScaffoldError::file_system(".", e))?,
    };
    let mut scaffolder = Scaffolder::new(config, registry, BunInstaller::new(), base_dir)
        .with_interrupt_guard(args.interrupts.clone());

    // Step 3: Prompt, resolve, create and install
    let mut prompter = CliPrompter::new(args);
    let mut reporter = CliReporter::default();
    let outcome = match scaffolder.run(&mut prompter, &mut reporter).await {
        Ok(outcome) => outcome,
        Err(err) if err.is_cancelled() => {
            cliclack::outro_cancel(err.to_string())?;
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    // Step 4: Summary
    print_summary(&outcome)?;

    Ok(outcome)
}

/// Check for bun and install it through npm when missing
async fn ensure_bun() -> Result<()> {
    let tool = tool::bun_tool();

    if let Some(version) = tool.get_version().await {
        cliclack::log::success(format!(
            "{} installed ({})",
            tool.config().display_name,
            version
        ))?;
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Installing {}...", tool.config().display_name));
    match tool.install().await {
        Ok(()) => {
            spinner.stop(format!(
                "{} installed successfully.",
                tool.config().display_name
            ));
            Ok(())
        }
        Err(e) => {
            spinner.error(format!(
                "Failed to install {} ({})",
                tool.config().display_name,
                tool.config().docs_url
            ));
            Err(e)
        }
    }
}

/// Prompter backed by cliclack; flags answer prompts up front
pub struct CliPrompter {
    args: CreateArgs,
}

impl CliPrompter {
    pub fn new(args: CreateArgs) -> Self {
        Self { args }
    }
}

impl Prompter for CliPrompter {
    fn project_name(&mut self, rule: &ProjectNameRule) -> Result<String> {
        if let Some(name) = &self.args.name {
            cliclack::log::info(format!("Project name: {}", name))?;
            return Ok(name.clone());
        }

        let rule = rule.clone();
        let name: String = cliclack::input("Enter the project name:")
            .placeholder("my-addon")
            .validate(move |input: &String| rule.check(input).map_err(|e| e.to_string()))
            .interact()?;
        Ok(name)
    }

    fn description(&mut self) -> Result<String> {
        if let Some(description) = &self.args.description {
            return Ok(description.clone());
        }
        if self.args.yes {
            return Ok(String::new());
        }

        let description: String = cliclack::input("Enter the project description:")
            .required(false)
            .interact()?;
        Ok(description)
    }

    fn template(&mut self, variants: &[TemplateVariant]) -> Result<TemplateVariant> {
        if let Some(name) = &self.args.template {
            let variant = TemplateVariant::parse(name)
                .filter(|v| variants.contains(v))
                .ok_or_else(|| {
                    let available: Vec<&str> = variants.iter().map(|v| v.display_name()).collect();
                    ScaffoldError::Validation(format!(
                        "Template '{}' not found. Available templates: {}",
                        name,
                        available.join(", ")
                    ))
                })?;
            cliclack::log::info(format!("Using template: {}", variant))?;
            return Ok(variant);
        }

        let first = variants
            .first()
            .copied()
            .ok_or_else(|| ScaffoldError::Validation("No templates available.".to_string()))?;
        if self.args.yes {
            return Ok(first);
        }

        let mut select = cliclack::select("Choose a template:");
        for variant in variants {
            let label = match variant {
                TemplateVariant::Typescript => variant.display_name().bright_blue(),
                TemplateVariant::Javascript => variant.display_name().bright_yellow(),
            };
            select = select.item(*variant, label, "");
        }
        Ok(select.interact()?)
    }

    fn platform_version(&mut self, group: &VersionGroup) -> Result<String> {
        if let Some(version) = &self.args.platform_version {
            cliclack::log::info(format!("Platform version: {}", version))?;
            return Ok(version.clone());
        }

        let latest = group
            .latest()
            .ok_or_else(|| ScaffoldError::Validation("No platform versions available.".to_string()))?;
        if self.args.yes {
            cliclack::log::info(format!("Platform version: {} (latest)", latest))?;
            return Ok(latest.to_string());
        }

        let mut select = cliclack::select("Choose a Minecraft version:");
        for (idx, version) in group.platform_versions().enumerate() {
            let hint = if idx == 0 { "latest" } else { "" };
            select = select.item(version.to_string(), version, hint);
        }
        Ok(select.interact()?)
    }
}

/// Reporter backed by a cliclack spinner
#[derive(Default)]
pub struct CliReporter {
    spinner: Option<ProgressBar>,
}

impl Reporter for CliReporter {
    fn step_started(&mut self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        self.spinner = Some(spinner);
    }

    fn step_succeeded(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => {
                let _ = cliclack::log::success(message);
            }
        }
    }

    fn step_failed(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => {
                let _ = cliclack::log::error(message);
            }
        }
    }

    fn info(&mut self, message: &str) {
        let _ = cliclack::log::info(message);
    }
}

/// Human-friendly elapsed time: `850ms`, `2.3s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis >= 1000 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", millis)
    }
}

fn print_summary(outcome: &ScaffoldOutcome) -> Result<()> {
    if !outcome.installed.is_empty() {
        let packages: Vec<String> = outcome
            .installed
            .iter()
            .map(|line| format!("  {}", line))
            .collect();
        cliclack::log::remark(packages.join("\n").dimmed().to_string())?;
    }

    cliclack::outro(format!(
        "{} {}\n   {} \"{}\"",
        format!("Project \"{}\" created successfully!", outcome.descriptor.name).bright_green(),
        format!("[{}]", format_elapsed(outcome.elapsed)).dimmed(),
        "Location:".bright_cyan(),
        outcome.path.display()
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_milliseconds() {
        assert_eq!(format_elapsed(Duration::from_millis(0)), "0ms");
        assert_eq!(format_elapsed(Duration::from_millis(999)), "999ms");
    }

    #[test]
    fn test_format_elapsed_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(1000)), "1.0s");
        assert_eq!(format_elapsed(Duration::from_millis(2345)), "2.3s");
    }

    #[test]
    fn test_flags_answer_prompts() {
        let mut prompter = CliPrompter::new(CreateArgs {
            template: Some("js".to_string()),
            description: Some("desc".to_string()),
            ..Default::default()
        });

        assert_eq!(
            prompter.template(&TemplateVariant::ALL).unwrap(),
            TemplateVariant::Javascript
        );
        assert_eq!(prompter.description().unwrap(), "desc");
    }

    #[test]
    fn test_unknown_template_flag_is_rejected() {
        let mut prompter = CliPrompter::new(CreateArgs {
            template: Some("rust".to_string()),
            ..Default::default()
        });

        let err = prompter.template(&TemplateVariant::ALL).unwrap_err();
        assert!(err.to_string().contains("Available templates: Typescript, Javascript"));
    }

    #[test]
    fn test_yes_mode_defaults() {
        let mut prompter = CliPrompter::new(CreateArgs {
            yes: true,
            ..Default::default()
        });

        assert_eq!(prompter.description().unwrap(), "");
        assert_eq!(
            prompter.template(&TemplateVariant::ALL).unwrap(),
            TemplateVariant::Typescript
        );
    }
}
