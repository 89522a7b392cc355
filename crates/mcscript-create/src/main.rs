//! create-mcscript - Project scaffolding for Bedrock script add-ons

mod logging;

use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use mcscript_core::scaffold::InterruptGuard;
use mcscript_core::tui::CreateArgs;
use mcscript_core::{ProductConfig, ScaffoldError};
use std::path::PathBuf;
use std::process::ExitCode;

/// MCPE-Script product configuration
#[derive(Clone)]
pub struct McScriptConfig;

impl ProductConfig for McScriptConfig {
    fn name(&self) -> &'static str {
        "create-mcscript"
    }

    fn display_name(&self) -> &'static str {
        "MCPE-Script Project Creator"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    fn registry_url_env(&self) -> &'static str {
        "MCSCRIPT_REGISTRY_URL"
    }

    fn required_modules(&self) -> &'static [&'static str] {
        &["@minecraft/server", "@minecraft/server-ui"]
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-mcscript")]
#[command(about = "CLI for scaffolding Bedrock script projects")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(ClapArgs, Debug)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new script project
    Create(CliCreateArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct CliCreateArgs {
    /// Directory to create the project in (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// Template to use (typescript, javascript)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Platform version to target (e.g. 1.20.30)
    #[arg(short, long = "platform-version")]
    pub platform_version: Option<String>,

    /// Registry base URL (overrides MCSCRIPT_REGISTRY_URL)
    #[arg(long = "registry-url")]
    pub registry_url: Option<String>,

    /// Skip the Bun installation check
    #[arg(long = "skip-bun-check")]
    pub skip_bun_check: bool,

    /// Accept defaults for every prompt not answered by a flag (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            directory: args.directory,
            name: args.name,
            description: args.description,
            template: args.template,
            platform_version: args.platform_version,
            registry_url: args.registry_url,
            skip_bun_check: args.skip_bun_check,
            yes: args.yes,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully. While project files are being written the
    // signal is ignored so the run can finish or roll back.
    let interrupts = InterruptGuard::new();
    let handler_view = interrupts.clone();
    ctrlc::set_handler(move || {
        if handler_view.is_active() {
            return;
        }
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    if let Err(e) = logging::init_logging(args.global.verbose, args.global.quiet) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
    tracing::debug!(?args, "parsed arguments");

    let config = McScriptConfig;
    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args,
        // No subcommand provided, default to create behavior (interactive mode)
        None => CliCreateArgs::default(),
    };

    let mut core_args = CreateArgs::from(create_args);
    core_args.interrupts = interrupts;
    let result = run(&config, core_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // The prompt outro already reported it
        Err(e) if is_cancellation(&e) => ExitCode::from(130),
        Err(e) => {
            eprintln!("{} {}", "✖".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &McScriptConfig, args: CreateArgs) -> anyhow::Result<()> {
    mcscript_core::run(config, args).await?;
    Ok(())
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ScaffoldError>()
        .is_some_and(ScaffoldError::is_cancelled)
}
