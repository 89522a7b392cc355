//! Scaffold orchestration
//!
//! Drives one project creation end to end:
//!
//! ```text
//! Init -> CollectingInput -> ResolvingVersions -> Materializing -> Installing -> Done
//!                  \                  \                   \              \
//!                   `------------------`-------------------`--------------`--> Failed
//! ```
//!
//! Registry lookups start in the background as soon as input collection
//! begins. Nothing touches the filesystem before `Materializing`. From there
//! on, the directory creation, template materialization and dependency
//! installation run concurrently; if any of them fails the target directory
//! is removed once all three have settled.

pub mod directory;
pub mod guard;
pub mod installer;
pub mod ui;

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use crate::project::ProjectDescriptor;
use crate::templates::{Materializer, TemplateEngine, TemplateVariant};
use crate::versions::{Registry, VersionGroup, VersionResolver};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

pub use directory::{LocalDirectory, ProjectDirectory};
pub use guard::InterruptGuard;
pub use installer::{added_packages, stderr_diagnostics, BunInstaller, Installer};
pub use ui::{ProjectNameRule, Prompter, Reporter, SilentReporter};

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldState {
    Init,
    CollectingInput,
    ResolvingVersions,
    Materializing,
    Installing,
    Done,
    Failed,
}

impl fmt::Display for ScaffoldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaffoldState::Init => "init",
            ScaffoldState::CollectingInput => "collecting-input",
            ScaffoldState::ResolvingVersions => "resolving-versions",
            ScaffoldState::Materializing => "materializing",
            ScaffoldState::Installing => "installing",
            ScaffoldState::Done => "done",
            ScaffoldState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    /// The created project directory
    pub path: PathBuf,
    /// Wall-clock time spent creating files and installing dependencies
    pub elapsed: Duration,
    /// Packages the installer reported as added
    pub installed: Vec<String>,
    pub descriptor: ProjectDescriptor,
}

/// Answers gathered before any version is resolved
struct ProjectInput {
    name: String,
    description: String,
    variant: TemplateVariant,
}

/// Creates one project: prompts, resolves versions, writes files, installs
pub struct Scaffolder<R, I, M = TemplateEngine, D = LocalDirectory> {
    resolver: Arc<VersionResolver<R>>,
    installer: I,
    materializer: M,
    directory: D,
    interrupts: InterruptGuard,
    base_dir: PathBuf,
    modules: &'static [&'static str],
    channel_suffix: &'static str,
    state: ScaffoldState,
    history: Vec<ScaffoldState>,
}

impl<R: Registry, I: Installer> Scaffolder<R, I> {
    /// Create a scaffolder that creates projects under `base_dir`
    pub fn new<C: ProductConfig>(
        config: &C,
        registry: R,
        installer: I,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver: Arc::new(VersionResolver::new(registry)),
            installer,
            materializer: TemplateEngine::new(),
            directory: LocalDirectory,
            interrupts: InterruptGuard::new(),
            base_dir: base_dir.into(),
            modules: config.required_modules(),
            channel_suffix: config.channel_suffix(),
            state: ScaffoldState::Init,
            history: vec![ScaffoldState::Init],
        }
    }
}

impl<R, I, M, D> Scaffolder<R, I, M, D> {
    /// Replace the template engine
    pub fn with_materializer<N>(self, materializer: N) -> Scaffolder<R, I, N, D> {
        Scaffolder {
            resolver: self.resolver,
            installer: self.installer,
            materializer,
            directory: self.directory,
            interrupts: self.interrupts,
            base_dir: self.base_dir,
            modules: self.modules,
            channel_suffix: self.channel_suffix,
            state: self.state,
            history: self.history,
        }
    }

    /// Replace the way the project directory is created
    pub fn with_directory<E>(self, directory: E) -> Scaffolder<R, I, M, E> {
        Scaffolder {
            resolver: self.resolver,
            installer: self.installer,
            materializer: self.materializer,
            directory,
            interrupts: self.interrupts,
            base_dir: self.base_dir,
            modules: self.modules,
            channel_suffix: self.channel_suffix,
            state: self.state,
            history: self.history,
        }
    }

    /// Share the flag a signal handler consults before exiting
    pub fn with_interrupt_guard(mut self, interrupts: InterruptGuard) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn state(&self) -> ScaffoldState {
        self.state
    }

    /// Every state entered so far, starting with `Init`
    pub fn history(&self) -> &[ScaffoldState] {
        &self.history
    }

    fn transition(&mut self, next: ScaffoldState) {
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
        self.history.push(next);
    }
}

impl<R, I, M, D> Scaffolder<R, I, M, D>
where
    R: Registry + Send + Sync + 'static,
    I: Installer,
    M: Materializer,
    D: ProjectDirectory,
{
    /// Run the whole workflow.
    ///
    /// On failure the state is `Failed` and, if anything had been written,
    /// the target directory has already been removed.
    pub async fn run<P, O>(&mut self, prompter: &mut P, reporter: &mut O) -> Result<ScaffoldOutcome>
    where
        P: Prompter,
        O: Reporter,
    {
        let result = self.drive(prompter, reporter).await;
        match &result {
            Ok(outcome) => info!(
                path = %outcome.path.display(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "project created"
            ),
            Err(err) => {
                debug!(error = %err, "scaffold failed");
                self.transition(ScaffoldState::Failed);
            }
        }
        result
    }

    async fn drive<P, O>(&mut self, prompter: &mut P, reporter: &mut O) -> Result<ScaffoldOutcome>
    where
        P: Prompter,
        O: Reporter,
    {
        self.transition(ScaffoldState::CollectingInput);
        let prefetch = self.prefetch_versions();
        let input = match self.collect_input(prompter) {
            Ok(input) => input,
            Err(err) => {
                prefetch.abort();
                return Err(err);
            }
        };

        self.transition(ScaffoldState::ResolvingVersions);
        let descriptor = self
            .resolve_descriptor(prefetch, prompter, reporter, input)
            .await?;

        // Ctrl+C is ignored from here on; the run ends in Done or a rollback
        let _shielded = self.interrupts.enter();
        let started = Instant::now();
        self.transition(ScaffoldState::Materializing);
        self.transition(ScaffoldState::Installing);
        reporter.step_started("Creating project and installing dependencies...");

        match self.materialize_and_install(&descriptor).await {
            Ok(installed) => {
                reporter.step_succeeded("Dependencies installed successfully!");
                self.transition(ScaffoldState::Done);
                Ok(ScaffoldOutcome {
                    path: descriptor.target_path.clone(),
                    elapsed: started.elapsed(),
                    installed,
                    descriptor,
                })
            }
            Err(err) => {
                reporter.step_failed("An error occurred while creating the project.");
                Err(err)
            }
        }
    }

    /// Start resolving every required module in the background
    fn prefetch_versions(&self) -> JoinHandle<Result<VersionGroup>> {
        let resolver = Arc::clone(&self.resolver);
        let modules = self.modules;
        tokio::spawn(async move { resolver.resolve(modules).await })
    }

    /// Name, description and template, validated before anything is written
    fn collect_input<P: Prompter>(&self, prompter: &mut P) -> Result<ProjectInput> {
        let rule = ProjectNameRule::new(&self.base_dir);
        let name = prompter.project_name(&rule)?;
        rule.check(&name)?;

        Ok(ProjectInput {
            name: name.trim().to_string(),
            description: prompter.description()?,
            variant: prompter.template(&TemplateVariant::ALL)?,
        })
    }

    /// Await the prefetched versions, let the user pick a platform version
    /// and build the descriptor
    async fn resolve_descriptor<P, O>(
        &self,
        prefetch: JoinHandle<Result<VersionGroup>>,
        prompter: &mut P,
        reporter: &mut O,
        input: ProjectInput,
    ) -> Result<ProjectDescriptor>
    where
        P: Prompter,
        O: Reporter,
    {
        reporter.step_started("Fetching SDK versions...");
        let resolved = match prefetch.await {
            Ok(resolved) => resolved,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(ScaffoldError::Cancelled),
        };
        let group = match resolved {
            Ok(group) if group.is_empty() => {
                reporter.step_failed("No stable SDK versions found");
                return Err(ScaffoldError::Validation(format!(
                    "No stable releases found for {}",
                    self.modules.join(", ")
                )));
            }
            Ok(group) => {
                reporter.step_succeeded(&format!("Found {} platform versions", group.len()));
                group
            }
            Err(err) => {
                reporter.step_failed("Failed to fetch SDK versions");
                return Err(err);
            }
        };

        let platform_version = prompter.platform_version(&group)?;
        let selection = group.get(&platform_version).ok_or_else(|| {
            ScaffoldError::Validation(format!("Unknown platform version: {}", platform_version))
        })?;

        let descriptor = ProjectDescriptor::new(
            input.variant,
            self.base_dir.join(&input.name),
            input.name,
            input.description,
            &platform_version,
            selection,
            self.modules,
            self.channel_suffix,
        )?;

        let pinned: Vec<String> = descriptor
            .npm_versions
            .iter()
            .map(|(module, tag)| format!("{}@{}", module, tag))
            .collect();
        reporter.info(&format!(
            "Platform version {}: {}",
            platform_version,
            pinned.join(", ")
        ));
        debug!(module_versions = ?descriptor.module_versions, "descriptor built");
        Ok(descriptor)
    }

    /// Create the directory, write the template and install dependencies concurrently.
    ///
    /// The installer only starts once `package.json` has been written. All
    /// three tasks settle before a failure is reported; the reported failure
    /// is the first in task order (directory, template, install).
    #[instrument(skip_all, fields(target = %descriptor.target_path.display()))]
    async fn materialize_and_install(&self, descriptor: &ProjectDescriptor) -> Result<Vec<String>> {
        let target = descriptor.target_path.as_path();
        let (package_tx, package_rx) = oneshot::channel();

        let create_dir = self.directory.create(target);
        let materialize = self.materializer.materialize(descriptor, Some(package_tx));
        let install = async {
            if package_rx.await.is_err() {
                return Err(ScaffoldError::Subprocess(
                    "installer not started: package.json was not written".to_string(),
                ));
            }
            self.installer.install(target).await
        };

        let (create_dir, materialize, install) = tokio::join!(create_dir, materialize, install);

        let mut failures = Vec::new();
        if let Err(err) = create_dir {
            failures.push(("create directory", err));
        }
        if let Err(err) = materialize {
            failures.push(("materialize template", err));
        }
        let installed = match install {
            Ok(installed) => installed,
            Err(err) => {
                failures.push(("install dependencies", err));
                Vec::new()
            }
        };

        let mut failures = failures.into_iter();
        match failures.next() {
            None => Ok(installed),
            Some((task, err)) => {
                warn!(task, error = %err, "scaffold task failed, rolling back");
                for (task, other) in failures {
                    warn!(task, error = %other, "additional task failure");
                }
                rollback(target).await;
                Err(err)
            }
        }
    }
}

/// Best-effort removal of a partially created project
async fn rollback(target: &Path) {
    match fs::remove_dir_all(target).await {
        Ok(()) => info!(path = %target.display(), "removed partially created project"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %target.display(), error = %err, "rollback failed"),
    }
}
