//! Dependency installation subprocess

use crate::error::{Result, ScaffoldError};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::{debug, instrument};

/// Installs a project's dependencies
pub trait Installer {
    /// Install dependencies with `project_dir` as the working directory.
    ///
    /// Returns the packages reported as added.
    fn install(&self, project_dir: &Path) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Runs `bun install` (or another package-manager command) in the project
#[derive(Debug, Clone)]
pub struct BunInstaller {
    program: String,
    args: Vec<String>,
}

impl BunInstaller {
    pub fn new() -> Self {
        Self::with_command("bun", &["install", "--no-progress"])
    }

    /// Use an arbitrary installer command
    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The full command line, for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for BunInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl Installer for BunInstaller {
    #[instrument(skip_all, fields(command = %self.command_line(), dir = %project_dir.display()))]
    async fn install(&self, project_dir: &Path) -> Result<Vec<String>> {
        let output = TokioCommand::new(&self.program)
            .args(&self.args)
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ScaffoldError::Subprocess(format!("failed to run {}: {}", self.command_line(), e))
            })?;

        // Anything on stderr besides the banner is a failure, whatever the exit code
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = stderr_diagnostics(&stderr);
        if !diagnostics.is_empty() {
            return Err(ScaffoldError::Subprocess(diagnostics.join("\n")));
        }
        if !output.status.success() {
            return Err(ScaffoldError::Subprocess(format!(
                "{} exited with code {}",
                self.command_line(),
                output.status.code().unwrap_or(-1)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let added = added_packages(&stdout);
        debug!(count = added.len(), "dependencies installed");
        Ok(added)
    }
}

/// Installer stderr lines that signal a problem.
///
/// Blank lines and the `bun install vX.Y.Z` banner are not diagnostics.
pub fn stderr_diagnostics(stderr: &str) -> Vec<String> {
    stderr
        .lines()
        .map(|line| console::strip_ansi_codes(line).trim().to_string())
        .filter(|line| !line.is_empty() && !is_banner(line))
        .collect()
}

fn is_banner(line: &str) -> bool {
    line.strip_prefix("bun install v")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Lines of installer output announcing an added package (`+ name@version`)
pub fn added_packages(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| console::strip_ansi_codes(line).trim().to_string())
        .filter(|line| line.starts_with('+'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_packages_strips_colors() {
        let output = "bun install v1.1.0\n\n\u{1b}[0m\u{1b}[32m+\u{1b}[0m @minecraft/server@1.8.0-beta\n\u{1b}[0m\u{1b}[32m+\u{1b}[0m typescript@5.4.5\n\n 2 packages installed [120.00ms]\n";
        assert_eq!(
            added_packages(output),
            vec!["+ @minecraft/server@1.8.0-beta", "+ typescript@5.4.5"]
        );
    }

    #[test]
    fn test_command_line() {
        assert_eq!(BunInstaller::new().command_line(), "bun install --no-progress");
    }

    #[test]
    fn test_banner_is_not_a_diagnostic() {
        let stderr = "\u{1b}[1mbun install \u{1b}[0mv1.1.38 (bf2f153f)\n\n";
        assert!(stderr_diagnostics(stderr).is_empty());
        assert!(stderr_diagnostics("bun install v1.2.0\n").is_empty());
    }

    #[test]
    fn test_errors_after_banner_are_diagnostics() {
        let stderr = "bun install v1.1.38\nerror: @minecraft/server@9.9.9 failed to resolve\n";
        assert_eq!(
            stderr_diagnostics(stderr),
            vec!["error: @minecraft/server@9.9.9 failed to resolve"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_banner_only_stderr_is_success() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = BunInstaller::with_command(
            "sh",
            &["-c", "echo 'bun install v1.1.38' >&2; echo '+ typescript@5.4.5'"],
        );

        let added = installer.install(tmp.path()).await.unwrap();
        assert_eq!(added, vec!["+ typescript@5.4.5"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_in_project_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = BunInstaller::with_command("sh", &["-c", "echo \"+ $(basename \"$PWD\")\""]);
        let dir = tmp.path().join("demo");
        std::fs::create_dir(&dir).unwrap();

        let added = installer.install(&dir).await.unwrap();
        assert_eq!(added, vec!["+ demo"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_output_is_failure_even_on_success() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = BunInstaller::with_command("sh", &["-c", "echo boom >&2; exit 0"]);

        let err = installer.install(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Subprocess(msg) if msg == "boom"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = BunInstaller::with_command("sh", &["-c", "exit 3"]);

        let err = installer.install(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Subprocess(msg) if msg.contains("code 3")));
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = BunInstaller::with_command("definitely-not-an-installer-xyz", &[]);

        let err = installer.install(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Subprocess(_)));
    }
}
