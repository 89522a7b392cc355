//! Generic tool management for CLI tools
//!
//! Checks whether a CLI tool is on PATH and installs it through another
//! package manager when it is missing (e.g. bun via `npm install -g bun`).

use crate::error::{Result, ScaffoldError};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::{debug, instrument};

/// Timeout for installation (two minutes; global npm installs are slow)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a CLI tool
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Name of the tool binary (e.g., "bun")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Program and arguments that install the tool
    pub install_command: &'static [&'static str],
    /// URL to the documentation
    pub docs_url: &'static str,
}

/// Manager for checking and installing CLI tools
pub struct ToolManager {
    config: ToolConfig,
}

impl ToolManager {
    /// Create a new tool manager with the given configuration
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Get the tool configuration
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Get the install command string
    pub fn install_command(&self) -> String {
        self.config.install_command.join(" ")
    }

    /// Get the installed tool version (if available)
    pub async fn get_version(&self) -> Option<String> {
        TokioCommand::new(self.config.name)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .map(|s| s.trim().to_string())
                } else {
                    None
                }
            })
    }

    /// Install the tool, capturing the installer's output
    #[instrument(skip_all, fields(tool = self.config.name))]
    pub async fn install(&self) -> Result<()> {
        let cmd = self.install_command();
        let (program, args) = self
            .config
            .install_command
            .split_first()
            .ok_or_else(|| ScaffoldError::Subprocess(format!("No install command for {}", self.config.name)))?;

        debug!(command = %cmd, "installing tool");
        let install = TokioCommand::new(program)
            .args(args.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        match timeout(INSTALL_TIMEOUT, install).await {
            Ok(Ok(output)) if output.status.success() => Ok(()),
            Ok(Ok(output)) => Err(ScaffoldError::Subprocess(format!(
                "Failed to install {} (exit code {}): {}\nPlease try installing manually: {}",
                self.config.display_name,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim(),
                cmd
            ))),
            Ok(Err(e)) => Err(ScaffoldError::Subprocess(format!(
                "Failed to run {}: {}",
                cmd, e
            ))),
            Err(_) => Err(ScaffoldError::Subprocess(format!(
                "Installation timed out after {} seconds.\n\
                 Please try installing manually: {}",
                INSTALL_TIMEOUT.as_secs(),
                cmd
            ))),
        }
    }
}

/// Pre-configured tool manager for bun
pub fn bun_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "bun",
        display_name: "Bun",
        install_command: &["npm", "install", "-g", "bun"],
        docs_url: "https://bun.sh/docs/installation",
    })
}
