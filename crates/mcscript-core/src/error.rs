//! Error taxonomy for the scaffolding workflow

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the core crate
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Everything that can stop a scaffold run.
///
/// Errors raised while collecting input or resolving versions leave the
/// filesystem untouched. Errors raised while materializing or installing are
/// surfaced only after the target directory has been rolled back.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Bad user input (empty name, directory collision, incomplete version group)
    #[error("{0}")]
    Validation(String),

    /// The user aborted a prompt
    #[error("Project creation canceled.")]
    Cancelled,

    /// Registry unreachable, non-success status or malformed body
    #[error("Failed to fetch versions for {module}: {reason}")]
    Network { module: String, reason: String },

    /// A version tag did not match `<npm>-beta.<platform>-stable`
    #[error("Invalid version format: \"{tag}\"")]
    Format { tag: String },

    /// A template sub-generator failed
    #[error("Failed to generate {file}: {source}")]
    Template {
        file: String,
        #[source]
        source: Box<ScaffoldError>,
    },

    /// Directory creation or file write failure
    #[error("{}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dependency installer reported an error
    #[error("Dependency installation failed: {0}")]
    Subprocess(String),

    /// Terminal failure while prompting (other than an interruption)
    #[error("Prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScaffoldError {
    pub(crate) fn file_system(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn network(module: &str, reason: impl ToString) -> Self {
        Self::Network {
            module: module.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error was caused by the user aborting a prompt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<io::Error> for ScaffoldError {
    /// Terminal I/O errors: an interrupted prompt (Esc / Ctrl+C) is a cancellation
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::Interrupted {
            Self::Cancelled
        } else {
            Self::Prompt(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_prompt_is_cancellation() {
        let err: ScaffoldError = io::Error::new(io::ErrorKind::Interrupted, "esc").into();
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Project creation canceled.");
    }

    #[test]
    fn test_other_io_errors_are_prompt_failures() {
        let err: ScaffoldError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, ScaffoldError::Prompt(_)));
    }

    #[test]
    fn test_template_error_names_the_file() {
        let err = ScaffoldError::Template {
            file: "manifest.json".to_string(),
            source: Box::new(ScaffoldError::file_system(
                "/tmp/demo/manifest.json",
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            )),
        };
        let message = err.to_string();
        assert!(message.contains("manifest.json"));
        assert!(message.contains("denied"));
    }
}
