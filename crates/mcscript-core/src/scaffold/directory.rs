//! Creation of the project directory

use crate::error::{Result, ScaffoldError};
use std::future::Future;
use std::path::Path;
use tokio::fs;

/// Creates the directory a project is written into
pub trait ProjectDirectory {
    /// Create `path` along with any missing parents
    fn create(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Creates directories on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDirectory;

impl ProjectDirectory for LocalDirectory {
    async fn create(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| ScaffoldError::file_system(path, e))
    }
}
