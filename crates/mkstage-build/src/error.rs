//! Backend error types.

use std::path::PathBuf;

use mkstage_nav::NavError;

/// Error raised inside a `make` run.
#[derive(Debug, thiserror::Error)]
pub enum MakeError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Navigation tree error.
    #[error("{0}")]
    Nav(#[from] NavError),

    /// `mkdocs.yml` could not be serialized.
    #[error("Failed to serialize mkdocs.yml: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The preprocessor has not staged the project directory yet.
    #[error("Staged project directory not found: {} (run the preprocessor first)", .0.display())]
    ProjectNotStaged(PathBuf),

    /// The build tool exited with a non-zero status.
    #[error("MkDocs exited with an error:\n{output}")]
    Tool {
        /// Combined stdout/stderr of the tool.
        output: String,
    },

    /// The build tool exited cleanly but never reported a finished
    /// build.
    #[error("MkDocs finished without reporting a successful build:\n{output}")]
    MarkerMissing {
        /// Combined stdout/stderr of the tool.
        output: String,
    },

    /// The deploy tool exited with a non-zero status.
    #[error("gh-deploy exited with an error:\n{output}")]
    Deploy {
        /// Combined stdout/stderr of the tool.
        output: String,
    },

    /// Target name the backend does not know.
    #[error("MkDocs cannot make {0}")]
    UnsupportedTarget(String),
}

/// Uniform error returned by [`crate::MkdocsBackend::make`].
///
/// Every internal failure is wrapped here; the typed cause stays
/// reachable through [`BuildError::cause`] and [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
#[error("Build failed: {0}")]
pub struct BuildError(#[from] MakeError);

impl BuildError {
    /// The underlying failure.
    #[must_use]
    pub fn cause(&self) -> &MakeError {
        &self.0
    }
}
