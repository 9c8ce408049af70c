//! CLI error types.

use mkstage_build::BuildError;
use mkstage_config::ConfigError;
use mkstage_stage::StageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Stage(#[from] StageError),

    #[error("{0}")]
    Build(#[from] BuildError),
}
