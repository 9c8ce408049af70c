//! `mkstage make` command implementation.

use std::path::PathBuf;

use clap::Args;
use mkstage_build::{BuildArtifact, MkdocsBackend};
use mkstage_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the make command.
#[derive(Args)]
pub(crate) struct MakeArgs {
    /// Target to make: mkdocs, site, or ghpages.
    target: String,

    /// Working directory holding the staged project (overrides config).
    #[arg(short, long)]
    working_dir: Option<PathBuf>,

    /// Directory to place artifacts in.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Path to the external mkdocs executable (overrides config).
    #[arg(long)]
    mkdocs_path: Option<String>,

    /// Slug used for artifact names (overrides config).
    #[arg(long)]
    slug: Option<String>,

    /// Path to configuration file (default: auto-discover mkstage.yml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl MakeArgs {
    /// Execute the make command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            working_dir: self.working_dir.clone(),
            mkdocs_path: self.mkdocs_path.clone(),
            slug: self.slug.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let working_dir = config.paths.working_dir.clone();
        let backend = MkdocsBackend::new(config, working_dir, self.output_dir);

        match backend.make(&self.target)? {
            BuildArtifact::Path(path) => {
                output.success(&format!("Made {} at {}", self.target, path.display()));
            }
            BuildArtifact::Url(url) => {
                output.success(&format!("Deployed {}", self.target));
                output.highlight(&url);
            }
        }
        Ok(())
    }
}
