//! `mkstage stage` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use mkstage_config::{CliSettings, Config};
use mkstage_stage::{ImageCollector, copy_tree, relocate_tree};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the stage command.
#[derive(Args)]
pub(crate) struct StageArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    src_dir: Option<PathBuf>,

    /// Working directory to stage into (overrides config).
    #[arg(short, long)]
    working_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mkstage.yml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl StageArgs {
    /// Execute the stage command.
    ///
    /// Resets the working directory to a fresh copy of the sources,
    /// collects out-of-tree images, then relocates everything into the
    /// MkDocs project layout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            src_dir: self.src_dir.clone(),
            working_dir: self.working_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let src_dir = &config.paths.src_dir;
        let working_dir = &config.paths.working_dir;

        output.info(&format!("Source: {}", src_dir.display()));
        output.info(&format!("Working dir: {}", working_dir.display()));

        if working_dir.exists() {
            fs::remove_dir_all(working_dir)?;
        }
        copy_tree(src_dir, working_dir)?;

        ImageCollector::new(working_dir)?.apply()?;
        let project_dir = relocate_tree(working_dir, &config.project_dir_name())?;

        output.success(&format!("Staged project at {}", project_dir.display()));
        Ok(())
    }
}
