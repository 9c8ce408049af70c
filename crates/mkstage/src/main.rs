//! mkstage CLI - MkDocs staging and build pipeline.
//!
//! Provides commands for:
//! - `stage`: Rewrite the Markdown working tree into the MkDocs layout
//! - `make`: Render `mkdocs.yml` and build, bundle, or deploy the site

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{MakeArgs, StageArgs};
use output::Output;

/// mkstage - MkDocs staging and build pipeline.
#[derive(Parser)]
#[command(name = "mkstage", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage the Markdown sources into the MkDocs project layout.
    Stage(StageArgs),
    /// Make a target: mkdocs, site, or ghpages.
    Make(MakeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Stage(args) => args.verbose,
        Commands::Make(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Stage(args) => args.execute(),
        Commands::Make(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
