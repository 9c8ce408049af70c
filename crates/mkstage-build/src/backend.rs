//! Target dispatch for MkDocs builds.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mkstage_config::Config;
use mkstage_stage::copy_tree;

use crate::error::{BuildError, MakeError};
use crate::renderer::SiteConfigRenderer;
use crate::tool::{escape_path, run_tool};

/// Substring MkDocs prints on a completed build; its absence means the
/// build did not finish even when the exit code is zero.
const SUCCESS_MARKER: &str = "Documentation built";

/// Filename of the generated configuration.
const CONFIG_FILENAME: &str = "mkdocs.yml";

/// Result of a `make` run: a filesystem artifact or a deployed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildArtifact {
    /// Path to a generated site or source directory.
    Path(PathBuf),
    /// URL the documentation was deployed to.
    Url(String),
}

impl fmt::Display for BuildArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Drives `mkdocs` over a staged project directory.
pub struct MkdocsBackend {
    config: Config,
    working_dir: PathBuf,
    output_root: PathBuf,
}

impl MkdocsBackend {
    /// Create a backend over the staged working directory.
    ///
    /// Artifacts are placed under `output_root`.
    #[must_use]
    pub fn new(config: Config, working_dir: PathBuf, output_root: PathBuf) -> Self {
        Self {
            config,
            working_dir,
            output_root,
        }
    }

    /// Make the given target.
    ///
    /// Valid targets are `mkdocs` (project source bundle), `site`
    /// (static site), and `ghpages` (GitHub Pages deployment).
    ///
    /// # Errors
    ///
    /// Every failure is reported as a single [`BuildError`]; the typed
    /// cause stays reachable through [`BuildError::cause`].
    pub fn make(&self, target: &str) -> Result<BuildArtifact, BuildError> {
        tracing::info!("Making {target} with MkDocs");
        Ok(self.run_target(target)?)
    }

    fn run_target(&self, target: &str) -> Result<BuildArtifact, MakeError> {
        let project_dir = self.write_site_config()?;

        match target {
            "mkdocs" => self.make_project(&project_dir),
            "site" => self.make_site(&project_dir),
            "ghpages" => self.make_ghpages(&project_dir),
            other => Err(MakeError::UnsupportedTarget(other.to_owned())),
        }
    }

    /// Render and write `mkdocs.yml` into the staged project
    /// directory.
    fn write_site_config(&self) -> Result<PathBuf, MakeError> {
        let project_dir = self.working_dir.join(self.config.project_dir_name());
        if !project_dir.is_dir() {
            return Err(MakeError::ProjectNotStaged(project_dir));
        }

        let docs_dir = project_dir.join("docs");
        let site_config = SiteConfigRenderer::new(&self.config, &docs_dir).render()?;
        let yaml = serde_yaml::to_string(&site_config)?;
        fs::write(project_dir.join(CONFIG_FILENAME), yaml)?;

        Ok(project_dir)
    }

    /// Replace the output bundle with a fresh copy of the staged
    /// project.
    fn make_project(&self, project_dir: &Path) -> Result<BuildArtifact, MakeError> {
        let bundle_dir = self.output_root.join(self.config.project_dir_name());
        if bundle_dir.exists() {
            fs::remove_dir_all(&bundle_dir)?;
        }
        copy_tree(project_dir, &bundle_dir)?;
        Ok(BuildArtifact::Path(bundle_dir))
    }

    /// Build the static site with `mkdocs build`.
    fn make_site(&self, project_dir: &Path) -> Result<BuildArtifact, MakeError> {
        let site_dir = std::path::absolute(self.output_root.join(self.config.site_dir_name()))?;
        let command = format!(
            "{} build -d \"{}\"",
            self.config.mkdocs.mkdocs_path,
            escape_path(&site_dir),
        );

        let run = run_tool(&command, project_dir)?;
        if !run.success {
            return Err(MakeError::Tool { output: run.output });
        }
        if !run.output.contains(SUCCESS_MARKER) {
            return Err(MakeError::MarkerMissing { output: run.output });
        }

        Ok(BuildArtifact::Path(site_dir))
    }

    /// Deploy to GitHub Pages with `mkdocs gh-deploy`.
    fn make_ghpages(&self, project_dir: &Path) -> Result<BuildArtifact, MakeError> {
        let command = format!("{} gh-deploy", self.config.mkdocs.mkdocs_path);

        let run = run_tool(&command, project_dir)?;
        if !run.success {
            return Err(MakeError::Deploy { output: run.output });
        }

        Ok(BuildArtifact::Url(parse_deploy_url(&run.output)))
    }
}

/// The deployed URL is the text after the last `": "` of the final
/// output line.
fn parse_deploy_url(output: &str) -> String {
    let last_line = output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");
    last_line
        .rsplit(": ")
        .next()
        .unwrap_or(last_line)
        .trim()
        .to_owned()
}
