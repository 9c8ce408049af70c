//! Configuration management for mkstage.
//!
//! Parses `mkstage.yml` project files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! The external tool path supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `mkdocs.mkdocs_path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Markdown source directory.
    pub src_dir: Option<PathBuf>,
    /// Override staging working directory.
    pub working_dir: Option<PathBuf>,
    /// Override path to the external mkdocs executable.
    pub mkdocs_path: Option<String>,
    /// Override output slug.
    pub slug: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mkstage.yml";

/// Project configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document title, used as the MkDocs site name.
    pub title: String,
    /// Navigation tree: a page path, a sequence of entries, or a
    /// mapping from section titles to nested entries.
    pub chapters: serde_yaml::Value,
    /// Output slug (artifact names derive from it).
    slug: Option<String>,
    /// Markdown source directory (relative string from YAML).
    src_dir: Option<String>,
    /// Staging working directory (relative string from YAML).
    working_dir: Option<String>,
    /// Backend options.
    pub mkdocs: MkdocsOptions,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: ProjectPaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Backend options controlling `mkdocs.yml` generation and tool
/// invocation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MkdocsOptions {
    /// Use the project title as `site_name` when none is set.
    pub use_title: bool,
    /// Use the chapter tree as `nav` when none is set.
    pub use_chapters: bool,
    /// Title bare page entries from their first Markdown heading.
    pub use_headings: bool,
    /// Replacement for empty section titles.
    pub default_subsection_title: String,
    /// Path or command name of the external mkdocs executable.
    pub mkdocs_path: String,
    /// Pass-through mapping merged into the generated `mkdocs.yml`.
    #[serde(rename = "mkdocs.yml")]
    pub extra: serde_yaml::Mapping,
}

impl Default for MkdocsOptions {
    fn default() -> Self {
        Self {
            use_title: true,
            use_chapters: true,
            use_headings: true,
            default_subsection_title: "…".to_owned(),
            mkdocs_path: "mkdocs".to_owned(),
            extra: serde_yaml::Mapping::new(),
        }
    }
}

/// Resolved project paths with the config directory applied.
#[derive(Debug, Clone, Default)]
pub struct ProjectPaths {
    /// Markdown source directory.
    pub src_dir: PathBuf,
    /// Scratch directory the preprocessor stages into.
    pub working_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`mkdocs.mkdocs_path`").
        field: String,
        /// Error message (e.g., "${`MKDOCS_BIN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mkstage.yml` in the current directory
    /// and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(src_dir) = &settings.src_dir {
            self.paths.src_dir.clone_from(src_dir);
        }
        if let Some(working_dir) = &settings.working_dir {
            self.paths.working_dir.clone_from(working_dir);
        }
        if let Some(mkdocs_path) = &settings.mkdocs_path {
            self.mkdocs.mkdocs_path.clone_from(mkdocs_path);
        }
        if let Some(slug) = &settings.slug {
            self.slug = Some(slug.clone());
        }
    }

    /// Output slug: the explicit `slug` option or the slugified title.
    #[must_use]
    pub fn slug(&self) -> String {
        self.slug
            .clone()
            .unwrap_or_else(|| slug::slugify(&self.title))
    }

    /// Name of the static site output directory.
    #[must_use]
    pub fn site_dir_name(&self) -> String {
        format!("{}.mkdocs", self.slug())
    }

    /// Name of the staged project source directory.
    #[must_use]
    pub fn project_dir_name(&self) -> String {
        format!("{}.mkdocs.src", self.slug())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            title: "Documentation".to_owned(),
            chapters: serde_yaml::Value::Sequence(Vec::new()),
            slug: None,
            src_dir: None,
            working_dir: None,
            mkdocs: MkdocsOptions::default(),
            paths: ProjectPaths {
                src_dir: base.join("src"),
                working_dir: base.join(".mkstage/work"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid
    /// values. Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.title, "title")?;
        require_non_empty(&self.mkdocs.mkdocs_path, "mkdocs.mkdocs_path")?;
        require_non_empty(
            &self.mkdocs.default_subsection_title,
            "mkdocs.default_subsection_title",
        )?;
        if let Some(slug) = &self.slug {
            require_non_empty(slug, "slug")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.mkdocs.mkdocs_path =
            expand::expand_env(&self.mkdocs.mkdocs_path, "mkdocs.mkdocs_path")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = ProjectPaths {
            src_dir: resolve(self.src_dir.as_deref(), "src"),
            working_dir: resolve(self.working_dir.as_deref(), ".mkstage/work"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.title, "Documentation");
        assert_eq!(config.paths.src_dir, PathBuf::from("/test/src"));
        assert_eq!(config.paths.working_dir, PathBuf::from("/test/.mkstage/work"));
        assert!(config.mkdocs.use_title);
        assert!(config.mkdocs.use_chapters);
        assert!(config.mkdocs.use_headings);
        assert_eq!(config.mkdocs.default_subsection_title, "…");
        assert_eq!(config.mkdocs.mkdocs_path, "mkdocs");
        assert!(config.mkdocs.extra.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Documentation");
        assert_eq!(config.mkdocs.mkdocs_path, "mkdocs");
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
title: My Project
chapters:
  - index.md
  - Usage:
      - usage/install.md
slug: my-project
src_dir: markdown
mkdocs:
  use_headings: false
  default_subsection_title: "Untitled"
  mkdocs_path: /usr/local/bin/mkdocs
  mkdocs.yml:
    theme: material
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Project");
        assert!(config.chapters.is_sequence());
        assert!(config.mkdocs.use_title);
        assert!(!config.mkdocs.use_headings);
        assert_eq!(config.mkdocs.default_subsection_title, "Untitled");
        assert_eq!(config.mkdocs.mkdocs_path, "/usr/local/bin/mkdocs");
        assert_eq!(
            config.mkdocs.extra.get("theme"),
            Some(&serde_yaml::Value::from("material"))
        );
    }

    #[test]
    fn test_slug_derived_from_title() {
        let yaml = "title: My Great Project";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.slug(), "my-great-project");
        assert_eq!(config.site_dir_name(), "my-great-project.mkdocs");
        assert_eq!(config.project_dir_name(), "my-great-project.mkdocs.src");
    }

    #[test]
    fn test_explicit_slug_wins() {
        let yaml = "title: My Great Project\nslug: docs";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.slug(), "docs");
        assert_eq!(config.site_dir_name(), "docs.mkdocs");
    }

    #[test]
    fn test_resolve_paths() {
        let yaml = "src_dir: markdown\nworking_dir: tmp/work";
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.paths.src_dir, PathBuf::from("/project/markdown"));
        assert_eq!(config.paths.working_dir, PathBuf::from("/project/tmp/work"));
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = serde_yaml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.paths.src_dir, PathBuf::from("/project/src"));
        assert_eq!(
            config.paths.working_dir,
            PathBuf::from("/project/.mkstage/work")
        );
    }

    #[test]
    fn test_apply_cli_settings_src_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            src_dir: Some(PathBuf::from("/custom/markdown")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.paths.src_dir, PathBuf::from("/custom/markdown"));
        assert_eq!(
            config.paths.working_dir,
            PathBuf::from("/test/.mkstage/work")
        ); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_mkdocs_path_and_slug() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            mkdocs_path: Some("pipx run mkdocs".to_owned()),
            slug: Some("manual".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.mkdocs.mkdocs_path, "pipx run mkdocs");
        assert_eq!(config.slug(), "manual");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.title, config_before.title);
        assert_eq!(config.paths.src_dir, config_before.paths.src_dir);
        assert_eq!(config.mkdocs.mkdocs_path, config_before.mkdocs.mkdocs_path);
    }

    #[test]
    fn test_expand_env_vars_mkdocs_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_MKDOCS_BIN", "/opt/mkdocs/bin/mkdocs");
        }

        let yaml = "mkdocs:\n  mkdocs_path: \"${TEST_MKDOCS_BIN}\"";
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.mkdocs.mkdocs_path, "/opt/mkdocs/bin/mkdocs");

        unsafe {
            std::env::remove_var("TEST_MKDOCS_BIN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_MKSTAGE_TEST");
        }

        let yaml = "mkdocs:\n  mkdocs_path: \"${MISSING_VAR_MKSTAGE_TEST}\"";
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        let result = config.expand_env_vars();

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_MKSTAGE_TEST"));
        assert!(err.to_string().contains("mkdocs.mkdocs_path"));
    }

    #[test]
    fn test_expand_env_vars_literal_unchanged() {
        let yaml = "mkdocs:\n  mkdocs_path: mkdocs";
        let mut config: Config = serde_yaml::from_str(yaml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.mkdocs.mkdocs_path, "mkdocs");
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error
    /// message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_title_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.title = String::new();
        assert_validation_error(&config, &["title", "empty"]);
    }

    #[test]
    fn test_validate_mkdocs_path_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.mkdocs.mkdocs_path = String::new();
        assert_validation_error(&config, &["mkdocs.mkdocs_path", "empty"]);
    }

    #[test]
    fn test_validate_default_subsection_title_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.mkdocs.default_subsection_title = String::new();
        assert_validation_error(&config, &["default_subsection_title", "empty"]);
    }

    #[test]
    fn test_validate_explicit_empty_slug() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.slug = Some(String::new());
        assert_validation_error(&config, &["slug", "empty"]);
    }
}
