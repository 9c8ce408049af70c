//! Site configuration assembly.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use mkstage_config::Config;
use mkstage_nav::{HeadingResolver, NavNode};

use crate::MakeError;

/// Reserved key for the site title.
const SITE_NAME_KEY: &str = "site_name";
/// Reserved key for the navigation tree.
const NAV_KEY: &str = "nav";

/// Assembles the `mkdocs.yml` mapping from pass-through options and
/// project metadata.
///
/// Pass-through keys win over generated ones: the title and chapters
/// only fill `site_name`/`nav` when those keys are absent.
pub struct SiteConfigRenderer<'a> {
    config: &'a Config,
    docs_dir: &'a Path,
}

impl<'a> SiteConfigRenderer<'a> {
    /// Create a renderer reading pages from the staged docs directory.
    #[must_use]
    pub fn new(config: &'a Config, docs_dir: &'a Path) -> Self {
        Self { config, docs_dir }
    }

    /// Produce the final site configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`MakeError::Nav`] when the navigation value is
    /// malformed or a referenced page is missing.
    pub fn render(&self) -> Result<Mapping, MakeError> {
        let options = &self.config.mkdocs;
        let mut site_config = options.extra.clone();

        if options.use_title && !site_config.contains_key(SITE_NAME_KEY) {
            site_config.insert(
                Value::from(SITE_NAME_KEY),
                Value::String(self.config.title.clone()),
            );
        }

        if options.use_chapters && !site_config.contains_key(NAV_KEY) {
            site_config.insert(Value::from(NAV_KEY), self.config.chapters.clone());
        }

        if let Some(nav) = site_config.get(NAV_KEY).cloned()
            && !nav.is_null()
        {
            let tree = NavNode::from_value(&nav, &options.default_subsection_title)?;
            let tree = if options.use_headings {
                HeadingResolver::new(self.docs_dir).resolve(tree)?
            } else {
                tree
            };
            site_config.insert(Value::from(NAV_KEY), tree.to_value());
        }

        Ok(site_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn docs_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn render(config: &Config, docs: &TempDir) -> Mapping {
        SiteConfigRenderer::new(config, docs.path()).render().unwrap()
    }

    #[test]
    fn test_title_inserted_when_absent() {
        let config = config("title: My Docs\nmkdocs:\n  use_headings: false");
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert_eq!(
            site_config.get(SITE_NAME_KEY),
            Some(&Value::from("My Docs"))
        );
    }

    #[test]
    fn test_explicit_site_name_wins() {
        let config = config(
            "title: My Docs\nmkdocs:\n  use_headings: false\n  mkdocs.yml:\n    site_name: Override",
        );
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert_eq!(
            site_config.get(SITE_NAME_KEY),
            Some(&Value::from("Override"))
        );
    }

    #[test]
    fn test_use_title_disabled_leaves_site_name_out() {
        let config = config("title: My Docs\nmkdocs:\n  use_title: false\n  use_headings: false");
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert!(!site_config.contains_key(SITE_NAME_KEY));
    }

    #[test]
    fn test_chapters_become_nav() {
        let config = config(
            "title: T\nchapters:\n  - index.md\nmkdocs:\n  use_headings: false",
        );
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert_eq!(
            site_config.get(NAV_KEY),
            Some(&serde_yaml::from_str("- index.md").unwrap())
        );
    }

    #[test]
    fn test_use_chapters_disabled_leaves_nav_out() {
        let config = config(
            "title: T\nchapters:\n  - index.md\nmkdocs:\n  use_chapters: false\n  use_headings: false",
        );
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert!(!site_config.contains_key(NAV_KEY));
    }

    #[test]
    fn test_pass_through_keys_preserved() {
        let config = config(
            "title: T\nmkdocs:\n  use_headings: false\n  mkdocs.yml:\n    theme: material\n    strict: true",
        );
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert_eq!(site_config.get("theme"), Some(&Value::from("material")));
        assert_eq!(site_config.get("strict"), Some(&Value::from(true)));
    }

    #[test]
    fn test_headings_resolved_in_nav() {
        let config = config("title: T\nchapters:\n  - guide.md");
        let docs = docs_with(&[("guide.md", "## User Guide {#guide}\n")]);

        let site_config = render(&config, &docs);

        let expected: Value = serde_yaml::from_str("- User Guide: guide.md").unwrap();
        assert_eq!(site_config.get(NAV_KEY), Some(&expected));
    }

    #[test]
    fn test_headings_resolved_in_pass_through_nav() {
        let config = config(
            "title: T\nmkdocs:\n  mkdocs.yml:\n    nav:\n      - guide.md",
        );
        let docs = docs_with(&[("guide.md", "# Guide\n")]);

        let site_config = render(&config, &docs);

        let expected: Value = serde_yaml::from_str("- Guide: guide.md").unwrap();
        assert_eq!(site_config.get(NAV_KEY), Some(&expected));
    }

    #[test]
    fn test_empty_section_title_replaced_even_without_headings() {
        let config = config(
            "title: T\nchapters:\n  - \"\": guide.md\nmkdocs:\n  use_headings: false",
        );
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        let expected: Value = serde_yaml::from_str("- \"…\": guide.md").unwrap();
        assert_eq!(site_config.get(NAV_KEY), Some(&expected));
    }

    #[test]
    fn test_missing_page_surfaces_nav_error() {
        let config = config("title: T\nchapters:\n  - missing.md");
        let docs = docs_with(&[]);

        let err = SiteConfigRenderer::new(&config, docs.path())
            .render()
            .unwrap_err();

        assert!(matches!(
            err,
            MakeError::Nav(mkstage_nav::NavError::PageNotFound(_))
        ));
    }

    #[test]
    fn test_null_nav_passes_through() {
        let config = config("title: T\nmkdocs:\n  mkdocs.yml:\n    nav: ~");
        let docs = docs_with(&[]);

        let site_config = render(&config, &docs);

        assert_eq!(site_config.get(NAV_KEY), Some(&Value::Null));
    }
}
