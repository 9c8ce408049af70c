//! Out-of-tree image collection and reference rewriting.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::StageError;

/// Matches Markdown image references. Remote references are filtered
/// out after matching (the regex crate has no lookahead for a `://`
/// exclusion inside the pattern).
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(?P<caption>.*?)\]\((?P<path>[^)]+)\)").unwrap());

/// Rewrites image references in a Markdown working tree.
///
/// References resolving outside the tree have their targets copied into
/// a staging directory created on first use; every local reference is
/// re-expressed relative to its containing file with `/` separators.
pub struct ImageCollector {
    root: PathBuf,
    staging_dir: PathBuf,
}

impl ImageCollector {
    /// Create a collector for the given working tree.
    ///
    /// The staging directory name carries a unique token, so collected
    /// files from an earlier tree never collide with this run.
    ///
    /// # Errors
    ///
    /// Returns an error when the working tree cannot be canonicalized.
    pub fn new(working_dir: &Path) -> Result<Self, StageError> {
        let root = working_dir.canonicalize()?;
        let staging_dir = root.join(format!("_img_{}", Uuid::new_v4()));
        Ok(Self { root, staging_dir })
    }

    /// Rewrite image references in every Markdown file under the tree.
    ///
    /// Files without any local image reference are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when a file cannot be read or written, or when
    /// an out-of-tree image cannot be copied in.
    pub fn apply(&self) -> Result<(), StageError> {
        let mut md_files = Vec::new();
        collect_markdown_files(&self.root, &mut md_files)?;

        for md_path in md_files {
            tracing::debug!("Looking for images in {}", md_path.display());

            let content = fs::read_to_string(&md_path)?;
            let rewritten = self.collect_images(&content, &md_path)?;
            if rewritten != content {
                fs::write(&md_path, rewritten)?;
            }
        }
        Ok(())
    }

    /// Single substitution pass over one file's content.
    fn collect_images(&self, content: &str, md_path: &Path) -> Result<String, StageError> {
        let md_dir = md_path.parent().unwrap_or(&self.root);
        let mut output = String::with_capacity(content.len());
        let mut last = 0;

        for caps in IMAGE_PATTERN.captures_iter(content) {
            let raw_path = &caps["path"];
            if raw_path.contains("://") {
                continue;
            }

            let reference = caps.get(0).unwrap();
            let rewritten = self.rewrite_reference(&caps["caption"], raw_path, md_dir)?;
            output.push_str(&content[last..reference.start()]);
            output.push_str(&rewritten);
            last = reference.end();
        }

        output.push_str(&content[last..]);
        Ok(output)
    }

    /// Rewrite one reference, copying the target in when it lies
    /// outside the tree.
    fn rewrite_reference(
        &self,
        caption: &str,
        raw_path: &str,
        md_dir: &Path,
    ) -> Result<String, StageError> {
        let resolved = normalize(&md_dir.join(raw_path));
        tracing::debug!(
            "Detected image: caption=\"{caption}\", path={}",
            resolved.display()
        );

        let target = if resolved.starts_with(&self.root) {
            resolved
        } else {
            self.stage_image(&resolved)?
        };

        let relative = pathdiff::diff_paths(&target, md_dir).unwrap_or(target);
        Ok(format!("![{caption}]({})", posix_path(&relative)))
    }

    /// Copy an out-of-tree image into the staging directory under a
    /// collision-free name.
    fn stage_image(&self, source: &Path) -> Result<PathBuf, StageError> {
        fs::create_dir_all(&self.staging_dir)?;

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let mut name = format!("{stem}_{}", Uuid::new_v4());
        if let Some(ext) = source.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        let staged = self.staging_dir.join(name);

        fs::copy(source, &staged).map_err(|e| StageError::CopyImage {
            path: source.to_path_buf(),
            source: e,
        })?;
        tracing::debug!("Image copied to {}", staged.display());
        Ok(staged)
    }
}

/// Recursively collect `.md` files, skipping hidden entries.
fn collect_markdown_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), StageError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_markdown_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    Ok(())
}

/// Lexically fold `.` and `..` components without touching the
/// filesystem, so referenced targets that do not exist still resolve.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Render a path with forward slashes regardless of platform.
fn posix_path(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    parts.join("/")
}
