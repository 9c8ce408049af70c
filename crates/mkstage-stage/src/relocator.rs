//! Working-tree relocation into the MkDocs project layout.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::StageError;

/// Move every entry of the working tree into `<project>/docs/` and
/// rename the result to `project_dir_name`.
///
/// The move goes through a uniquely-named intermediate directory: the
/// final project directory sits inside the working tree itself, so
/// moving entries straight into it would try to move the directory into
/// its own subtree.
///
/// Destructive and non-idempotent; a failed move leaves the tree in a
/// mixed state.
///
/// # Errors
///
/// Returns an error when any entry cannot be moved.
pub fn relocate_tree(working_dir: &Path, project_dir_name: &str) -> Result<PathBuf, StageError> {
    let tmp_dir = working_dir.join(Uuid::new_v4().to_string());
    let docs_dir = tmp_dir.join("docs");
    fs::create_dir_all(&docs_dir)?;

    for entry in fs::read_dir(working_dir)? {
        let entry = entry?;
        if entry.path() == tmp_dir {
            continue;
        }
        fs::rename(entry.path(), docs_dir.join(entry.file_name()))?;
    }

    let project_dir = working_dir.join(project_dir_name);
    fs::rename(&tmp_dir, &project_dir)?;
    tracing::debug!(
        "Moved {} to {}",
        tmp_dir.display(),
        project_dir.display()
    );
    Ok(project_dir)
}
