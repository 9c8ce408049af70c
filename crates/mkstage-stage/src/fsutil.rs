//! Small filesystem helpers shared by the staging pipeline and backend.

use std::fs;
use std::io;
use std::path::Path;

/// Recursively copy a directory tree.
///
/// The destination is created if absent; existing files are
/// overwritten.
///
/// # Errors
///
/// Returns the first I/O error encountered.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
