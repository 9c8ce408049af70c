//! External tool invocation.

use std::path::Path;
use std::process::Command;

use crate::MakeError;

/// Captured run of an external command.
pub(crate) struct ToolRun {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Interleaved stdout/stderr.
    pub output: String,
}

/// Run a command line through the shell with stderr folded into
/// stdout.
///
/// MkDocs logs progress to stderr; merging the streams keeps the
/// captured output in emission order. Blocks until the tool exits.
pub(crate) fn run_tool(command: &str, cwd: &Path) -> Result<ToolRun, MakeError> {
    tracing::debug!("Running `{command}` in {}", cwd.display());

    let output = Command::new("sh")
        .arg("-c")
        .arg(format!("{command} 2>&1"))
        .current_dir(cwd)
        .output()?;

    let combined = String::from_utf8_lossy(&output.stdout).into_owned();
    tracing::debug!("Tool output:\n{combined}");

    Ok(ToolRun {
        success: output.status.success(),
        output: combined,
    })
}

/// Escape a path for interpolation inside double quotes in a shell
/// command.
pub(crate) fn escape_path(path: &Path) -> String {
    let mut escaped = String::new();
    for ch in path.to_string_lossy().chars() {
        if matches!(ch, '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
