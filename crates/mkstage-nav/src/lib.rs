//! Navigation tree model and heading detection.
//!
//! MkDocs navigation is a recursively-typed YAML value: a page path, a
//! sequence of entries, or a mapping from section titles to nested
//! entries. [`NavNode`] models that shape as a sum type so the rest of
//! the pipeline can walk it structurally instead of inspecting raw YAML.
//! [`HeadingResolver`] titles bare page entries from the first Markdown
//! heading of the referenced file.

mod headings;
mod tree;

pub use headings::HeadingResolver;
pub use tree::NavNode;

use std::path::PathBuf;

/// Navigation tree error.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// I/O error while reading a referenced page.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value that cannot appear in a navigation tree.
    #[error("Navigation entry is not a page, sequence, or section: {0}")]
    InvalidNode(String),

    /// A `.md` entry with no file under the staged docs directory.
    #[error("Page not found in staged docs directory: {}", .0.display())]
    PageNotFound(PathBuf),
}
