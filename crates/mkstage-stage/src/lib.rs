//! Working-tree staging for MkDocs builds.
//!
//! MkDocs requires all content under a single `docs/` directory and
//! cannot serve images from outside it. This crate rewrites a Markdown
//! working tree into that layout in two ordered steps:
//!
//! 1. [`ImageCollector`] copies out-of-tree images into the tree and
//!    normalizes every local image reference.
//! 2. [`relocate_tree`] moves the whole tree into `<project>/docs/`.
//!
//! The collector is idempotent per file; relocation is destructive and
//! runs once per working tree.

mod collector;
mod fsutil;
mod relocator;

pub use collector::ImageCollector;
pub use fsutil::copy_tree;
pub use relocator::relocate_tree;

use std::path::PathBuf;

/// Staging error.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A referenced image could not be copied into the staging
    /// directory.
    #[error("Failed to copy image {}: {source}", .path.display())]
    CopyImage {
        /// Resolved path of the referenced image.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
