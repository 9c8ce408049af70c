//! MkDocs backend: renders `mkdocs.yml` and drives the external
//! `mkdocs` executable.
//!
//! [`MkdocsBackend::make`] accepts a target name and produces a
//! [`BuildArtifact`]:
//!
//! - `mkdocs`: a copy of the staged project source
//! - `site`: a static site built by `mkdocs build`
//! - `ghpages`: a GitHub Pages deployment via `mkdocs gh-deploy`
//!
//! Every failure inside `make` is flattened into a single
//! [`BuildError`], with the typed [`MakeError`] cause preserved for
//! inspection.

mod backend;
mod error;
mod renderer;
mod tool;

pub use backend::{BuildArtifact, MkdocsBackend};
pub use error::{BuildError, MakeError};
pub use renderer::SiteConfigRenderer;
