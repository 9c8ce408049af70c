//! First-heading lookup for bare page entries.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{NavError, NavNode};

/// Matches an ATX heading line; a trailing `{#anchor}` fragment is
/// dropped from the captured title.
static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+(?P<title>.+?)(?:\s+\{#\S+\})?\s*$").unwrap());

/// Context a node is reached from during recursion.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Parent {
    /// The node is an item of a sequence, or the tree root.
    Items,
    /// The node is the value under a section title.
    Section,
}

/// Replaces bare page entries with `first heading → path` sections.
///
/// Only sequence items are candidates: a page directly under a section
/// title already has one. Pages without a Markdown extension are left
/// alone.
pub struct HeadingResolver<'a> {
    docs_dir: &'a Path,
}

impl<'a> HeadingResolver<'a> {
    /// Create a resolver reading pages from the staged docs directory.
    #[must_use]
    pub fn new(docs_dir: &'a Path) -> Self {
        Self { docs_dir }
    }

    /// Resolve headings over a whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::PageNotFound`] when a `.md` entry does not
    /// exist under the docs directory, and [`NavError::Io`] when one
    /// cannot be read.
    pub fn resolve(&self, node: NavNode) -> Result<NavNode, NavError> {
        self.resolve_node(node, Parent::Items)
    }

    fn resolve_node(&self, node: NavNode, parent: Parent) -> Result<NavNode, NavError> {
        match node {
            NavNode::Page(path) if parent == Parent::Items => self.resolve_page(path),
            NavNode::Page(path) => Ok(NavNode::Page(path)),
            NavNode::Items(items) => items
                .into_iter()
                .map(|item| self.resolve_node(item, Parent::Items))
                .collect::<Result<_, _>>()
                .map(NavNode::Items),
            NavNode::Section(sections) => sections
                .into_iter()
                .map(|(title, nested)| Ok((title, self.resolve_node(nested, Parent::Section)?)))
                .collect::<Result<_, _>>()
                .map(NavNode::Section),
        }
    }

    /// Replace a bare page with `heading → path` when its file opens
    /// with a heading line.
    fn resolve_page(&self, path: String) -> Result<NavNode, NavError> {
        if !path.ends_with(".md") {
            return Ok(NavNode::Page(path));
        }

        let file = self.docs_dir.join(&path);
        if !file.is_file() {
            return Err(NavError::PageNotFound(file));
        }

        let content = fs::read_to_string(&file)?;
        match first_heading(&content) {
            Some(heading) => {
                tracing::debug!("Titled {path} from its heading: {heading}");
                Ok(NavNode::Section(vec![(heading, NavNode::Page(path))]))
            }
            None => Ok(NavNode::Page(path)),
        }
    }
}

/// First ATX heading of a Markdown document, anchor stripped.
fn first_heading(content: &str) -> Option<String> {
    HEADING_PATTERN
        .captures(content)
        .map(|caps| caps["title"].trim().to_owned())
}
