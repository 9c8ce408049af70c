//! Sum-type model of the MkDocs navigation value.

use serde_yaml::{Mapping, Value};

use crate::NavError;

/// A node in the navigation tree.
///
/// `Section` keeps insertion order; section titles serialize back to
/// mapping keys in the order they were declared.
#[derive(Debug, Clone, PartialEq)]
pub enum NavNode {
    /// A bare page entry (a file path).
    Page(String),
    /// An ordered list of entries.
    Items(Vec<NavNode>),
    /// Titled sections mapping to nested entries.
    Section(Vec<(String, NavNode)>),
}

impl NavNode {
    /// Convert a YAML value into a navigation node.
    ///
    /// Scalar entries become pages (numbers and booleans are
    /// stringified). Empty or null section titles are replaced with
    /// `default_title`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidNode`] for values that cannot appear
    /// in a navigation tree, such as null entries.
    pub fn from_value(value: &Value, default_title: &str) -> Result<Self, NavError> {
        match value {
            Value::String(s) => Ok(Self::Page(s.clone())),
            Value::Number(n) => Ok(Self::Page(n.to_string())),
            Value::Bool(b) => Ok(Self::Page(b.to_string())),
            Value::Sequence(items) => items
                .iter()
                .map(|item| Self::from_value(item, default_title))
                .collect::<Result<_, _>>()
                .map(Self::Items),
            Value::Mapping(mapping) => {
                let mut sections = Vec::with_capacity(mapping.len());
                for (key, nested) in mapping {
                    let title = section_title(key, default_title);
                    sections.push((title, Self::from_value(nested, default_title)?));
                }
                Ok(Self::Section(sections))
            }
            Value::Null => Err(NavError::InvalidNode("null".to_owned())),
            Value::Tagged(tagged) => Err(NavError::InvalidNode(format!("tag {}", tagged.tag))),
        }
    }

    /// Convert back into a YAML value for serialization.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Page(path) => Value::String(path.clone()),
            Self::Items(items) => Value::Sequence(items.iter().map(Self::to_value).collect()),
            Self::Section(sections) => {
                let mut mapping = Mapping::with_capacity(sections.len());
                for (title, nested) in sections {
                    mapping.insert(Value::String(title.clone()), nested.to_value());
                }
                Value::Mapping(mapping)
            }
        }
    }
}

/// Section titles come from YAML mapping keys; empty or non-textual
/// keys fall back to the default subsection title.
fn section_title(key: &Value, default_title: &str) -> String {
    match key {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => default_title.to_owned(),
    }
}
