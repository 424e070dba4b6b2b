//! Node definitions - the entities drawn on the map.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::{default_on_mismatch, NodeId};

/// Kind of knowledge-domain entity a node represents.
///
/// Drives styling through the table in [`crate::style`]. Kinds the table
/// does not know are kept verbatim in [`NodeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Tool,
    Concept,
    Pattern,
    Technology,
    Practice,
    Framework,
    Platform,
    Language,
    Other(String),
}

impl NodeKind {
    /// Every kind with a dedicated style, in chip display order.
    pub const KNOWN: [NodeKind; 8] = [
        NodeKind::Tool,
        NodeKind::Concept,
        NodeKind::Pattern,
        NodeKind::Technology,
        NodeKind::Practice,
        NodeKind::Framework,
        NodeKind::Platform,
        NodeKind::Language,
    ];

    /// The lowercase name used in the data files.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Tool => "tool",
            NodeKind::Concept => "concept",
            NodeKind::Pattern => "pattern",
            NodeKind::Technology => "technology",
            NodeKind::Practice => "practice",
            NodeKind::Framework => "framework",
            NodeKind::Platform => "platform",
            NodeKind::Language => "language",
            NodeKind::Other(s) => s,
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Other(String::new())
    }
}

impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "tool" => NodeKind::Tool,
            "concept" => NodeKind::Concept,
            "pattern" => NodeKind::Pattern,
            "technology" => NodeKind::Technology,
            "practice" => NodeKind::Practice,
            "framework" => NodeKind::Framework,
            "platform" => NodeKind::Platform,
            "language" => NodeKind::Language,
            _ => NodeKind::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        NodeKind::from(s.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A knowledge-domain entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(default, deserialize_with = "default_on_mismatch")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "default_on_mismatch")]
    pub kind: NodeKind,

    #[serde(default, deserialize_with = "default_on_mismatch")]
    pub category: String,

    #[serde(default, deserialize_with = "default_on_mismatch")]
    pub description: String,

    /// Unordered set of free-text labels.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: BTreeSet<String>,
}

impl Node {
    /// Create a node with the given id and display name.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::default(),
            category: String::new(),
            description: String::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<NodeKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Check if this node carries a specific tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Lowercased name, description and tags joined by spaces.
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(self.name.len() + self.description.len() + 16);
        text.push_str(&self.name);
        text.push(' ');
        text.push_str(&self.description);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text.to_lowercase()
    }

    /// Label to draw next to the node; falls back to the id for unnamed nodes.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// Tags may be missing, `null`, a lone string, or an array holding
/// non-string junk; keep whatever strings there are.
fn lenient_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::String(tag) if !tag.is_empty() => BTreeSet::from([tag]),
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    })
}
