//! Edge definitions - directed relationships between nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::NodeId;

/// Keys that may carry the relationship label, first match wins.
const RELATION_KEYS: [&str; 3] = ["relation", "type", "label"];

/// A directed relationship from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEdge")]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,

    /// Relationship label (e.g. "uses", "implements"), when the data has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,

    /// Any further fields are carried along untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RawEdge {
    source: NodeId,
    target: NodeId,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl From<RawEdge> for Edge {
    fn from(raw: RawEdge) -> Self {
        let RawEdge {
            source,
            target,
            mut extra,
        } = raw;

        let key = RELATION_KEYS
            .into_iter()
            .find(|key| matches!(extra.get(*key), Some(Value::String(_))));
        let relation = key.and_then(|key| match extra.remove(key) {
            Some(Value::String(relation)) => Some(relation),
            _ => None,
        });
        extra.retain(|key, value| !(value.is_null() && RELATION_KEYS.contains(&key.as_str())));

        Self {
            source,
            target,
            relation,
            extra,
        }
    }
}

impl Edge {
    /// Create a new edge between two node ids.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Check if either endpoint is the given node.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }

    /// The endpoint opposite `id`, if the edge touches it.
    pub fn other_end(&self, id: &NodeId) -> Option<&NodeId> {
        if &self.source == id {
            Some(&self.target)
        } else if &self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}
