//! Filter state - the search text and selected facet values.

use domain_catalog::{Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The groups filter chips are organized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Facet {
    Type,
    Category,
    Tag,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Type, Facet::Category, Facet::Tag];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Type => "type",
            Facet::Category => "category",
            Facet::Tag => "tag",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Active filter criteria.
///
/// The default value is the identity filter: every node passes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text search; empty matches all.
    pub search: String,
    pub types: BTreeSet<NodeKind>,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl FilterState {
    /// Create the identity filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_type(mut self, kind: impl Into<NodeKind>) -> Self {
        self.types.insert(kind.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Flip a chip: select the value if absent, deselect it if present.
    ///
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        match facet {
            Facet::Type => toggle_in(&mut self.types, NodeKind::from(value)),
            Facet::Category => toggle_in(&mut self.categories, value.to_string()),
            Facet::Tag => toggle_in(&mut self.tags, value.to_string()),
        }
    }

    /// Check if a chip is currently selected.
    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        match facet {
            Facet::Type => self.types.contains(&NodeKind::from(value)),
            Facet::Category => self.categories.contains(value),
            Facet::Tag => self.tags.contains(value),
        }
    }

    /// Reset to the identity filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no criterion is active.
    pub fn is_identity(&self) -> bool {
        self.normalized_search().is_none()
            && self.types.is_empty()
            && self.categories.is_empty()
            && self.tags.is_empty()
    }

    /// Number of active criteria (search counts as one).
    pub fn active_count(&self) -> usize {
        usize::from(self.normalized_search().is_some())
            + self.types.len()
            + self.categories.len()
            + self.tags.len()
    }

    /// Trimmed, lowercased search text, or `None` when it matches everything.
    pub fn normalized_search(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Check whether a node passes every active criterion.
    pub fn matches(&self, node: &Node) -> bool {
        self.matches_with(node, self.normalized_search().as_deref())
    }

    /// Like [`FilterState::matches`], with the search needle already normalized.
    pub(crate) fn matches_with(&self, node: &Node, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !node.search_text().contains(needle) {
                return false;
            }
        }

        (self.types.is_empty() || self.types.contains(&node.kind))
            && (self.categories.is_empty() || self.categories.contains(&node.category))
            && (self.tags.is_empty() || node.tags.iter().any(|t| self.tags.contains(t)))
    }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kafka() -> Node {
        Node::new("1", "Kafka")
            .with_kind(NodeKind::Tool)
            .with_category("streaming")
            .with_description("Distributed commit log")
            .with_tags(["streaming", "messaging"])
    }

    #[test]
    fn test_identity_matches_everything() {
        let filter = FilterState::new();
        assert!(filter.is_identity());
        assert!(filter.matches(&kafka()));
        assert!(filter.matches(&Node::new("empty", "")));
    }

    #[test]
    fn test_whitespace_search_is_identity() {
        let filter = FilterState::new().with_search("   ");
        assert!(filter.is_identity());
        assert_eq!(filter.active_count(), 0);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert!(FilterState::new().with_search("KAFKA").matches(&kafka()));
        assert!(FilterState::new().with_search("commit LOG").matches(&kafka()));
        assert!(FilterState::new().with_search("messaging").matches(&kafka()));
        assert!(!FilterState::new().with_search("spark").matches(&kafka()));
    }

    #[test]
    fn test_facets_and_across_or_within() {
        let node = kafka();

        let either_type = FilterState::new().with_type("tool").with_type("concept");
        assert!(either_type.matches(&node));

        let tool_in_batch = FilterState::new().with_type("tool").with_category("batch");
        assert!(!tool_in_batch.matches(&node));

        let any_tag = FilterState::new().with_tag("messaging").with_tag("batch");
        assert!(any_tag.matches(&node));

        let no_tag = FilterState::new().with_tag("batch");
        assert!(!no_tag.matches(&node));
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut filter = FilterState::new();

        assert!(filter.toggle(Facet::Tag, "streaming"));
        assert!(filter.is_selected(Facet::Tag, "streaming"));
        assert!(filter.toggle(Facet::Type, "Tool"));
        assert!(filter.is_selected(Facet::Type, "tool"));
        filter.set_search("kafka");
        assert_eq!(filter.active_count(), 3);

        assert!(!filter.toggle(Facet::Tag, "streaming"));
        assert!(!filter.is_selected(Facet::Tag, "streaming"));

        filter.clear();
        assert!(filter.is_identity());
        assert_eq!(filter, FilterState::default());
    }
}
