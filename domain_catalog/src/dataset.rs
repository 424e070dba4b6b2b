//! Dataset - the immutable node and edge collections plus lookup indexes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

use crate::records::{Edge, Node, NodeId};

/// One selectable facet value and how many nodes carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// The loaded node and edge collections.
///
/// Built once after loading; provides lookups by id, neighbor sets, and the
/// distinct facet values used to build filter chips.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    nodes: Vec<Node>,
    edges: Vec<Edge>,

    /// Index: NodeId -> position in `nodes`.
    index: HashMap<NodeId, usize>,

    /// Neighbors in either edge direction.
    adjacency: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl Dataset {
    /// Index the given collections.
    ///
    /// Duplicate node ids keep the first occurrence. Edges whose endpoints
    /// are unknown are kept but can never become visible.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                warn!(id = %node.id, "duplicate node id; keeping first occurrence");
                continue;
            }
            index.insert(node.id.clone(), unique.len());
            unique.push(node);
        }

        let mut adjacency: HashMap<NodeId, BTreeSet<NodeId>> = HashMap::new();
        let mut dangling = 0usize;

        for edge in &edges {
            if !index.contains_key(&edge.source) || !index.contains_key(&edge.target) {
                dangling += 1;
                continue;
            }
            adjacency
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
            adjacency
                .entry(edge.target.clone())
                .or_default()
                .insert(edge.source.clone());
        }

        if dangling > 0 {
            warn!(dangling, "edges reference unknown node ids");
        }

        Self {
            nodes: unique,
            edges,
            index,
            adjacency,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get node by id.
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Direct neighbors of a node, regardless of edge direction.
    pub fn neighbors(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.adjacency.get(id).into_iter().flatten()
    }

    /// Number of distinct neighbors.
    pub fn degree(&self, id: &NodeId) -> usize {
        self.adjacency.get(id).map_or(0, BTreeSet::len)
    }

    /// Distinct node types with counts, sorted by value.
    pub fn type_facets(&self) -> Vec<FacetCount> {
        count_values(self.nodes.iter().map(|n| n.kind.as_str()))
    }

    /// Distinct categories with counts, sorted by value.
    pub fn category_facets(&self) -> Vec<FacetCount> {
        count_values(self.nodes.iter().map(|n| n.category.as_str()))
    }

    /// Distinct tags with counts, sorted by value.
    pub fn tag_facets(&self) -> Vec<FacetCount> {
        count_values(
            self.nodes
                .iter()
                .flat_map(|n| n.tags.iter().map(String::as_str)),
        )
    }
}

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.filter(|v| !v.trim().is_empty()) {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::NodeKind;

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                Node::new("kafka", "Kafka")
                    .with_kind(NodeKind::Tool)
                    .with_category("streaming")
                    .with_tags(["streaming", "messaging"]),
                Node::new("spark", "Spark")
                    .with_kind(NodeKind::Tool)
                    .with_category("batch")
                    .with_tag("batch"),
                Node::new("cdc", "Change Data Capture")
                    .with_kind(NodeKind::Pattern)
                    .with_category("streaming")
                    .with_tag("streaming"),
            ],
            vec![Edge::new("kafka", "cdc"), Edge::new("spark", "kafka")],
        )
    }

    #[test]
    fn test_lookup_and_neighbors() {
        let data = sample();
        let kafka = NodeId::new("kafka");

        assert_eq!(data.get(&kafka).map(|n| n.name.as_str()), Some("Kafka"));
        let neighbors: Vec<_> = data.neighbors(&kafka).map(NodeId::as_str).collect();
        assert_eq!(neighbors, vec!["cdc", "spark"]);
        assert_eq!(data.degree(&kafka), 2);
        assert_eq!(data.neighbors(&NodeId::new("missing")).count(), 0);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let data = Dataset::new(
            vec![Node::new("a", "First"), Node::new("a", "Second")],
            vec![],
        );
        assert_eq!(data.node_count(), 1);
        assert_eq!(data.get(&NodeId::new("a")).unwrap().name, "First");
    }

    #[test]
    fn test_dangling_edges_are_kept_but_not_indexed() {
        let data = Dataset::new(vec![Node::new("a", "A")], vec![Edge::new("a", "ghost")]);
        assert_eq!(data.edge_count(), 1);
        assert_eq!(data.degree(&NodeId::new("a")), 0);
    }

    #[test]
    fn test_facets() {
        let data = sample();

        let types = data.type_facets();
        assert_eq!(
            types,
            vec![
                FacetCount {
                    value: "pattern".into(),
                    count: 1,
                },
                FacetCount {
                    value: "tool".into(),
                    count: 2,
                },
            ]
        );

        let tags = data.tag_facets();
        let streaming = tags.iter().find(|f| f.value == "streaming").unwrap();
        assert_eq!(streaming.count, 2);
        assert_eq!(data.category_facets().len(), 2);
    }
}
