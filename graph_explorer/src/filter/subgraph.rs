//! Visible subgraph - the pure recomputation from filters to displayed nodes.

use domain_catalog::{Edge, Node, NodeId};
use std::collections::HashSet;
use tracing::debug;

use super::FilterState;

/// The nodes and edges currently on display.
///
/// Order follows the source collections. Every edge has both endpoints in
/// `nodes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSubgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    ids: HashSet<NodeId>,
}

impl VisibleSubgraph {
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        if !self.contains_node(id) {
            return None;
        }
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }

    /// Visible edges touching `id`.
    pub fn edges_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(id))
    }

    /// Visible neighbors of `id`, regardless of edge direction.
    pub fn neighbors(&self, id: &NodeId) -> HashSet<NodeId> {
        self.edges_of(id)
            .filter_map(|e| e.other_end(id))
            .cloned()
            .collect()
    }

    /// Check that no edge references a hidden node.
    pub fn is_consistent(&self) -> bool {
        self.edges
            .iter()
            .all(|e| self.ids.contains(&e.source) && self.ids.contains(&e.target))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Derive the visible subgraph for a filter over the full collections.
///
/// Pure: the same inputs always give the same output, and the inputs are
/// never modified.
pub fn visible_subgraph(filter: &FilterState, nodes: &[Node], edges: &[Edge]) -> VisibleSubgraph {
    let needle = filter.normalized_search();

    let visible_nodes: Vec<Node> = nodes
        .iter()
        .filter(|node| filter.matches_with(node, needle.as_deref()))
        .cloned()
        .collect();

    let ids: HashSet<NodeId> = visible_nodes.iter().map(|n| n.id.clone()).collect();

    let visible_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
        .cloned()
        .collect();

    debug!(
        nodes = visible_nodes.len(),
        edges = visible_edges.len(),
        active_filters = filter.active_count(),
        "recomputed visible subgraph"
    );

    VisibleSubgraph {
        nodes: visible_nodes,
        edges: visible_edges,
        ids,
    }
}
