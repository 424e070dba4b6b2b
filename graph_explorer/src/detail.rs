//! Detail panel - attributes of the selected node and its neighborhood highlight.
//!
//! Highlighting only changes opacity; the visible subgraph is left alone.

use domain_catalog::{Edge, Node, NodeId, NodeKind};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::filter::VisibleSubgraph;

// =============================================================================
// HIGHLIGHT
// =============================================================================

/// Which part of the graph is drawn at full opacity.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Highlight {
    /// Nothing selected; everything at full opacity.
    #[default]
    None,

    /// The selected node and its direct neighbors stay bright.
    Focus {
        selected: NodeId,
        neighbors: HashSet<NodeId>,
    },
}

impl Highlight {
    /// Build the highlight for a selection within the visible subgraph.
    pub fn for_selection(selected: &NodeId, visible: &VisibleSubgraph) -> Self {
        Highlight::Focus {
            selected: selected.clone(),
            neighbors: visible.neighbors(selected),
        }
    }

    pub fn selected(&self) -> Option<&NodeId> {
        match self {
            Highlight::None => None,
            Highlight::Focus { selected, .. } => Some(selected),
        }
    }

    /// Check if a node is drawn at full opacity.
    pub fn is_emphasized(&self, id: &NodeId) -> bool {
        match self {
            Highlight::None => true,
            Highlight::Focus {
                selected,
                neighbors,
            } => selected == id || neighbors.contains(id),
        }
    }

    /// Check if an edge is drawn at full opacity.
    ///
    /// Under focus only edges touching the selected node qualify.
    pub fn is_edge_emphasized(&self, edge: &Edge) -> bool {
        self.is_link_emphasized(&edge.source, &edge.target)
    }

    /// Same as [`Highlight::is_edge_emphasized`], by endpoint ids.
    pub fn is_link_emphasized(&self, source: &NodeId, target: &NodeId) -> bool {
        match self {
            Highlight::None => true,
            Highlight::Focus { selected, .. } => selected == source || selected == target,
        }
    }

    pub fn node_opacity(&self, id: &NodeId, dim: f32) -> f32 {
        if self.is_emphasized(id) {
            1.0
        } else {
            dim
        }
    }

    pub fn edge_opacity(&self, edge: &Edge, dim: f32) -> f32 {
        if self.is_edge_emphasized(edge) {
            1.0
        } else {
            dim
        }
    }
}

// =============================================================================
// NODE DETAILS
// =============================================================================

/// Direction of a relationship relative to the selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// A neighbor listed in the detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborEntry {
    pub id: NodeId,
    pub name: String,
    pub relation: Option<String>,
    pub direction: Direction,
}

/// Attribute text shown for the selected node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub category: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub neighbors: Vec<NeighborEntry>,
}

impl NodeDetails {
    /// Build details for a visible node; `None` if it is not visible.
    pub fn build(id: &NodeId, visible: &VisibleSubgraph) -> Option<Self> {
        let node = visible.node(id)?;

        let neighbors = visible
            .edges_of(id)
            .filter_map(|edge| {
                let (other, direction) = if &edge.source == id {
                    (&edge.target, Direction::Outgoing)
                } else {
                    (&edge.source, Direction::Incoming)
                };
                let other_node = visible.node(other)?;
                Some(NeighborEntry {
                    id: other.clone(),
                    name: other_node.label().to_string(),
                    relation: edge.relation.clone(),
                    direction,
                })
            })
            .collect();

        Some(Self::from_node(node, neighbors))
    }

    fn from_node(node: &Node, neighbors: Vec<NeighborEntry>) -> Self {
        Self {
            id: node.id.clone(),
            name: node.label().to_string(),
            kind: node.kind.clone(),
            category: node.category.clone(),
            description: node.description.clone(),
            tags: node.tags.clone(),
            neighbors,
        }
    }
}

impl fmt::Display for NodeDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Type: {}", self.kind)?;
        if !self.category.is_empty() {
            writeln!(f, "Category: {}", self.category)?;
        }
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            writeln!(f, "Tags: {}", tags.join(", "))?;
        }
        if !self.neighbors.is_empty() {
            writeln!(f, "Connections ({}):", self.neighbors.len())?;
            for neighbor in &self.neighbors {
                let arrow = match neighbor.direction {
                    Direction::Outgoing => "->",
                    Direction::Incoming => "<-",
                };
                match &neighbor.relation {
                    Some(relation) => writeln!(f, "  {} {} ({})", arrow, neighbor.name, relation)?,
                    None => writeln!(f, "  {} {}", arrow, neighbor.name)?,
                }
            }
        }
        Ok(())
    }
}
