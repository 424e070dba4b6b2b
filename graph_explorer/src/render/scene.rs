//! Scene - retained drawable elements for the visible subgraph.

use domain_catalog::{NodeId, Rgb, EDGE_COLOR, EDGE_HIGHLIGHT_COLOR, SELECTION_STROKE};
use emath::Pos2;

use super::Viewport;
use crate::detail::Highlight;
use crate::filter::VisibleSubgraph;
use crate::layout::ForceSimulation;

/// Display toggles that do not change the subgraph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub show_labels: bool,

    /// Opacity of elements outside the highlighted neighborhood
    pub dim_opacity: f32,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_labels: true,
            dim_opacity: 0.15,
        }
    }
}

/// A node circle with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub label: String,
    pub kind: String,
    pub position: Pos2,
    pub radius: f32,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub opacity: f32,
    pub selected: bool,
}

/// An edge line between two node centers.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: Option<String>,
    pub from: Pos2,
    pub to: Pos2,
    pub color: Rgb,
    pub opacity: f32,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub viewport: Viewport,
    pub options: ViewOptions,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    /// Build every element from scratch.
    pub fn build(
        visible: &VisibleSubgraph,
        sim: &ForceSimulation,
        highlight: &Highlight,
        viewport: Viewport,
        options: ViewOptions,
        size: (f32, f32),
    ) -> Self {
        let nodes = visible
            .nodes
            .iter()
            .map(|node| {
                let style = node.kind.style();
                SceneNode {
                    id: node.id.clone(),
                    label: node.label().to_string(),
                    kind: node.kind.as_str().to_string(),
                    position: sim.position_of(&node.id).unwrap_or(sim.center),
                    radius: style.radius,
                    fill: style.fill,
                    stroke: style.stroke,
                    opacity: 1.0,
                    selected: false,
                }
            })
            .collect();

        let edges = visible
            .edges
            .iter()
            .map(|edge| SceneEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                relation: edge.relation.clone(),
                from: sim.position_of(&edge.source).unwrap_or(sim.center),
                to: sim.position_of(&edge.target).unwrap_or(sim.center),
                color: EDGE_COLOR,
                opacity: 1.0,
            })
            .collect();

        let mut scene = Self {
            width: size.0,
            height: size.1,
            viewport,
            options,
            nodes,
            edges,
        };
        scene.apply_highlight(highlight);
        scene
    }

    /// Copy current simulation positions onto existing elements.
    pub fn sync_positions(&mut self, sim: &ForceSimulation) {
        for node in &mut self.nodes {
            if let Some(pos) = sim.position_of(&node.id) {
                node.position = pos;
            }
        }
        for edge in &mut self.edges {
            if let Some(pos) = sim.position_of(&edge.source) {
                edge.from = pos;
            }
            if let Some(pos) = sim.position_of(&edge.target) {
                edge.to = pos;
            }
        }
    }

    /// Recolor and dim elements for a highlight.
    pub fn apply_highlight(&mut self, highlight: &Highlight) {
        let dim = self.options.dim_opacity;
        let selected = highlight.selected();

        for node in &mut self.nodes {
            node.opacity = highlight.node_opacity(&node.id, dim);
            node.selected = selected == Some(&node.id);
        }
        for edge in &mut self.edges {
            let emphasized = highlight.is_link_emphasized(&edge.source, &edge.target);
            edge.opacity = if emphasized { 1.0 } else { dim };
            edge.color = if emphasized && selected.is_some() {
                EDGE_HIGHLIGHT_COLOR
            } else {
                EDGE_COLOR
            };
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Stroke for a node, accounting for selection.
    pub fn stroke_for(node: &SceneNode) -> Rgb {
        if node.selected {
            SELECTION_STROKE
        } else {
            node.stroke
        }
    }
}
