//! Force-directed layout simulation
//!
//! A d3-style simulation with four forces:
//! - Link attraction along edges (spring toward a rest length)
//! - Many-body repulsion between all node pairs (inverse square)
//! - Centering (keeps the layout centroid on the viewport center)
//! - Collision (separates overlapping circles)
//!
//! Forces are scaled by `alpha`, which cools toward `alpha_target` each tick.
//! The layout is settled once `alpha` drops below `alpha_min`. Dragging a
//! node pins it and reheats the simulation; releasing lets it cool again.
//!
//! # Usage
//! ```ignore
//! let mut sim = ForceSimulation::build(&visible, config, Pos2::new(480.0, 320.0));
//! while sim.tick() {}
//! for node in sim.nodes() {
//!     draw_circle(node.position, node.radius);
//! }
//! ```

use domain_catalog::NodeId;
use emath::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;
use tracing::debug;

use crate::filter::VisibleSubgraph;

// =============================================================================
// SIMULATION CONFIG
// =============================================================================

/// Configuration for the force simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Rest length of edge springs
    pub link_distance: f32,

    /// Multiplier on the degree-normalized link strength
    pub link_strength: f32,

    /// Many-body strength (negative repels)
    pub charge_strength: f32,

    /// Distance floor for the charge force (prevents explosion)
    pub charge_min_distance: f32,

    /// How strongly the centroid is pulled to the center (0.0 - 1.0)
    pub center_strength: f32,

    /// Extra spacing added to combined radii for collision
    pub collision_padding: f32,

    /// Fraction of the overlap resolved per tick (0.0 - 1.0)
    pub collision_strength: f32,

    /// Starting alpha for a fresh layout
    pub alpha_start: f32,

    /// Alpha below which the layout counts as settled
    pub alpha_min: f32,

    /// Fraction of the gap to `alpha_target` closed each tick
    pub alpha_decay: f32,

    /// Alpha target while a node is being dragged
    pub drag_alpha_target: f32,

    /// Velocity lost each tick (0.0 = no friction, 1.0 = instant stop)
    pub velocity_decay: f32,

    /// Maximum velocity (prevents instability)
    pub max_velocity: f32,

    /// Spacing of the initial phyllotaxis spiral
    pub initial_radius: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            link_distance: 80.0,
            link_strength: 1.0,
            charge_strength: -300.0,
            charge_min_distance: 1.0,
            center_strength: 1.0,
            collision_padding: 4.0,
            collision_strength: 0.7,
            alpha_start: 1.0,
            alpha_min: 0.001,
            // 1 - alpha_min^(1/300): cools from 1.0 to alpha_min in ~300 ticks
            alpha_decay: 0.0228,
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            max_velocity: 50.0,
            initial_radius: 10.0,
        }
    }
}

impl ForceConfig {
    /// Ticks needed to cool from `alpha_start` to `alpha_min` with no target.
    pub fn ticks_to_settle(&self) -> usize {
        if self.alpha_decay <= 0.0 || self.alpha_decay >= 1.0 {
            return 1;
        }
        let ratio = self.alpha_min / self.alpha_start.max(self.alpha_min);
        (ratio.ln() / (1.0 - self.alpha_decay).ln()).ceil().max(1.0) as usize
    }
}

// =============================================================================
// SIMULATION NODE
// =============================================================================

/// A node in the force simulation
#[derive(Debug, Clone)]
pub struct SimNode {
    pub id: NodeId,

    /// Current position (updated by simulation)
    pub position: Pos2,

    velocity: Vec2,

    /// Collision radius
    pub radius: f32,

    /// Pinned position while dragged
    fixed: Option<Pos2>,
}

impl SimNode {
    pub fn new(id: NodeId, radius: f32) -> Self {
        Self {
            id,
            position: Pos2::ZERO,
            velocity: Vec2::ZERO,
            radius,
            fixed: None,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_pinned(&self) -> bool {
        self.fixed.is_some()
    }
}

/// An edge resolved to node indices.
#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    strength: f32,
    /// Share of the correction applied to the target
    bias: f32,
}

// =============================================================================
// FORCE SIMULATION
// =============================================================================

/// Force-directed layout simulation
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    nodes: Vec<SimNode>,

    /// Quick lookup by ID
    node_index: HashMap<NodeId, usize>,

    links: Vec<Link>,

    pub config: ForceConfig,

    /// Point the centroid is pulled toward
    pub center: Pos2,

    alpha: f32,
    alpha_target: f32,
}

impl ForceSimulation {
    /// Create an empty simulation
    pub fn new(config: ForceConfig, center: Pos2) -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::new(),
            links: Vec::new(),
            alpha: config.alpha_start,
            alpha_target: 0.0,
            config,
            center,
        }
    }

    /// Build a fresh simulation for a visible subgraph.
    ///
    /// Radii come from the node kind's style. Initial positions are a
    /// deterministic spiral around `center`.
    pub fn build(visible: &VisibleSubgraph, config: ForceConfig, center: Pos2) -> Self {
        let mut sim = Self::new(config, center);
        for node in &visible.nodes {
            sim.add_node(SimNode::new(node.id.clone(), node.kind.style().radius));
        }
        for edge in &visible.edges {
            sim.add_link(&edge.source, &edge.target);
        }
        sim.rebalance_links();
        debug!(
            nodes = sim.nodes.len(),
            links = sim.links.len(),
            "built force simulation"
        );
        sim
    }

    // =========================================================================
    // NODE MANAGEMENT
    // =========================================================================

    /// Add a node; nodes at the origin are placed on the spiral
    pub fn add_node(&mut self, mut node: SimNode) {
        if node.position == Pos2::ZERO {
            node.position = self.spiral_position(self.nodes.len());
        }
        let idx = self.nodes.len();
        self.node_index.insert(node.id.clone(), idx);
        self.nodes.push(node);
    }

    /// Connect two nodes; unknown ids and self-loops are ignored
    pub fn add_link(&mut self, source: &NodeId, target: &NodeId) {
        let (Some(&s), Some(&t)) = (self.node_index.get(source), self.node_index.get(target))
        else {
            return;
        };
        if s == t {
            return;
        }
        self.links.push(Link {
            source: s,
            target: t,
            strength: 0.0,
            bias: 0.5,
        });
    }

    /// Recompute degree-based link strength and bias.
    ///
    /// Links between hubs are weaker, and the lighter endpoint moves more.
    fn rebalance_links(&mut self) {
        let mut degree = vec![0usize; self.nodes.len()];
        for link in &self.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        for link in &mut self.links {
            let (ds, dt) = (degree[link.source] as f32, degree[link.target] as f32);
            link.strength = self.config.link_strength / ds.min(dt);
            link.bias = ds / (ds + dt);
        }
    }

    fn spiral_position(&self, i: usize) -> Pos2 {
        let golden = PI * (3.0 - 5f32.sqrt());
        let r = self.config.initial_radius * (0.5 + i as f32).sqrt();
        self.center + Vec2::angled(i as f32 * golden) * r
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&SimNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut SimNode> {
        self.node_index
            .get(id)
            .copied()
            .map(|idx| &mut self.nodes[idx])
    }

    pub fn position_of(&self, id: &NodeId) -> Option<Pos2> {
        self.get_node(id).map(|n| n.position)
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // SIMULATION
    // =========================================================================

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    /// Settled once alpha has cooled below `alpha_min`
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    /// Raise alpha so the layout moves again
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
    }

    /// Run one step. Returns `false` once the layout has settled.
    pub fn tick(&mut self) -> bool {
        if self.is_settled() || self.nodes.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        self.apply_links();
        self.apply_charge();
        self.apply_collision();
        self.integrate();
        self.apply_centering();

        true
    }

    /// Tick until settled or `max_ticks` have run; returns ticks used
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick() {
            ticks += 1;
        }
        ticks
    }

    fn apply_links(&mut self) {
        let alpha = self.alpha;
        for (i, link) in self.links.iter().enumerate() {
            let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
            let mut delta = (t.position + t.velocity) - (s.position + s.velocity);
            if delta.length_sq() == 0.0 {
                delta = jiggle(i);
            }
            let len = delta.length();
            let correction =
                delta * ((len - self.config.link_distance) / len * alpha * link.strength);

            self.nodes[link.target].velocity -= correction * link.bias;
            self.nodes[link.source].velocity += correction * (1.0 - link.bias);
        }
    }

    fn apply_charge(&mut self) {
        let n = self.nodes.len();
        let min_sq = self.config.charge_min_distance * self.config.charge_min_distance;
        let scale = self.config.charge_strength * self.alpha;

        for i in 0..n {
            for j in (i + 1)..n {
                let mut delta = self.nodes[j].position - self.nodes[i].position;
                if delta.length_sq() == 0.0 {
                    delta = jiggle(i + j);
                }
                let dist_sq = delta.length_sq().max(min_sq);
                let push = delta * (scale / dist_sq);

                // Negative strength: `push` points from j toward i
                self.nodes[i].velocity += push;
                self.nodes[j].velocity -= push;
            }
        }
    }

    fn apply_collision(&mut self) {
        let n = self.nodes.len();
        let padding = self.config.collision_padding;
        let strength = self.config.collision_strength;

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let min_dist = a.radius + b.radius + padding;
                let mut delta = (a.position + a.velocity) - (b.position + b.velocity);
                if delta.length_sq() >= min_dist * min_dist {
                    continue;
                }
                if delta.length_sq() == 0.0 {
                    delta = jiggle(i + j);
                }
                let len = delta.length();
                let overlap = delta * ((min_dist - len) / len * strength);

                // Larger circles move less
                let (ra, rb) = (a.radius * a.radius, b.radius * b.radius);
                let share_a = rb / (ra + rb);

                self.nodes[i].velocity += overlap * share_a;
                self.nodes[j].velocity -= overlap * (1.0 - share_a);
            }
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay;
        let max_velocity = self.config.max_velocity;

        for node in &mut self.nodes {
            if let Some(fixed) = node.fixed {
                node.position = fixed;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= keep;
            let speed = node.velocity.length();
            if speed > max_velocity {
                node.velocity = node.velocity.normalized() * max_velocity;
            }
            node.position += node.velocity;
        }
    }

    fn apply_centering(&mut self) {
        let free: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].fixed.is_none())
            .collect();
        if free.is_empty() {
            return;
        }

        let sum = self
            .nodes
            .iter()
            .fold(Vec2::ZERO, |acc, node| acc + node.position.to_vec2());
        let centroid = sum / self.nodes.len() as f32;
        let shift = (centroid - self.center.to_vec2()) * self.config.center_strength;

        for i in free {
            self.nodes[i].position -= shift;
        }
    }

    // =========================================================================
    // PINNING (for drag)
    // =========================================================================

    /// Pin a node where it is and reheat the layout
    pub fn drag_start(&mut self, id: &NodeId) -> bool {
        let target = self.config.drag_alpha_target;
        let Some(node) = self.get_node_mut(id) else {
            return false;
        };
        node.fixed = Some(node.position);
        node.velocity = Vec2::ZERO;

        self.alpha_target = target;
        self.reheat(target);
        true
    }

    /// Move a pinned node
    pub fn drag_to(&mut self, id: &NodeId, position: Pos2) {
        if let Some(node) = self.get_node_mut(id) {
            if node.fixed.is_some() {
                node.fixed = Some(position);
                node.position = position;
            }
        }
    }

    /// Release the pin and let the layout cool
    pub fn drag_end(&mut self, id: &NodeId) {
        if let Some(node) = self.get_node_mut(id) {
            node.fixed = None;
        }
        self.alpha_target = 0.0;
    }

    // =========================================================================
    // HIT TESTING
    // =========================================================================

    /// Find the topmost node covering a world position
    pub fn node_at(&self, pos: Pos2) -> Option<&SimNode> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.position.distance(pos) <= node.radius)
    }
}

/// Small deterministic offset for coincident points.
fn jiggle(seed: usize) -> Vec2 {
    Vec2::angled(seed as f32 * 2.39996) * 1e-3
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{visible_subgraph, FilterState};
    use domain_catalog::{Edge, Node, NodeKind};

    const CENTER: Pos2 = Pos2::new(400.0, 300.0);

    fn graph() -> VisibleSubgraph {
        let nodes = vec![
            Node::new("a", "A").with_kind(NodeKind::Tool),
            Node::new("b", "B").with_kind(NodeKind::Concept),
            Node::new("c", "C").with_kind(NodeKind::Pattern),
            Node::new("d", "D"),
        ];
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c")];
        visible_subgraph(&FilterState::new(), &nodes, &edges)
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn test_build_resolves_links() {
        let sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        assert_eq!(sim.len(), 4);
        assert_eq!(sim.link_count(), 2);
        assert_eq!(
            sim.get_node(&id("a")).unwrap().radius,
            NodeKind::Tool.style().radius
        );
    }

    #[test]
    fn test_initial_layout_is_deterministic() {
        let a = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        let b = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        for (x, y) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn test_simulation_settles() {
        let mut sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        let ticks = sim.run(10_000);

        assert!(sim.is_settled());
        assert!(ticks <= sim.config.ticks_to_settle() + 1);
        assert!(!sim.tick());
        assert!(sim.nodes().iter().all(|n| n.position.is_finite()));
    }

    #[test]
    fn test_linked_nodes_end_closer_than_unlinked() {
        let mut sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        sim.run(1_000);

        let a = sim.position_of(&id("a")).unwrap();
        let b = sim.position_of(&id("b")).unwrap();
        let c = sim.position_of(&id("c")).unwrap();
        assert!(a.distance(b) < a.distance(c));
    }

    #[test]
    fn test_nodes_do_not_overlap() {
        let mut sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        sim.run(1_000);

        let nodes = sim.nodes();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let gap = nodes[i].position.distance(nodes[j].position);
                assert!(gap > nodes[i].radius.max(nodes[j].radius));
            }
        }
    }

    #[test]
    fn test_centroid_stays_on_center() {
        let mut sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        sim.run(1_000);

        let sum = sim
            .nodes()
            .iter()
            .fold(Vec2::ZERO, |acc, n| acc + n.position.to_vec2());
        let centroid = (sum / sim.len() as f32).to_pos2();
        assert!(centroid.distance(CENTER) < 1.0);
    }

    #[test]
    fn test_drag_pins_then_releases() {
        let mut sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        sim.run(1_000);
        assert!(sim.is_settled());

        let target = Pos2::new(50.0, 50.0);
        assert!(sim.drag_start(&id("a")));
        assert!(!sim.is_settled());
        sim.drag_to(&id("a"), target);

        for _ in 0..20 {
            sim.tick();
            assert_eq!(sim.position_of(&id("a")), Some(target));
        }

        sim.drag_end(&id("a"));
        assert!(!sim.get_node(&id("a")).unwrap().is_pinned());
        assert_eq!(sim.alpha_target(), 0.0);

        sim.run(1_000);
        assert_ne!(sim.position_of(&id("a")), Some(target));
        assert!(sim.is_settled());
    }

    #[test]
    fn test_drag_unknown_node_is_ignored() {
        let mut sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        assert!(!sim.drag_start(&id("missing")));
        sim.drag_to(&id("missing"), Pos2::ZERO);
        sim.drag_end(&id("missing"));
        assert_eq!(sim.len(), 4);
    }

    #[test]
    fn test_hit_testing() {
        let sim = ForceSimulation::build(&graph(), ForceConfig::default(), CENTER);
        let a = sim.get_node(&id("a")).unwrap();

        assert_eq!(sim.node_at(a.position).map(|n| n.id.clone()), Some(id("a")));
        assert!(sim.node_at(Pos2::new(-5_000.0, -5_000.0)).is_none());
    }

    #[test]
    fn test_empty_simulation_does_not_tick() {
        let mut sim = ForceSimulation::new(ForceConfig::default(), CENTER);
        assert!(!sim.tick());
        assert_eq!(sim.run(10), 0);
    }
}
