//! Explorer - the single owned state object behind the map.
//!
//! Owns the dataset, the filter state and everything derived from it. UI
//! events come in through [`Explorer::handle`]; anything that changes the
//! filters recomputes the visible subgraph and rebuilds layout and scene
//! from scratch.

use domain_catalog::{load_dataset, Dataset, LoadError, NodeId};
use emath::{Pos2, Vec2};
use tracing::{debug, error, info};

use crate::config::ExplorerConfig;
use crate::detail::{Highlight, NodeDetails};
use crate::filter::{visible_subgraph, Facet, FilterState, VisibleSubgraph};
use crate::layout::ForceSimulation;
use crate::render::{Scene, ViewOptions, Viewport};

/// User interactions the explorer reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Search box contents changed.
    Search(String),

    /// A filter chip was clicked.
    ToggleChip { facet: Facet, value: String },

    ClearFilters,

    /// A node was clicked directly.
    ClickNode(NodeId),

    /// A click at a screen position; selects whatever node is under it.
    ClickAt(Pos2),

    ClickBackground,

    DragStart(NodeId),

    /// Dragged node moved to a screen position.
    DragMove { id: NodeId, screen: Pos2 },

    DragEnd(NodeId),

    /// Zoom by `factor` around a screen point.
    Zoom { factor: f32, anchor: Pos2 },

    /// Pan by a screen-space delta.
    Pan(Vec2),

    ResetZoom,

    ToggleLabels,
}

/// What an event did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Nothing changed.
    Unchanged,
    /// Existing elements were moved, restyled or re-transformed.
    Refreshed,
    /// The visible subgraph was recomputed and the scene rebuilt.
    Rebuilt,
}

/// A filter chip as shown in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetChip {
    pub facet: Facet,
    pub value: String,
    /// Nodes in the full dataset carrying this value
    pub count: usize,
    pub selected: bool,
}

/// Visible versus total counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub visible_nodes: usize,
    pub total_nodes: usize,
    pub visible_edges: usize,
    pub total_edges: usize,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Showing {} of {} nodes, {} of {} edges",
            self.visible_nodes, self.total_nodes, self.visible_edges, self.total_edges
        )
    }
}

/// The knowledge map explorer.
pub struct Explorer {
    dataset: Dataset,
    config: ExplorerConfig,
    filter: FilterState,
    visible: VisibleSubgraph,
    simulation: ForceSimulation,
    viewport: Viewport,
    options: ViewOptions,
    highlight: Highlight,
    scene: Scene,
    dragging: Option<NodeId>,
}

impl Explorer {
    /// Load the data files named in the config and build the initial view.
    ///
    /// On failure the error is logged and returned; nothing is rendered.
    pub async fn load(config: &ExplorerConfig) -> Result<Self, LoadError> {
        match load_dataset(&config.data.nodes, &config.data.edges).await {
            Ok(dataset) => Ok(Self::new(dataset, config.clone())),
            Err(err) => {
                error!(error = %err, "failed to load graph data; graph left unrendered");
                Err(err)
            }
        }
    }

    /// Build the explorer over a loaded dataset with the identity filter.
    pub fn new(dataset: Dataset, config: ExplorerConfig) -> Self {
        let viewport = config.view.viewport();
        let options = config.view.options();
        let center = config.view.center();
        let simulation = ForceSimulation::new(config.force.clone(), center);
        let scene = Scene::build(
            &VisibleSubgraph::default(),
            &simulation,
            &Highlight::None,
            viewport,
            options,
            (config.view.width, config.view.height),
        );

        let mut explorer = Self {
            dataset,
            config,
            filter: FilterState::new(),
            visible: VisibleSubgraph::default(),
            simulation,
            viewport,
            options,
            highlight: Highlight::None,
            scene,
            dragging: None,
        };
        explorer.recompute();
        info!(
            nodes = explorer.dataset.node_count(),
            edges = explorer.dataset.edge_count(),
            "explorer ready"
        );
        explorer
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible(&self) -> &VisibleSubgraph {
        &self.visible
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.simulation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.highlight.selected()
    }

    pub fn dragging(&self) -> Option<&NodeId> {
        self.dragging.as_ref()
    }

    /// Attribute text for the current selection.
    pub fn selected_details(&self) -> Option<NodeDetails> {
        self.selection()
            .and_then(|id| NodeDetails::build(id, &self.visible))
    }

    pub fn render_svg(&self) -> String {
        self.scene.to_svg()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            visible_nodes: self.visible.nodes.len(),
            total_nodes: self.dataset.node_count(),
            visible_edges: self.visible.edges.len(),
            total_edges: self.dataset.edge_count(),
        }
    }

    /// Chips for every facet value in the dataset, grouped by facet.
    pub fn facet_chips(&self) -> Vec<FacetChip> {
        let mut chips = Vec::new();
        for facet in Facet::ALL {
            let counts = match facet {
                Facet::Type => self.dataset.type_facets(),
                Facet::Category => self.dataset.category_facets(),
                Facet::Tag => self.dataset.tag_facets(),
            };
            chips.extend(counts.into_iter().map(|fc| FacetChip {
                selected: self.filter.is_selected(facet, &fc.value),
                facet,
                value: fc.value,
                count: fc.count,
            }));
        }
        chips
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Apply a UI event.
    pub fn handle(&mut self, event: UiEvent) -> Update {
        match event {
            UiEvent::Search(text) => {
                self.filter.set_search(text);
                self.recompute()
            }
            UiEvent::ToggleChip { facet, value } => {
                let selected = self.filter.toggle(facet, &value);
                debug!(%facet, %value, selected, "toggled filter chip");
                self.recompute()
            }
            UiEvent::ClearFilters => {
                self.filter.clear();
                self.recompute()
            }
            UiEvent::ClickNode(id) => self.click_node(id),
            UiEvent::ClickAt(screen) => {
                let world = self.viewport.to_world(screen);
                match self.simulation.node_at(world).map(|n| n.id.clone()) {
                    Some(id) => self.click_node(id),
                    None => self.clear_selection(),
                }
            }
            UiEvent::ClickBackground => self.clear_selection(),
            UiEvent::DragStart(id) => {
                // Only one pin at a time; a stale drag is released first
                let released = match self.dragging.take() {
                    Some(prev) if prev != id => {
                        debug!(%prev, %id, "releasing unfinished drag");
                        self.simulation.drag_end(&prev);
                        true
                    }
                    _ => false,
                };
                if !self.simulation.drag_start(&id) {
                    debug!(%id, "drag start on hidden or unknown node");
                    return if released {
                        Update::Refreshed
                    } else {
                        Update::Unchanged
                    };
                }
                self.dragging = Some(id);
                Update::Refreshed
            }
            UiEvent::DragMove { id, screen } => {
                if self.dragging.as_ref() != Some(&id) {
                    return Update::Unchanged;
                }
                let world = self.viewport.to_world(screen);
                self.simulation.drag_to(&id, world);
                self.scene.sync_positions(&self.simulation);
                Update::Refreshed
            }
            UiEvent::DragEnd(id) => {
                if self.dragging.as_ref() != Some(&id) {
                    return Update::Unchanged;
                }
                self.simulation.drag_end(&id);
                self.dragging = None;
                Update::Refreshed
            }
            UiEvent::Zoom { factor, anchor } => {
                self.viewport.zoom_by(factor, anchor);
                self.scene.viewport = self.viewport;
                Update::Refreshed
            }
            UiEvent::Pan(delta) => {
                self.viewport.pan(delta);
                self.scene.viewport = self.viewport;
                Update::Refreshed
            }
            UiEvent::ResetZoom => {
                self.viewport.reset();
                self.scene.viewport = self.viewport;
                Update::Refreshed
            }
            UiEvent::ToggleLabels => {
                self.options.show_labels = !self.options.show_labels;
                self.scene.options = self.options;
                Update::Refreshed
            }
        }
    }

    /// Advance the layout one step. Returns `false` once settled.
    pub fn tick(&mut self) -> bool {
        let moved = self.simulation.tick();
        if moved {
            self.scene.sync_positions(&self.simulation);
        }
        moved
    }

    /// Tick until settled or the budget runs out; returns ticks used.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let ticks = self.simulation.run(max_ticks);
        self.scene.sync_positions(&self.simulation);
        ticks
    }

    fn click_node(&mut self, id: NodeId) -> Update {
        if !self.visible.contains_node(&id) {
            debug!(%id, "click on hidden or unknown node ignored");
            return Update::Unchanged;
        }
        if self.selection() == Some(&id) {
            return self.clear_selection();
        }

        debug!(%id, "selected node");
        self.highlight = Highlight::for_selection(&id, &self.visible);
        self.scene.apply_highlight(&self.highlight);
        Update::Refreshed
    }

    fn clear_selection(&mut self) -> Update {
        if self.highlight == Highlight::None {
            return Update::Unchanged;
        }
        self.highlight = Highlight::None;
        self.scene.apply_highlight(&self.highlight);
        Update::Refreshed
    }

    /// Recompute the visible subgraph and rebuild layout and scene.
    fn recompute(&mut self) -> Update {
        self.visible = visible_subgraph(&self.filter, self.dataset.nodes(), self.dataset.edges());

        self.highlight = match self.highlight.selected() {
            Some(id) if self.visible.contains_node(id) => {
                Highlight::for_selection(id, &self.visible)
            }
            _ => Highlight::None,
        };

        self.dragging = None;
        self.simulation = ForceSimulation::build(
            &self.visible,
            self.config.force.clone(),
            self.config.view.center(),
        );
        let ticks = self.simulation.run(self.config.view.settle_ticks);

        self.scene = Scene::build(
            &self.visible,
            &self.simulation,
            &self.highlight,
            self.viewport,
            self.options,
            (self.config.view.width, self.config.view.height),
        );

        debug!(
            visible_nodes = self.visible.nodes.len(),
            visible_edges = self.visible.edges.len(),
            ticks,
            "rebuilt scene"
        );
        Update::Rebuilt
    }
}
