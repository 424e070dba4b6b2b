//! End-to-end flow: load the two JSON files, filter, select, drag, render.

use domain_catalog::{LoadError, NodeId};
use graph_explorer::{Explorer, ExplorerConfig, Facet, Pos2, UiEvent, Update};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

const NODES: &str = r#"[
  {"id": 1, "name": "Apache Kafka", "type": "tool", "category": "streaming",
   "description": "Distributed event log", "tags": ["streaming", "messaging"]},
  {"id": 2, "name": "Batch Processing", "type": "concept", "category": "processing",
   "description": "Bounded data jobs", "tags": ["batch"]},
  {"id": 3, "name": "Change Data Capture", "type": "pattern", "category": "integration",
   "description": "Stream row changes out of a database", "tags": ["streaming", "cdc"]},
  {"id": 4, "name": "Data Contract", "type": "practice", "category": "governance",
   "description": null, "tags": "governance"},
  {"id": 5, "name": "Iceberg", "type": "table-format", "category": "storage",
   "tags": ["lakehouse", 42]}
]"#;

const EDGES: &str = r#"[
  {"source": 3, "target": 1, "type": "publishes to"},
  {"source": 2, "target": 5},
  {"source": 1, "target": 5, "weight": 0.4},
  {"source": 4, "target": 3, "type": "governs", "label": "Governs"},
  {"source": 1, "target": 99}
]"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn write_data(dir: &Path, nodes: &str, edges: &str) -> ExplorerConfig {
    let nodes_path = dir.join("nodes.json");
    let edges_path = dir.join("edges.json");
    std::fs::write(&nodes_path, nodes).unwrap();
    std::fs::write(&edges_path, edges).unwrap();
    ExplorerConfig::with_data(nodes_path, edges_path)
}

fn id(n: u64) -> NodeId {
    NodeId::from(n)
}

#[tokio::test]
async fn load_filter_select_and_render() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = write_data(dir.path(), NODES, EDGES);

    let mut explorer = Explorer::load(&config).await.unwrap();

    // Identity filter: everything except the dangling edge is on screen
    let stats = explorer.stats();
    assert_eq!(stats.visible_nodes, 5);
    assert_eq!(stats.total_edges, 5);
    assert_eq!(stats.visible_edges, 4);

    let svg = explorer.render_svg();
    assert_eq!(svg.matches("<circle").count(), 5);
    assert_eq!(svg.matches("<line").count(), 4);

    // Unknown kinds keep their name and get the neutral style
    assert!(svg.contains("node-table-format"));

    // Loosely shaped records still load
    let contract = explorer.dataset().get(&id(4)).unwrap();
    assert!(contract.has_tag("governance"));
    let governs = explorer.dataset().edges().iter().find(|e| e.source == id(4)).unwrap();
    assert_eq!(governs.relation.as_deref(), Some("governs"));
    assert_eq!(governs.extra.get("label").and_then(|v| v.as_str()), Some("Governs"));

    // Streaming tag chip
    let update = explorer.handle(UiEvent::ToggleChip {
        facet: Facet::Tag,
        value: "streaming".into(),
    });
    assert_eq!(update, Update::Rebuilt);
    let visible: Vec<_> = explorer.visible().node_ids().cloned().collect();
    assert_eq!(visible, vec![id(1), id(3)]);
    assert_eq!(explorer.visible().edges.len(), 1);

    // Add a search that only one of them matches
    explorer.handle(UiEvent::Search("DATABASE".into()));
    let visible: Vec<_> = explorer.visible().node_ids().cloned().collect();
    assert_eq!(visible, vec![id(3)]);
    assert!(explorer.visible().edges.is_empty());

    // Clearing brings back the full original collection
    explorer.handle(UiEvent::ClearFilters);
    assert_eq!(explorer.visible().nodes, explorer.dataset().nodes());
    assert_eq!(explorer.stats().visible_edges, 4);

    // Select Kafka: its neighborhood stays bright
    explorer.handle(UiEvent::ClickNode(id(1)));
    let details = explorer.selected_details().unwrap();
    assert_eq!(details.name, "Apache Kafka");
    let neighbor_ids: Vec<_> = details.neighbors.iter().map(|n| n.id.clone()).collect();
    assert_eq!(neighbor_ids, vec![id(3), id(5)]);
    assert!(details.to_string().contains("<- Change Data Capture (publishes to)"));

    let scene = explorer.scene();
    let dimmed: Vec<_> = scene
        .nodes
        .iter()
        .filter(|n| n.opacity < 1.0)
        .map(|n| n.id.clone())
        .collect();
    assert_eq!(dimmed, vec![id(2), id(4)]);
}

#[tokio::test]
async fn drag_then_release_resumes_layout() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = write_data(dir.path(), NODES, EDGES);
    let mut explorer = Explorer::load(&config).await.unwrap();

    explorer.handle(UiEvent::Zoom {
        factor: 2.0,
        anchor: Pos2::new(0.0, 0.0),
    });
    let screen = Pos2::new(300.0, 200.0);
    let world = explorer.viewport().to_world(screen);

    explorer.handle(UiEvent::DragStart(id(2)));
    explorer.handle(UiEvent::DragMove { id: id(2), screen });
    for _ in 0..30 {
        explorer.tick();
    }
    assert_eq!(explorer.simulation().position_of(&id(2)), Some(world));

    explorer.handle(UiEvent::DragEnd(id(2)));
    explorer.settle(2_000);

    assert!(explorer.simulation().is_settled());
    assert!(!explorer.simulation().get_node(&id(2)).unwrap().is_pinned());
    assert_eq!(
        explorer.scene().node(&id(2)).unwrap().position,
        explorer.simulation().position_of(&id(2)).unwrap()
    );
}

#[tokio::test]
async fn malformed_json_leaves_graph_unrendered() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = write_data(dir.path(), NODES, r#"[{"source": 1,"#);

    let result = Explorer::load(&config).await;

    match result {
        Err(LoadError::Parse { path, .. }) => assert!(path.ends_with("edges.json")),
        Err(other) => panic!("expected parse error, got {other}"),
        Ok(_) => panic!("expected load to fail"),
    }
}

#[tokio::test]
async fn missing_file_leaves_graph_unrendered() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config =
        ExplorerConfig::with_data(dir.path().join("nodes.json"), dir.path().join("edges.json"));

    let err = Explorer::load(&config).await.err().unwrap();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[tokio::test]
async fn bundled_sample_data_loads() {
    init_tracing();
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data");
    let config = ExplorerConfig::with_data(root.join("nodes.json"), root.join("edges.json"));

    let mut explorer = Explorer::load(&config).await.unwrap();
    assert_eq!(explorer.stats().visible_nodes, explorer.stats().total_nodes);
    assert!(explorer.visible().is_consistent());

    explorer.handle(UiEvent::ToggleChip {
        facet: Facet::Tag,
        value: "streaming".into(),
    });
    assert!(explorer
        .visible()
        .nodes
        .iter()
        .all(|n| n.has_tag("streaming")));
}
