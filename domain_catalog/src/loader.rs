//! Data loader - reads the node and edge collections from static JSON files.
//!
//! This is the only asynchronous step: both files are read concurrently and
//! must arrive before anything is laid out or rendered.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::records::{Edge, Node};

/// Errors raised while loading the static collections.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// The file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Parse a JSON array of node records.
pub fn parse_nodes(json: &str) -> Result<Vec<Node>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a JSON array of edge records.
pub fn parse_edges(json: &str) -> Result<Vec<Edge>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load both collections and index them.
pub async fn load_dataset(
    nodes_path: impl AsRef<Path>,
    edges_path: impl AsRef<Path>,
) -> Result<Dataset, LoadError> {
    let nodes_path = nodes_path.as_ref();
    let edges_path = edges_path.as_ref();

    let (nodes, edges) = tokio::try_join!(
        read_collection::<Node>(nodes_path),
        read_collection::<Edge>(edges_path)
    )?;

    info!(nodes = nodes.len(), edges = edges.len(), "loaded graph data");
    Ok(Dataset::new(nodes, edges))
}

async fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    debug!(path = %path.display(), "reading collection");

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
