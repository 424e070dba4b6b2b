//! Explorer configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! [data]
//! nodes = "data/nodes.json"
//! edges = "data/edges.json"
//!
//! [view]
//! width = 1280.0
//! show_labels = false
//!
//! [force]
//! charge_strength = -450.0
//! ```

use emath::Pos2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::layout::ForceConfig;
use crate::render::{ViewOptions, Viewport};

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Locations of the two static collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub nodes: PathBuf,
    pub edges: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            nodes: PathBuf::from("data/nodes.json"),
            edges: PathBuf::from("data/edges.json"),
        }
    }
}

/// Canvas size and display defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: f32,
    pub height: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,

    /// Opacity of elements outside a selected neighborhood
    pub dim_opacity: f32,

    pub show_labels: bool,

    /// Tick budget for settling a freshly built layout
    pub settle_ticks: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
            dim_opacity: 0.15,
            show_labels: true,
            settle_ticks: 500,
        }
    }
}

impl ViewConfig {
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.min_zoom, self.max_zoom)
    }

    pub fn options(&self) -> ViewOptions {
        ViewOptions {
            show_labels: self.show_labels,
            dim_opacity: self.dim_opacity.clamp(0.0, 1.0),
        }
    }
}

/// Top-level explorer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub data: DataSources,
    pub view: ViewConfig,
    pub force: ForceConfig,
}

impl ExplorerConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Config reading data from the given files, defaults elsewhere.
    pub fn with_data(nodes: impl Into<PathBuf>, edges: impl Into<PathBuf>) -> Self {
        Self {
            data: DataSources {
                nodes: nodes.into(),
                edges: edges.into(),
            },
            ..Self::default()
        }
    }
}
