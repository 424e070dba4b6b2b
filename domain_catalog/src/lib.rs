//! # Domain Catalog
//!
//! The data side of the knowledge map: node and edge records, the per-kind
//! style table, the indexed [`Dataset`], and the loader that reads the two
//! static JSON collections at startup.
//!
//! Records are loaded once and never mutated afterwards. Everything that
//! changes while the map is explored lives in `graph_explorer`.

pub mod dataset;
pub mod loader;
pub mod records;
pub mod style;

pub use dataset::*;
pub use loader::*;
pub use records::*;
pub use style::*;
