//! Filter Engine - derives the visible subgraph from the active filters.
//!
//! Matching rules:
//! - **Search**: case-insensitive substring of name, description and tags
//! - **Facets**: OR within a facet, AND across facets; an empty facet passes everything
//! - **Edges**: visible only when both endpoints are visible

mod state;
mod subgraph;

pub use state::*;
pub use subgraph::*;
