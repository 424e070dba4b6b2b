//! Render adapter - turns the laid-out subgraph into drawable elements.
//!
//! A [`Scene`] is torn down and rebuilt whenever the visible subgraph
//! changes. Between rebuilds only positions and opacities are refreshed.

mod scene;
mod svg;
mod viewport;

pub use scene::*;
pub use svg::*;
pub use viewport::*;
