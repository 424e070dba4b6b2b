//! Layout - positions the visible subgraph with a force-directed simulation.

mod force;

pub use force::*;
