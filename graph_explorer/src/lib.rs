//! # Graph Explorer
//!
//! The interactive side of the knowledge map. Takes the immutable
//! [`domain_catalog::Dataset`] and keeps a displayed subgraph consistent
//! with the active filters.
//!
//! ## Core Components
//!
//! - **filter**: Filter state and the pure visible-subgraph recomputation
//! - **layout**: Force-directed simulation with drag pinning
//! - **render**: Retained scene, viewport transform, SVG output
//! - **detail**: Selected-node attributes and neighborhood highlight
//! - **explorer**: The owned state object that routes UI events
//!
//! ## Flow
//!
//! ```text
//! load_dataset ──► FilterState (identity) ──► visible_subgraph
//!                        ▲                          │
//!                        │                          ▼
//!                    UiEvent ◄── Scene ◄── ForceSimulation
//! ```

pub mod config;
pub mod detail;
pub mod explorer;
pub mod filter;
pub mod layout;
pub mod render;

pub use config::*;
pub use detail::*;
pub use explorer::*;
pub use filter::*;
pub use layout::*;
pub use render::*;

// Points and vectors shared by layout, viewport and events
pub use emath::{Pos2, Vec2};
