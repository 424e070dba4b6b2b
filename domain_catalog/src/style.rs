//! Style lookup table for node kinds.
//!
//! Each [`NodeKind`] maps to a fill, a stroke, and a base radius. Kinds
//! without an entry share the neutral `Other` style.

use serde::{Deserialize, Serialize};

use crate::records::NodeKind;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// `#rrggbb` form, as used in SVG attributes.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// How a node of a given kind is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub fill: Rgb,
    pub stroke: Rgb,
    pub radius: f32,
}

/// Edge stroke color.
pub const EDGE_COLOR: Rgb = Rgb::new(153, 153, 153);
/// Edge stroke color when connected to the selected node.
pub const EDGE_HIGHLIGHT_COLOR: Rgb = Rgb::new(255, 193, 7);
/// Ring drawn around the selected node.
pub const SELECTION_STROKE: Rgb = Rgb::new(255, 193, 7);
pub const LABEL_COLOR: Rgb = Rgb::new(224, 224, 224);
pub const BACKGROUND_COLOR: Rgb = Rgb::new(26, 26, 26);

const OTHER_STYLE: NodeStyle = NodeStyle {
    fill: Rgb::new(176, 190, 197),  // Gray
    stroke: Rgb::new(96, 125, 139), // Blue-gray
    radius: 7.0,
};

impl NodeKind {
    /// Look up the drawing style for this kind.
    pub fn style(&self) -> NodeStyle {
        match self {
            NodeKind::Tool => NodeStyle {
                fill: Rgb::new(100, 181, 246),  // Light blue
                stroke: Rgb::new(25, 118, 210), // Blue
                radius: 10.0,
            },
            NodeKind::Concept => NodeStyle {
                fill: Rgb::new(129, 199, 132), // Light green
                stroke: Rgb::new(56, 142, 60), // Green
                radius: 12.0,
            },
            NodeKind::Pattern => NodeStyle {
                fill: Rgb::new(206, 147, 216), // Light purple
                stroke: Rgb::new(142, 36, 170), // Purple
                radius: 9.0,
            },
            NodeKind::Technology => NodeStyle {
                fill: Rgb::new(251, 191, 36),  // Amber-400
                stroke: Rgb::new(217, 119, 6), // Amber-600
                radius: 10.0,
            },
            NodeKind::Practice => NodeStyle {
                fill: Rgb::new(178, 223, 219), // Teal
                stroke: Rgb::new(0, 137, 123), // Teal dark
                radius: 8.0,
            },
            NodeKind::Framework => NodeStyle {
                fill: Rgb::new(252, 165, 165), // Red-300
                stroke: Rgb::new(220, 38, 38), // Red-600
                radius: 9.0,
            },
            NodeKind::Platform => NodeStyle {
                fill: Rgb::new(196, 181, 253), // Violet-300
                stroke: Rgb::new(124, 58, 237), // Violet-600
                radius: 11.0,
            },
            NodeKind::Language => NodeStyle {
                fill: Rgb::new(254, 215, 170), // Orange-200
                stroke: Rgb::new(234, 88, 12), // Orange-600
                radius: 9.0,
            },
            NodeKind::Other(_) => OTHER_STYLE,
        }
    }
}
