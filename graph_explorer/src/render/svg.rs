//! SVG serialization of a [`Scene`].

use domain_catalog::{BACKGROUND_COLOR, LABEL_COLOR};
use std::fmt;

use super::{Scene, SceneEdge, SceneNode};

/// Borrowing wrapper that writes a scene as a standalone SVG document.
pub struct SvgDocument<'a>(pub &'a Scene);

impl Scene {
    /// Render the scene as an SVG document.
    pub fn to_svg(&self) -> String {
        SvgDocument(self).to_string()
    }
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene = self.0;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = scene.width,
            h = scene.height
        )?;
        writeln!(
            f,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            BACKGROUND_COLOR
        )?;
        writeln!(f, r#"<g transform="{}">"#, scene.viewport.transform_attr())?;

        writeln!(f, r#"<g class="links">"#)?;
        for edge in &scene.edges {
            write_edge(f, edge)?;
        }
        writeln!(f, "</g>")?;

        writeln!(f, r#"<g class="nodes">"#)?;
        for node in &scene.nodes {
            write_node(f, node)?;
        }
        writeln!(f, "</g>")?;

        if scene.options.show_labels {
            writeln!(f, r#"<g class="labels">"#)?;
            for node in &scene.nodes {
                write_label(f, node)?;
            }
            writeln!(f, "</g>")?;
        }

        writeln!(f, "</g>")?;
        write!(f, "</svg>")
    }
}

fn write_edge(f: &mut fmt::Formatter<'_>, edge: &SceneEdge) -> fmt::Result {
    write!(
        f,
        r#"<line data-source="{}" data-target="{}" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-opacity="{:.2}""#,
        escape_xml(edge.source.as_str()),
        escape_xml(edge.target.as_str()),
        edge.from.x,
        edge.from.y,
        edge.to.x,
        edge.to.y,
        edge.color,
        edge.opacity
    )?;
    match &edge.relation {
        Some(relation) => writeln!(f, "><title>{}</title></line>", escape_xml(relation)),
        None => writeln!(f, "/>"),
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &SceneNode) -> fmt::Result {
    writeln!(
        f,
        r#"<circle class="node node-{kind}" data-id="{id}" cx="{:.2}" cy="{:.2}" r="{:.1}" fill="{}" stroke="{}" stroke-width="{}" opacity="{:.2}"><title>{label}</title></circle>"#,
        node.position.x,
        node.position.y,
        node.radius,
        node.fill,
        Scene::stroke_for(node),
        if node.selected { 3 } else { 1 },
        node.opacity,
        kind = escape_xml(&node.kind),
        id = escape_xml(node.id.as_str()),
        label = escape_xml(&node.label),
    )
}

fn write_label(f: &mut fmt::Formatter<'_>, node: &SceneNode) -> fmt::Result {
    writeln!(
        f,
        r#"<text x="{:.2}" y="{:.2}" fill="{}" opacity="{:.2}" font-size="10">{}</text>"#,
        node.position.x + node.radius + 3.0,
        node.position.y + 3.0,
        LABEL_COLOR,
        node.opacity,
        escape_xml(&node.label)
    )
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::Highlight;
    use crate::filter::{visible_subgraph, FilterState};
    use emath::Pos2;
    use crate::layout::{ForceConfig, ForceSimulation};
    use crate::render::{ViewOptions, Viewport};
    use domain_catalog::{Edge, Node, NodeKind};

    fn scene(options: ViewOptions) -> Scene {
        let nodes = vec![
            Node::new("a", "Pub/Sub <events>").with_kind(NodeKind::Platform),
            Node::new("b", "Beta"),
        ];
        let edges = vec![Edge::new("a", "b").with_relation("feeds & drains")];
        let visible = visible_subgraph(&FilterState::new(), &nodes, &edges);
        let sim = ForceSimulation::build(&visible, ForceConfig::default(), Pos2::new(100.0, 100.0));
        Scene::build(
            &visible,
            &sim,
            &Highlight::None,
            Viewport::default(),
            options,
            (200.0, 200.0),
        )
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn test_svg_contains_every_element() {
        let svg = scene(ViewOptions::default()).to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains("node-platform"));
        assert!(svg.contains("Pub/Sub &lt;events&gt;"));
        assert!(svg.contains("<title>feeds &amp; drains</title>"));
    }

    #[test]
    fn test_labels_can_be_hidden() {
        let svg = scene(ViewOptions {
            show_labels: false,
            ..ViewOptions::default()
        })
        .to_svg();

        assert_eq!(svg.matches("<text").count(), 0);
        assert_eq!(svg.matches("<circle").count(), 2);
    }
}
