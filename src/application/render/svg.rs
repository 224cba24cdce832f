use std::fmt::Write;

use crate::application::diagram::TreeDiagram;
use crate::application::render::{escape_xml, Renderer};
use crate::config::RenderSettings;
use crate::domain::{Bounds, Position};

/// Standalone SVG drawing of the layered layout.
///
/// Layout y grows upwards (first sibling at the bottom), SVG y grows
/// downwards, so y is flipped when mapping to pixels.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    settings: RenderSettings,
}

impl SvgRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    fn to_px(&self, bounds: &Bounds, p: Position) -> (f64, f64) {
        let s = &self.settings;
        (
            (p.x - bounds.min_x) * s.scale + s.margin,
            (bounds.max_y - p.y) * s.scale + s.margin,
        )
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, diagram: &TreeDiagram) -> String {
        let s = &self.settings;
        let bounds = diagram.layout.bounds();
        let width = bounds.width() * s.scale + 2.0 * s.margin;
        let height = bounds.height() * s.scale + 2.0 * s.margin;

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.1} {height:.1}" font-family="sans-serif" font-size="{}">"#,
            s.font_size
        );
        let _ = writeln!(out, "  <title>{}</title>", escape_xml(&diagram.event));
        let _ = writeln!(
            out,
            r#"  <defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="black"/></marker></defs>"#
        );

        out.push_str("  <g class=\"edges\">\n");
        for (edge, label) in diagram.labeled_edges() {
            let (Some(from), Some(to)) = (diagram.position(edge.parent), diagram.position(edge.child))
            else {
                continue;
            };
            let (x1, y1) = self.to_px(&bounds, from);
            let (x2, y2) = self.to_px(&bounds, to);

            // stop the line at the target circle so the arrow head stays visible
            let (dx, dy) = (x2 - x1, y2 - y1);
            let len = dx.hypot(dy);
            let shrink = if len > 0.0 { (s.node_radius / len).min(1.0) } else { 0.0 };
            let (ex, ey) = (x2 - dx * shrink, y2 - dy * shrink);

            let _ = writeln!(
                out,
                r#"    <line x1="{x1:.1}" y1="{y1:.1}" x2="{ex:.1}" y2="{ey:.1}" stroke="black" marker-end="url(#arrow)"/>"#
            );
            let _ = writeln!(
                out,
                r#"    <text x="{:.1}" y="{:.1}" text-anchor="middle" fill="dimgray">{}</text>"#,
                (x1 + x2) / 2.0,
                (y1 + y2) / 2.0 - 4.0,
                escape_xml(&label)
            );
        }
        out.push_str("  </g>\n");

        out.push_str("  <g class=\"nodes\">\n");
        for (idx, node) in diagram.tree.iter() {
            let Some(p) = diagram.position(idx) else {
                continue;
            };
            let (cx, cy) = self.to_px(&bounds, p);
            let label = if s.full_labels || node.parent.is_none() {
                node.data.label.as_str()
            } else {
                node.data.short_name()
            };
            let _ = writeln!(
                out,
                r#"    <circle cx="{cx:.1}" cy="{cy:.1}" r="{:.1}" fill="{}"/>"#,
                s.node_radius,
                escape_xml(&s.node_color)
            );
            let _ = writeln!(
                out,
                r#"    <text x="{cx:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                cy + s.font_size / 3.0,
                escape_xml(label)
            );
        }
        out.push_str("  </g>\n");

        out.push_str("</svg>\n");
        out
    }
}
