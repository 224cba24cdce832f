use std::collections::HashMap;
use std::fmt::Write;

use generational_arena::Index;

use crate::application::diagram::TreeDiagram;
use crate::application::render::{format_probability, Renderer};
use crate::config::RenderSettings;

/// Graphviz DOT output.
///
/// Node positions are pinned (`pos="x,y!"`) so `neato -n2 -Tpng` reproduces
/// the layered layout; `dot -Tpng` ignores them and lays out left to right.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    settings: RenderSettings,
}

impl DotRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl Renderer for DotRenderer {
    fn render(&self, diagram: &TreeDiagram) -> String {
        let s = &self.settings;
        // Path labels can collide for names containing the separator, so
        // nodes get positional ids
        let ids: HashMap<Index, String> = diagram
            .tree
            .iter()
            .enumerate()
            .map(|(i, (idx, _))| (idx, format!("n{i}")))
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", quote(&diagram.event));
        let _ = writeln!(out, "    rankdir=LR;");
        let _ = writeln!(
            out,
            "    node [shape=circle, style=filled, fillcolor={}, fontsize={}];",
            quote(&s.node_color),
            s.font_size
        );
        let _ = writeln!(out, "    edge [fontsize={}];", s.font_size);

        for (idx, node) in diagram.tree.iter() {
            let label = if s.full_labels || node.parent.is_none() {
                node.data.label.as_str()
            } else {
                node.data.short_name()
            };
            let mut attrs = vec![format!("label={}", quote(label))];
            if let Some(p) = diagram.position(idx) {
                attrs.push(format!("pos=\"{:.2},{:.2}!\"", p.x * s.scale, p.y * s.scale));
            }
            let _ = writeln!(out, "    {} [{}];", ids[&idx], attrs.join(", "));
        }

        for edge in diagram.tree.edges() {
            let _ = writeln!(
                out,
                "    {} -> {} [label={}];",
                ids[&edge.parent],
                ids[&edge.child],
                quote(&format_probability(edge.probability))
            );
        }

        out.push_str("}\n");
        out
    }
}
