//! Renderers: turn a laid-out tree into text, Graphviz DOT or SVG.

mod dot;
mod svg;
mod terminal;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::diagram::TreeDiagram;
use crate::config::RenderSettings;

pub use dot::DotRenderer;
pub use svg::SvgRenderer;
pub use terminal::TerminalRenderer;

/// Renders a diagram into its textual output.
pub trait Renderer {
    fn render(&self, diagram: &TreeDiagram) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree for the terminal
    Tree,
    /// Graphviz DOT with pinned node positions
    Dot,
    /// Standalone SVG drawing
    Svg,
}

impl OutputFormat {
    /// Guess the format from a file extension (`.txt`, `.dot`/`.gv`, `.svg`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Tree),
            "dot" | "gv" => Some(Self::Dot),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn renderer(self, settings: &RenderSettings) -> Box<dyn Renderer> {
        match self {
            Self::Tree => Box::new(TerminalRenderer::new(settings.full_labels)),
            Self::Dot => Box::new(DotRenderer::new(settings.clone())),
            Self::Svg => Box::new(SvgRenderer::new(settings.clone())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Dot => write!(f, "dot"),
            Self::Svg => write!(f, "svg"),
        }
    }
}

/// Cumulative probability as a percentage with two decimals (`0.25` -> `25.00%`).
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Escape text for XML attributes and content (also fine for DOT after quoting).
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
