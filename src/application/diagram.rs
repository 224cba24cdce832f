//! A built tree together with its depths and layout, ready for rendering.

use generational_arena::Index;

use crate::domain::{DepthMap, Layout, Position, ProbabilityTree, TreeEdge};

/// Node count and probability mass of one depth band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSummary {
    pub depth: usize,
    pub nodes: usize,
    /// Sum of cumulative probabilities in the band; 1.0 for a valid outcome set
    pub total_probability: f64,
}

#[derive(Debug)]
pub struct TreeDiagram {
    pub event: String,
    pub tree: ProbabilityTree,
    pub depths: DepthMap,
    pub layout: Layout,
}

impl TreeDiagram {
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    pub fn edge_count(&self) -> usize {
        self.tree.edge_count()
    }

    pub fn position(&self, idx: Index) -> Option<Position> {
        self.layout.position(idx)
    }

    /// Edges in pre-order with their cumulative probability as a percentage label.
    pub fn labeled_edges(&self) -> Vec<(TreeEdge, String)> {
        self.tree
            .edges()
            .map(|edge| (edge, crate::application::render::format_probability(edge.probability)))
            .collect()
    }

    pub fn band_summaries(&self) -> Vec<BandSummary> {
        self.layout
            .bands()
            .iter()
            .map(|band| BandSummary {
                depth: band.depth,
                nodes: band.nodes.len(),
                total_probability: band
                    .nodes
                    .iter()
                    .filter_map(|idx| self.tree.get_node(*idx))
                    .map(|node| node.data.probability)
                    .sum(),
            })
            .collect()
    }
}
