//! Layered layout: one vertical band per depth, bands spaced left to right.

use std::collections::HashMap;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::ProbabilityTree;
use crate::domain::depth::DepthMap;

pub const DEFAULT_HORIZONTAL_SPACING: f64 = 2.0;
pub const DEFAULT_VERTICAL_SPACING: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// All nodes sharing one depth, ordered by increasing y.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBand {
    pub depth: usize,
    pub x: f64,
    pub nodes: Vec<Index>,
}

/// Axis-aligned box enclosing every node position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    positions: HashMap<Index, Position>,
    bands: Vec<DepthBand>,
}

impl Layout {
    pub fn position(&self, idx: Index) -> Option<Position> {
        self.positions.get(&idx).copied()
    }

    /// Bands by ascending depth.
    pub fn bands(&self) -> &[DepthBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        let mut points = self.positions.values();
        let Some(first) = points.next() else {
            return Bounds {
                min_x: 0.0,
                max_x: 0.0,
                min_y: 0.0,
                max_y: 0.0,
            };
        };
        points.fold(
            Bounds {
                min_x: first.x,
                max_x: first.x,
                min_y: first.y,
                max_y: first.y,
            },
            |b, p| Bounds {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }
}

/// Deterministic layered layout.
///
/// Band `d` sits at `x = horizontal_spacing * d`; the i-th of its `n` nodes
/// sits at `y = vertical_spacing * (i - (n - 1) / 2)`, centring the band on 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    horizontal_spacing: f64,
    vertical_spacing: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING)
    }
}

impl LayoutEngine {
    pub fn new(horizontal_spacing: f64, vertical_spacing: f64) -> Self {
        Self {
            horizontal_spacing,
            vertical_spacing,
        }
    }

    #[instrument(level = "debug", skip_all, fields(nodes = depths.len()))]
    pub fn layout(&self, tree: &ProbabilityTree, depths: &DepthMap) -> Layout {
        let by_depth = depths
            .iter()
            .filter(|(idx, _)| tree.get_node(*idx).is_some())
            .into_group_map_by(|(_, depth)| *depth);

        let mut layout = Layout::default();
        for depth in by_depth.keys().copied().sorted() {
            let nodes: Vec<Index> = by_depth[&depth].iter().map(|(idx, _)| *idx).collect();
            let x = self.horizontal_spacing * depth as f64;

            for (i, idx) in nodes.iter().enumerate() {
                let y = self.vertical_spacing * band_offset(i, nodes.len());
                layout.positions.insert(*idx, Position { x, y });
            }
            debug!("band {}: {} nodes at x={}", depth, nodes.len(), x);
            layout.bands.push(DepthBand { depth, x, nodes });
        }

        layout
    }
}

/// Offset of slot `i` from the centre of a band of `n` slots.
fn band_offset(i: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    i as f64 - (n as f64 - 1.0) / 2.0
}
