//! Domain layer: outcomes, the probability tree and its layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod depth;
pub mod entities;
pub mod error;
pub mod layout;

pub use arena::{NodeData, ProbabilityTree, TreeEdge, TreeNode};
pub use builder::{
    expected_edge_count, expected_label_bytes, expected_node_count, TreeBuilder,
    DEFAULT_MAX_NODES, LABEL_BYTES_PER_NODE,
};
pub use depth::{DepthMap, DepthResolver};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{Bounds, DepthBand, Layout, LayoutEngine, Position};
