//! Arena-backed probability tree.

use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Data payload for a tree node: one outcome sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Path-encoded label: root label plus every outcome name on the path
    pub label: String,
    /// Outcome chosen to reach this node, None for the root
    pub outcome: Option<String>,
    /// Product of all outcome probabilities from the root to this node
    pub probability: f64,
}

impl NodeData {
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            outcome: None,
            probability: 1.0,
        }
    }

    /// Name shown for the node in compact renderings.
    pub fn short_name(&self) -> &str {
        self.outcome.as_deref().unwrap_or(&self.label)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in outcome order
    pub children: Vec<Index>,
}

/// Directed parent -> child edge.
///
/// `probability` is the cumulative probability of the child, not the
/// single-step probability of the outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEdge {
    pub parent: Index,
    pub child: Index,
    pub probability: f64,
}

/// Probability tree stored in a generational arena.
///
/// Nodes are never removed; the structure is built once and then only read.
#[derive(Debug)]
pub struct ProbabilityTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for ProbabilityTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilityTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            root: None,
        }
    }

    /// Inserts a node under `parent`.
    ///
    /// A parentless node becomes the root only if there is no root yet;
    /// otherwise it stays detached and is reported by depth resolution.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None if self.root.is_none() => self.root = Some(node_idx),
            None => {}
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All stored nodes in insertion order, reachable or not.
    pub fn nodes(&self) -> impl Iterator<Item = (Index, &TreeNode)> {
        self.arena.iter()
    }

    /// Pre-order traversal from the root (siblings left to right).
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Level-order traversal from the root.
    pub fn iter_breadth_first(&self) -> BreadthFirstIterator<'_> {
        BreadthFirstIterator::new(self)
    }

    /// Edges reachable from the root, in pre-order of their child node.
    pub fn edges(&self) -> impl Iterator<Item = TreeEdge> + '_ {
        self.iter().filter_map(|(idx, node)| {
            node.parent.map(|parent| TreeEdge {
                parent,
                child: idx,
                probability: node.data.probability,
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Number of edges on the longest root-to-leaf path (0 for a lone root).
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.into_iter().map(|r| (r, 0)).collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }

        max_depth
    }

    /// Labels of all leaf nodes, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.label.clone())
            .collect()
    }

    pub fn find(&self, label: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.label == label)
            .map(|(idx, _)| idx)
    }

    /// Outcome names from the root down to `idx`.
    pub fn path_to(&self, idx: Index) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self.get_node(idx);
        while let Some(node) = current {
            if let Some(outcome) = node.data.outcome.as_deref() {
                path.push(outcome);
            }
            current = node.parent.and_then(|p| self.get_node(p));
        }
        path.reverse();
        path
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ProbabilityTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ProbabilityTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ProbabilityTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ProbabilityTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

pub struct BreadthFirstIterator<'a> {
    tree: &'a ProbabilityTree,
    queue: VecDeque<Index>,
}

impl<'a> BreadthFirstIterator<'a> {
    fn new(tree: &'a ProbabilityTree) -> Self {
        let mut queue = VecDeque::new();
        if let Some(root) = tree.root() {
            queue.push_back(root);
        }
        Self { tree, queue }
    }
}

impl<'a> Iterator for BreadthFirstIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.queue.pop_front() {
            if let Some(node) = self.tree.get_node(current_idx) {
                self.queue.extend(node.children.iter().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(label: &str, outcome: &str, probability: f64) -> NodeData {
        NodeData {
            label: label.to_string(),
            outcome: Some(outcome.to_string()),
            probability,
        }
    }

    //      root
    //      /  \
    //     a    b
    //     |
    //    aa
    fn small_tree() -> ProbabilityTree {
        let mut tree = ProbabilityTree::new();
        let root = tree.insert_node(NodeData::root("root"), None);
        let a = tree.insert_node(child("root-a", "a", 0.5), Some(root));
        tree.insert_node(child("root-b", "b", 0.5), Some(root));
        tree.insert_node(child("root-a-a", "a", 0.25), Some(a));
        tree
    }

    #[test]
    fn given_tree_when_iterating_then_yields_preorder() {
        let tree = small_tree();
        let labels: Vec<_> = tree.iter().map(|(_, n)| n.data.label.as_str()).collect();
        assert_eq!(labels, vec!["root", "root-a", "root-a-a", "root-b"]);
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_children_come_first() {
        let tree = small_tree();
        let labels: Vec<_> = tree
            .iter_postorder()
            .map(|(_, n)| n.data.label.as_str())
            .collect();
        assert_eq!(labels, vec!["root-a-a", "root-a", "root-b", "root"]);
    }

    #[test]
    fn given_tree_when_iterating_breadth_first_then_yields_levels() {
        let tree = small_tree();
        let labels: Vec<_> = tree
            .iter_breadth_first()
            .map(|(_, n)| n.data.label.as_str())
            .collect();
        assert_eq!(labels, vec!["root", "root-a", "root-b", "root-a-a"]);
    }

    #[test]
    fn given_tree_when_measuring_then_reports_height_edges_and_leaves() {
        let tree = small_tree();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.edge_count(), 3);
        assert_eq!(tree.leaf_nodes(), vec!["root-a-a", "root-b"]);
    }

    #[test]
    fn given_lone_root_when_measuring_then_height_is_zero() {
        let mut tree = ProbabilityTree::new();
        tree.insert_node(NodeData::root("solo"), None);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.edge_count(), 0);
    }

    #[test]
    fn given_second_parentless_node_when_inserting_then_root_is_kept() {
        let mut tree = ProbabilityTree::new();
        let root = tree.insert_node(NodeData::root("first"), None);
        tree.insert_node(NodeData::root("second"), None);
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().count(), 1);
    }

    #[test]
    fn given_deep_node_when_getting_path_then_returns_outcomes_from_root() {
        let tree = small_tree();
        let idx = tree.find("root-a-a").unwrap();
        assert_eq!(tree.path_to(idx), vec!["a", "a"]);
        assert_eq!(tree.path_to(tree.root().unwrap()), Vec::<&str>::new());
    }
}
