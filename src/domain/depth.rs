//! Depth resolution: distance of every node from the root.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::ProbabilityTree;
use crate::domain::error::{DomainError, DomainResult};

/// Depth of every reachable node plus the order in which they were discovered.
///
/// Discovery is breadth-first with siblings in outcome order, so filtering
/// `order` by depth yields each band top to bottom.
#[derive(Debug, Clone, Default)]
pub struct DepthMap {
    depths: HashMap<Index, usize>,
    order: Vec<Index>,
}

impl DepthMap {
    pub fn get(&self, idx: Index) -> Option<usize> {
        self.depths.get(&idx).copied()
    }

    /// Nodes in discovery order.
    pub fn order(&self) -> &[Index] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (Index, usize)> + '_ {
        self.order.iter().map(|idx| (*idx, self.depths[idx]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.depths.values().copied().max().unwrap_or(0)
    }
}

/// Computes node depths by walking the tree structure (no general graph search).
pub struct DepthResolver;

impl DepthResolver {
    /// Number of edges from the root to `idx`, counted by walking parent links.
    pub fn depth(tree: &ProbabilityTree, idx: Index) -> DomainResult<usize> {
        let root = tree.root().ok_or(DomainError::MissingRoot)?;
        let disconnected = || {
            DomainError::DisconnectedNode(
                tree.get_node(idx)
                    .map(|n| n.data.label.clone())
                    .unwrap_or_else(|| format!("{idx:?}")),
            )
        };

        let mut hops = 0;
        let mut current = idx;
        while current != root {
            let node = tree.get_node(current).ok_or_else(disconnected)?;
            current = node.parent.ok_or_else(disconnected)?;
            hops += 1;
        }
        Ok(hops)
    }

    /// Depth of every node, computed once with a breadth-first pass from the root.
    ///
    /// Fails if any stored node cannot be reached from the root.
    #[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
    pub fn resolve(tree: &ProbabilityTree) -> DomainResult<DepthMap> {
        tree.root().ok_or(DomainError::MissingRoot)?;

        let mut map = DepthMap {
            depths: HashMap::with_capacity(tree.len()),
            order: Vec::with_capacity(tree.len()),
        };
        for (idx, node) in tree.iter_breadth_first() {
            // parents are yielded before their children
            let depth = node
                .parent
                .and_then(|parent| map.depths.get(&parent))
                .map_or(0, |d| d + 1);
            map.depths.insert(idx, depth);
            map.order.push(idx);
        }

        if map.len() != tree.len() {
            let orphan = tree
                .nodes()
                .find(|(idx, _)| !map.depths.contains_key(idx))
                .map(|(_, node)| node.data.label.clone())
                .unwrap_or_default();
            return Err(DomainError::DisconnectedNode(orphan));
        }

        debug!("resolved {} depths, max depth {}", map.len(), map.max_depth());
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeData;

    fn chain() -> (ProbabilityTree, Vec<Index>) {
        let mut tree = ProbabilityTree::new();
        let root = tree.insert_node(NodeData::root("r"), None);
        let a = tree.insert_node(
            NodeData {
                label: "r-a".into(),
                outcome: Some("a".into()),
                probability: 1.0,
            },
            Some(root),
        );
        let b = tree.insert_node(
            NodeData {
                label: "r-a-b".into(),
                outcome: Some("b".into()),
                probability: 1.0,
            },
            Some(a),
        );
        (tree, vec![root, a, b])
    }

    #[test]
    fn given_chain_when_walking_ancestors_then_counts_hops() {
        let (tree, idx) = chain();
        assert_eq!(DepthResolver::depth(&tree, idx[0]).unwrap(), 0);
        assert_eq!(DepthResolver::depth(&tree, idx[1]).unwrap(), 1);
        assert_eq!(DepthResolver::depth(&tree, idx[2]).unwrap(), 2);
    }

    #[test]
    fn given_chain_when_resolving_then_matches_ancestor_walk() {
        let (tree, _) = chain();
        let depths = DepthResolver::resolve(&tree).unwrap();
        for (idx, depth) in depths.iter() {
            assert_eq!(DepthResolver::depth(&tree, idx).unwrap(), depth);
        }
        assert_eq!(depths.max_depth(), 2);
    }

    #[test]
    fn given_branching_tree_when_resolving_then_order_is_breadth_first() {
        let (mut tree, idx) = chain();
        let side = tree.insert_node(
            NodeData {
                label: "r-c".into(),
                outcome: Some("c".into()),
                probability: 0.0,
            },
            Some(idx[0]),
        );

        let depths = DepthResolver::resolve(&tree).unwrap();

        let bfs: Vec<_> = tree.iter_breadth_first().map(|(i, _)| i).collect();
        assert_eq!(depths.order(), bfs.as_slice());
        assert_eq!(depths.order(), [idx[0], idx[1], side, idx[2]]);
        assert_eq!(depths.get(side), Some(1));
    }

    #[test]
    fn given_detached_node_when_resolving_then_reports_it() {
        let (mut tree, _) = chain();
        let orphan = tree.insert_node(NodeData::root("stray"), None);

        let result = DepthResolver::resolve(&tree);
        assert_eq!(result.unwrap_err(), DomainError::DisconnectedNode("stray".into()));

        let result = DepthResolver::depth(&tree, orphan);
        assert_eq!(result.unwrap_err(), DomainError::DisconnectedNode("stray".into()));
    }

    #[test]
    fn given_empty_tree_when_resolving_then_missing_root() {
        let tree = ProbabilityTree::new();
        assert_eq!(DepthResolver::resolve(&tree).unwrap_err(), DomainError::MissingRoot);
    }
}
