//! Tree builder: fans outcomes out over repeated trials.

use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, ProbabilityTree};
use crate::domain::entities::{OutcomeSet, DEFAULT_SEPARATOR};
use crate::domain::error::{DomainError, DomainResult};

/// Default ceiling on the number of nodes a single tree may have.
pub const DEFAULT_MAX_NODES: u64 = 100_000;

/// Label storage allowed per permitted node.
///
/// Every node stores its full path label, so label bytes grow with depth as
/// well as with node count; the byte budget is `max_nodes` times this.
pub const LABEL_BYTES_PER_NODE: u64 = 256;

/// Number of nodes in a full `outcomes`-ary tree of depth `trials`:
/// `sum_{d=0}^{trials} outcomes^d`. None on overflow.
pub fn expected_node_count(outcomes: usize, trials: u32) -> Option<u64> {
    let k = u64::try_from(outcomes).ok()?;
    let mut level: u64 = 1;
    let mut total: u64 = 1;
    for _ in 0..trials {
        level = level.checked_mul(k)?;
        total = total.checked_add(level)?;
    }
    Some(total)
}

/// Number of edges in the same tree: every node but the root has one.
pub fn expected_edge_count(outcomes: usize, trials: u32) -> Option<u64> {
    expected_node_count(outcomes, trials).map(|n| n - 1)
}

/// Upper bound on the bytes of all path labels in the tree: a node at depth
/// `d` has `root_len + d * (separator_len + longest_name)` bytes at most.
/// None on overflow.
pub fn expected_label_bytes(
    root_len: usize,
    separator_len: usize,
    longest_name: usize,
    outcomes: usize,
    trials: u32,
) -> Option<u64> {
    let k = u64::try_from(outcomes).ok()?;
    let root = u64::try_from(root_len).ok()?;
    let step = u64::try_from(separator_len.checked_add(longest_name)?).ok()?;

    let mut level: u64 = 1;
    let mut total = root;
    for d in 1..=u64::from(trials) {
        level = level.checked_mul(k)?;
        let label = step.checked_mul(d)?.checked_add(root)?;
        total = total.checked_add(level.checked_mul(label)?)?;
    }
    Some(total)
}

/// Constructs probability trees.
///
/// Construction is exponential in the trial count, so the builder refuses
/// trees larger than `max_nodes`, or whose labels would need more than
/// `max_nodes * LABEL_BYTES_PER_NODE` bytes, before allocating anything.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    separator: String,
    max_nodes: u64,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Build the tree for `trial_count` repetitions of `outcomes` under `root_label`.
    ///
    /// Children are created in outcome order and every edge carries the
    /// cumulative probability of its child. The probability sum of `outcomes`
    /// is not re-checked here.
    #[instrument(level = "debug", skip(self, outcomes), fields(outcomes = outcomes.len()))]
    pub fn build(
        &self,
        root_label: &str,
        outcomes: &OutcomeSet,
        trial_count: u32,
    ) -> DomainResult<ProbabilityTree> {
        let too_large = || DomainError::NodeLimitExceeded {
            outcomes: outcomes.len(),
            trials: trial_count,
            limit: self.max_nodes,
        };

        let node_count = expected_node_count(outcomes.len(), trial_count)
            .filter(|&n| n <= self.max_nodes)
            .ok_or_else(too_large)?;

        let longest_name = outcomes.iter().map(|o| o.name.len()).max().unwrap_or(0);
        let label_bytes = expected_label_bytes(
            root_label.len(),
            self.separator.len(),
            longest_name,
            outcomes.len(),
            trial_count,
        )
        .filter(|&b| b <= self.max_nodes.saturating_mul(LABEL_BYTES_PER_NODE))
        .ok_or_else(too_large)?;
        debug!("building {} nodes, {} label bytes", node_count, label_bytes);

        let capacity = usize::try_from(node_count).unwrap_or(usize::MAX);
        let mut tree = ProbabilityTree::with_capacity(capacity);
        let root = tree.insert_node(NodeData::root(root_label), None);

        // (node, depth); children are inserted when their parent is expanded
        // so that each parent's child list keeps the outcome order
        let mut stack = vec![(root, 0u32)];

        while let Some((current, depth)) = stack.pop() {
            if depth >= trial_count {
                continue;
            }

            let (label, cumulative) = match tree.get_node(current) {
                Some(node) => (node.data.label.clone(), node.data.probability),
                None => continue,
            };

            let children: Vec<_> = outcomes
                .iter()
                .map(|outcome| {
                    let data = NodeData {
                        label: format!("{}{}{}", label, self.separator, outcome.name),
                        outcome: Some(outcome.name.clone()),
                        probability: cumulative * outcome.probability,
                    };
                    tree.insert_node(data, Some(current))
                })
                .collect();

            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Outcome;

    fn coin() -> OutcomeSet {
        OutcomeSet::new(vec![
            Outcome::new("Heads", 0.5).unwrap(),
            Outcome::new("Tails", 0.5).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn given_counts_when_computing_expected_nodes_then_sums_powers() {
        assert_eq!(expected_node_count(2, 0), Some(1));
        assert_eq!(expected_node_count(2, 2), Some(7));
        assert_eq!(expected_node_count(3, 3), Some(40));
        assert_eq!(expected_edge_count(3, 3), Some(39));
        assert_eq!(expected_node_count(1, 5), Some(6));
    }

    #[test]
    fn given_coin_when_computing_label_bytes_then_matches_actual_labels() {
        let tree = TreeBuilder::new().build("Coin", &coin(), 2).unwrap();
        let actual: usize = tree.iter().map(|(_, n)| n.data.label.len()).sum();

        assert_eq!(expected_label_bytes(4, 1, 5, 2, 2), Some(actual as u64));
        assert_eq!(actual, 88);
    }

    #[test]
    fn given_deep_chain_when_computing_label_bytes_then_quadratic_in_depth() {
        // "Chain" + d * "-Sure"
        let bytes = expected_label_bytes(5, 1, 4, 1, 99_999).unwrap();
        assert_eq!(bytes, 5 * 100_000 + 5 * (99_999 * 100_000 / 2));
    }

    #[test]
    fn given_huge_tree_when_computing_expected_nodes_then_overflows_to_none() {
        assert_eq!(expected_node_count(10, 40), None);
    }

    #[test]
    fn given_coin_when_building_then_labels_follow_path() {
        let tree = TreeBuilder::new().build("Coin", &coin(), 2).unwrap();
        let labels: Vec<_> = tree.iter().map(|(_, n)| n.data.label.clone()).collect();
        assert_eq!(
            labels,
            vec![
                "Coin",
                "Coin-Heads",
                "Coin-Heads-Heads",
                "Coin-Heads-Tails",
                "Coin-Tails",
                "Coin-Tails-Heads",
                "Coin-Tails-Tails",
            ]
        );
    }

    #[test]
    fn given_custom_separator_when_building_then_uses_it() {
        let tree = TreeBuilder::new()
            .with_separator(" > ")
            .build("Coin", &coin(), 1)
            .unwrap();
        assert!(tree.find("Coin > Tails").is_some());
    }

    #[test]
    fn given_limit_below_size_when_building_then_errors() {
        let result = TreeBuilder::new().with_max_nodes(6).build("Coin", &coin(), 2);
        assert!(matches!(
            result,
            Err(DomainError::NodeLimitExceeded { limit: 6, trials: 2, .. })
        ));
    }

    #[test]
    fn given_limit_equal_to_size_when_building_then_succeeds() {
        let tree = TreeBuilder::new()
            .with_max_nodes(7)
            .build("Coin", &coin(), 2)
            .unwrap();
        assert_eq!(tree.len(), 7);
    }
}
