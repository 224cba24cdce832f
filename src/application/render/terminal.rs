use termtree::Tree;

use crate::application::diagram::TreeDiagram;
use crate::application::render::{format_probability, Renderer};
use crate::domain::TreeNode;

/// Indented `termtree` view, one line per node with the probability of the
/// edge leading to it.
///
/// ```text
/// Coin
/// ├── Heads [50.00%]
/// │   ├── Heads [25.00%]
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    full_labels: bool,
}

impl TerminalRenderer {
    pub fn new(full_labels: bool) -> Self {
        Self { full_labels }
    }

    fn node_text(&self, node: &TreeNode) -> String {
        let name = if self.full_labels {
            node.data.label.as_str()
        } else {
            node.data.short_name()
        };
        match node.parent {
            Some(_) => format!("{} [{}]", name, format_probability(node.data.probability)),
            None => name.to_string(),
        }
    }

    /// Converts the arena tree into a `termtree::Tree`.
    ///
    /// Built bottom-up from a post-order walk: when a node is visited, the
    /// subtrees of its children are the last entries on `built`.
    pub fn to_tree(&self, diagram: &TreeDiagram) -> Tree<String> {
        let mut built: Vec<Tree<String>> = Vec::new();

        for (_, node) in diagram.tree.iter_postorder() {
            let first_child = built.len().saturating_sub(node.children.len());
            let leaves = built.split_off(first_child);
            built.push(Tree::new(self.node_text(node)).with_leaves(leaves));
        }

        built
            .pop()
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, diagram: &TreeDiagram) -> String {
        self.to_tree(diagram).to_string()
    }
}
