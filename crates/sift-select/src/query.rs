//! Running a compiled [`Selector`] over a tree or a list of nodes.
//!
//! Traversal is pre-order, children in document order, so results always come
//! back in document order. A match does not stop the walk: descendants of a
//! matching node are searched too.

use crate::node::TreeNode;
use crate::selector::Selector;

impl Selector {
    /// Every matching node under `root`, in document order. `root` itself is
    /// tested only when `include_self` is set.
    #[must_use]
    pub fn match_all<N: TreeNode>(&self, root: N, include_self: bool) -> Vec<N> {
        let mut found = Vec::new();
        if include_self && self.matches(root) {
            found.push(root);
        }
        self.collect_descendants(root, &mut found);
        found
    }

    fn collect_descendants<N: TreeNode>(&self, node: N, found: &mut Vec<N>) {
        for child in node.children() {
            if self.matches(child) {
                found.push(child);
            }
            self.collect_descendants(child, found);
        }
    }

    /// The first match in document order, testing `root` itself first.
    #[must_use]
    pub fn match_first<N: TreeNode>(&self, root: N) -> Option<N> {
        if self.matches(root) {
            return Some(root);
        }
        root.children().find_map(|child| self.match_first(child))
    }

    /// The nodes that match, in their original order.
    #[must_use]
    pub fn filter<N: TreeNode>(&self, nodes: impl IntoIterator<Item = N>) -> Vec<N> {
        nodes.into_iter().filter(|node| self.matches(*node)).collect()
    }

    /// The nodes that do not match, in their original order.
    #[must_use]
    pub fn not<N: TreeNode>(&self, nodes: impl IntoIterator<Item = N>) -> Vec<N> {
        nodes.into_iter().filter(|node| !self.matches(*node)).collect()
    }
}
