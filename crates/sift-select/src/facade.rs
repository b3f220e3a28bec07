//! jQuery-style convenience layer: query strings in, node lists out.
//!
//! Every call compiles its query afresh. A query that does not compile is
//! not an error here: it matches nothing, and each kind of failure is
//! reported once through [`sift_common::warning::warn_once`]. Warnings name
//! the error kind, never the query text. Use [`crate::compile`] when the
//! error itself matters.

use std::ops::Deref;

use sift_common::warning::warn_once;

use crate::compile;
use crate::node::TreeNode;
use crate::selector::Selector;
use crate::structural;

fn compile_or_warn(query: &str) -> Option<Selector> {
    match compile(query) {
        Ok(selector) => Some(selector),
        Err(err) => {
            warn_once("Select", &format!("ignoring malformed selectors ({})", err.kind));
            None
        }
    }
}

/// Query-string shortcuts available on every [`TreeNode`].
pub trait NodeExt: TreeNode {
    /// Whether this node matches `query`. `false` when it does not compile.
    #[must_use]
    fn matches(&self, query: &str) -> bool {
        compile_or_warn(query).is_some_and(|selector| selector.matches(*self))
    }

    /// Matching descendants of this node, in document order.
    #[must_use]
    fn find(&self, query: &str) -> Selection<Self> {
        compile_or_warn(query)
            .map(|selector| selector.match_all(*self, false))
            .unwrap_or_default()
            .into()
    }

    /// Like [`NodeExt::find`], but this node itself is tested first.
    #[must_use]
    fn find_all(&self, query: &str) -> Selection<Self> {
        compile_or_warn(query)
            .map(|selector| selector.match_all(*self, true))
            .unwrap_or_default()
            .into()
    }

    /// All descendant text, concatenated.
    #[must_use]
    fn text(&self) -> String {
        structural::text(*self)
    }

    /// Text of the direct text children only.
    #[must_use]
    fn own_text(&self) -> String {
        structural::own_text(*self)
    }
}

impl<N: TreeNode> NodeExt for N {}

/// An ordered list of nodes produced by a query.
///
/// Dereferences to a slice, so `len`, `is_empty`, `iter` and indexing work
/// as usual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<N> {
    nodes: Vec<N>,
}

impl<N: TreeNode> Selection<N> {
    /// Wrap an existing node list.
    #[must_use]
    pub const fn new(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    /// Matching descendants of every node, concatenated in selection order.
    /// A node reachable from two members appears twice.
    #[must_use]
    pub fn find(&self, query: &str) -> Self {
        let Some(selector) = compile_or_warn(query) else {
            return Self::default();
        };
        self.nodes
            .iter()
            .flat_map(|node| selector.match_all(*node, false))
            .collect()
    }

    /// The members that match `query`.
    #[must_use]
    pub fn filter(&self, query: &str) -> Self {
        compile_or_warn(query)
            .map(|selector| selector.filter(self.nodes.iter().copied()))
            .unwrap_or_default()
            .into()
    }

    /// The members that do not match `query`. Empty when `query` does not
    /// compile.
    #[must_use]
    pub fn not(&self, query: &str) -> Self {
        compile_or_warn(query)
            .map(|selector| selector.not(self.nodes.iter().copied()))
            .unwrap_or_default()
            .into()
    }

    /// Value of attribute `name` for each member that has it, in order.
    #[must_use]
    pub fn attrs(&self, name: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| node.attribute(name))
            .collect()
    }

    /// Text of every member, concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.nodes.iter().map(|node| structural::text(*node)).collect()
    }

    /// The first member.
    #[must_use]
    pub fn first(&self) -> Option<N> {
        self.nodes.first().copied()
    }

    /// Unwrap into the underlying list.
    #[must_use]
    pub fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

impl<N> Default for Selection<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N> Deref for Selection<N> {
    type Target = [N];

    fn deref(&self) -> &[N] {
        &self.nodes
    }
}

impl<N> From<Vec<N>> for Selection<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self { nodes }
    }
}

impl<N> FromIterator<N> for Selection<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<N> IntoIterator for Selection<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'s, N> IntoIterator for &'s Selection<N> {
    type Item = &'s N;
    type IntoIter = std::slice::Iter<'s, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
