//! The node capability the selector engine consumes.
//!
//! Selectors are evaluated over any tree whose node handles implement
//! [`TreeNode`]. Handles are small `Copy` values (an arena index plus a tree
//! reference, a pointer, ...) and compare by identity.

use strum_macros::Display;

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    /// A tag with attributes and children.
    Element,
    /// Character data.
    Text,
    /// A comment.
    Comment,
    /// The document root.
    Document,
    /// A `<!DOCTYPE>` declaration.
    Doctype,
    /// Anything the tree could not classify.
    Error,
}

/// Read-only navigation over a static tree.
///
/// `PartialEq` must be identity: two handles are equal only when they refer
/// to the same node.
pub trait TreeNode: Copy + PartialEq {
    /// The node's kind.
    fn kind(&self) -> NodeKind;

    /// The tag name, for elements only.
    fn tag_name(&self) -> Option<&str>;

    /// The literal payload of text-bearing nodes; empty for elements and the
    /// document.
    fn text_content(&self) -> &str;

    /// Attributes as `(name, value)` pairs in document order.
    fn attributes(&self) -> impl Iterator<Item = (&str, &str)>;

    /// Value of the first attribute whose name matches ignoring ASCII case.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Children in document order.
    fn children(&self) -> impl Iterator<Item = Self>;

    /// The parent node, if any.
    fn parent(&self) -> Option<Self>;

    /// The sibling immediately before this node.
    fn previous_sibling(&self) -> Option<Self>;

    /// The sibling immediately after this node.
    fn next_sibling(&self) -> Option<Self>;

    /// Whether this node is an element.
    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    /// Iterate over all ancestors of a node, from parent to root.
    fn ancestors(&self) -> Ancestors<Self> {
        Ancestors {
            current: self.parent(),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    fn preceding_siblings(&self) -> PrecedingSiblings<Self> {
        PrecedingSiblings {
            current: self.previous_sibling(),
        }
    }
}

/// Iterator over ancestors of a node.
#[derive(Debug, Clone)]
pub struct Ancestors<N> {
    current: Option<N>,
}

impl<N: TreeNode> Iterator for Ancestors<N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.parent();
        Some(node)
    }
}

/// Iterator over preceding siblings of a node.
#[derive(Debug, Clone)]
pub struct PrecedingSiblings<N> {
    current: Option<N>,
}

impl<N: TreeNode> Iterator for PrecedingSiblings<N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.previous_sibling();
        Some(node)
    }
}
