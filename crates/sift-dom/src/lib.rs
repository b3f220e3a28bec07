//! Static markup tree for the sift selector engine.
//!
//! This crate provides an arena-based tree structure shaped after the
//! [DOM Living Standard](https://dom.spec.whatwg.org/). It is the reference
//! tree that `sift-select` queries; any other tree can be queried as long as it
//! implements the selector crate's node capability.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Queries
//! see nodes through [`NodeRef`], a `Copy` handle pairing the tree with an index.
//! Trees are assembled with [`TreeBuilder`] (or [`DomTree::alloc`] and
//! [`DomTree::append_child`]) and never change once they are being queried.

use std::fmt;
use std::ptr;

/// A type-safe index into the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// "Doctypes have an associated name"
    Doctype(String),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// A single name/value pair. Elements keep them in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "An attribute has a local name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

/// Element-specific data.
///
/// NOTE: We only store the tag name (local name) and the attribute list.
/// Namespaces are not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list", in document order.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data from a tag name and `(name, value)` pairs.
    #[must_use]
    pub fn new(tag_name: &str, attrs: &[(&str, &str)]) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: attrs
                .iter()
                .map(|&(name, value)| Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// Look up an attribute value. HTML attribute names are ASCII
    /// case-insensitive, so `attr("ID")` finds `id="x"`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }
}

/// Arena-based tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent/sibling traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    /// `child` must be freshly allocated (not yet attached anywhere).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Borrow a node as a queryable handle.
    #[must_use]
    pub const fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Handle for the Document node.
    #[must_use]
    pub const fn document(&self) -> NodeRef<'_> {
        self.node(NodeId::ROOT)
    }

    /// The document element: the first element child of the Document node.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeRef<'_>> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .map(|&id| self.node(id))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed handle to one node of a [`DomTree`].
///
/// Two handles are equal only when they point at the same slot of the same
/// tree; structurally identical nodes elsewhere compare unequal.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The arena index of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The node's type and payload.
    #[must_use]
    pub fn node_type(&self) -> Option<&'a NodeType> {
        self.tree.get(self.id).map(|n| &n.node_type)
    }

    /// Element data if this node is an element.
    #[must_use]
    pub fn element(&self) -> Option<&'a ElementData> {
        self.tree.as_element(self.id)
    }

    /// Attributes in document order; empty for non-elements.
    #[must_use]
    pub fn attrs(&self) -> &'a [Attribute] {
        self.element().map_or(&[], |e| e.attrs.as_slice())
    }

    /// Children in document order.
    pub fn child_nodes(self) -> impl Iterator<Item = NodeRef<'a>> {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |&id| tree.node(id))
    }

    /// Parent handle, if any.
    #[must_use]
    pub fn parent_node(&self) -> Option<NodeRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.node(id))
    }

    /// Previous sibling handle, if any.
    #[must_use]
    pub fn prev_sibling_node(&self) -> Option<NodeRef<'a>> {
        self.tree.prev_sibling(self.id).map(|id| self.tree.node(id))
    }

    /// Next sibling handle, if any.
    #[must_use]
    pub fn next_sibling_node(&self) -> Option<NodeRef<'a>> {
        self.tree.next_sibling(self.id).map(|id| self.tree.node(id))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

/// Renders elements as their start tag (`<p id="1">`) and character data as
/// the raw payload, which keeps test expectations readable.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_type() {
            Some(NodeType::Element(data)) => {
                write!(f, "<{}", data.tag_name)?;
                for attr in &data.attrs {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                f.write_str(">")
            }
            Some(NodeType::Text(text) | NodeType::Comment(text) | NodeType::Doctype(text)) => {
                f.write_str(text)
            }
            Some(NodeType::Document) | None => Ok(()),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({}, {self})", self.id.0)
    }
}

/// Incremental tree construction with a stack of open elements.
///
/// Mirrors how a tree constructor appends nodes: content goes into the
/// current node (the most recently opened element that is still open), and
/// `close` pops back to its parent.
///
/// ```
/// use sift_dom::TreeBuilder;
///
/// let mut builder = TreeBuilder::new();
/// builder.open("ul", &[("class", "menu")]);
/// builder.element("li", &[("id", "1")]);
/// builder.close();
/// let tree = builder.finish();
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    tree: DomTree,
    open_elements: Vec<NodeId>,
}

impl TreeBuilder {
    /// Start a new tree containing only the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            open_elements: vec![NodeId::ROOT],
        }
    }

    fn current_node(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn insert(&mut self, node_type: NodeType) -> NodeId {
        let parent = self.current_node();
        let id = self.tree.alloc(node_type);
        self.tree.append_child(parent, id);
        id
    }

    /// Append a doctype node to the current node.
    pub fn doctype(&mut self, name: &str) {
        let _ = self.insert(NodeType::Doctype(name.to_string()));
    }

    /// Append an element and make it the current node.
    pub fn open(&mut self, tag_name: &str, attrs: &[(&str, &str)]) {
        let id = self.insert(NodeType::Element(ElementData::new(tag_name, attrs)));
        self.open_elements.push(id);
    }

    /// Append an element without children.
    pub fn element(&mut self, tag_name: &str, attrs: &[(&str, &str)]) {
        let _ = self.insert(NodeType::Element(ElementData::new(tag_name, attrs)));
    }

    /// Append a text node to the current node.
    pub fn text(&mut self, text: &str) {
        let _ = self.insert(NodeType::Text(text.to_string()));
    }

    /// Append a comment node to the current node.
    pub fn comment(&mut self, text: &str) {
        let _ = self.insert(NodeType::Comment(text.to_string()));
    }

    /// Close the current element. The Document node is never popped.
    pub fn close(&mut self) {
        if self.open_elements.len() > 1 {
            let _ = self.open_elements.pop();
        }
    }

    /// Finish construction; any elements still open are implicitly closed.
    #[must_use]
    pub fn finish(self) -> DomTree {
        self.tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
