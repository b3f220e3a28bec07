//! [`TreeNode`] for the arena tree in `sift-dom`.

use sift_dom::{Attribute, NodeRef, NodeType};

use crate::node::{NodeKind, TreeNode};

impl TreeNode for NodeRef<'_> {
    fn kind(&self) -> NodeKind {
        match self.node_type() {
            Some(NodeType::Element(_)) => NodeKind::Element,
            Some(NodeType::Text(_)) => NodeKind::Text,
            Some(NodeType::Comment(_)) => NodeKind::Comment,
            Some(NodeType::Document) => NodeKind::Document,
            Some(NodeType::Doctype(_)) => NodeKind::Doctype,
            None => NodeKind::Error,
        }
    }

    fn tag_name(&self) -> Option<&str> {
        self.element().map(|e| e.tag_name.as_str())
    }

    fn text_content(&self) -> &str {
        match self.node_type() {
            Some(NodeType::Text(text) | NodeType::Comment(text) | NodeType::Doctype(text)) => {
                text.as_str()
            }
            _ => "",
        }
    }

    fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        let attrs: &[Attribute] = self.attrs();
        attrs
            .iter()
            .map(|attr| (attr.name.as_str(), attr.value.as_str()))
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.element().and_then(|e| e.attr(name))
    }

    fn children(&self) -> impl Iterator<Item = Self> {
        self.child_nodes()
    }

    fn parent(&self) -> Option<Self> {
        self.parent_node()
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.prev_sibling_node()
    }

    fn next_sibling(&self) -> Option<Self> {
        self.next_sibling_node()
    }
}
