//! Structural and text matchers.
//!
//! [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
//! plus the text aggregation behind `:contains` and `:matches`.

use serde::Serialize;

use crate::node::{NodeKind, TreeNode};

/// [§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
///
/// "The :nth-child(An+B [of S]? ) pseudo-class notation represents elements
/// that are among An+Bth elements from the list composed of their inclusive
/// siblings that match the selector list S"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Nth {
    /// Step between matching positions.
    pub a: i64,
    /// Offset of the first matching position.
    pub b: i64,
}

impl Nth {
    /// `odd`: positions 1, 3, 5, ...
    pub const ODD: Self = Self { a: 2, b: 1 };
    /// `even`: positions 2, 4, 6, ...
    pub const EVEN: Self = Self { a: 2, b: 0 };
    /// The first position only; what `:first-child` and friends mean.
    pub const FIRST: Self = Self { a: 0, b: 1 };

    /// Formula `a·n + b`.
    #[must_use]
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Whether 1-based `position` equals `a·n + b` for some `n >= 0`.
    #[must_use]
    pub const fn matches(self, position: i64) -> bool {
        let Some(offset) = position.checked_sub(self.b) else {
            return false;
        };
        if self.a == 0 {
            return offset == 0;
        }
        match (offset.checked_rem(self.a), offset.checked_div(self.a)) {
            (Some(rem), Some(n)) => rem == 0 && n >= 0,
            _ => false,
        }
    }
}

fn same_type<N: TreeNode>(a: &N, b: &N) -> bool {
    a.tag_name() == b.tag_name()
}

/// Whether `node`'s position among its parent's element children satisfies
/// `formula`. `last` counts from the end; `of_type` only counts siblings with
/// the same tag name. Nodes without a parent never match.
#[must_use]
pub fn nth_child_matches<N: TreeNode>(node: N, formula: Nth, last: bool, of_type: bool) -> bool {
    if !node.is_element() {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };

    let mut position = None;
    let mut count: i64 = 0;
    for sibling in parent.children() {
        if !sibling.is_element() || (of_type && !same_type(&sibling, &node)) {
            continue;
        }
        count += 1;
        if sibling == node {
            position = Some(count);
            if !last {
                break;
            }
        }
    }

    let Some(mut position) = position else {
        return false;
    };
    if last {
        position = count - position + 1;
    }
    formula.matches(position)
}

/// [§ 14.3.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
///
/// "The :only-child pseudo-class represents an element that has no siblings."
/// With `of_type`, only siblings sharing the tag name count.
#[must_use]
pub fn only_child_matches<N: TreeNode>(node: N, of_type: bool) -> bool {
    if !node.is_element() {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };
    parent
        .children()
        .filter(|sibling| sibling.is_element() && (!of_type || same_type(sibling, &node)))
        .take(2)
        .count()
        == 1
}

/// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
///
/// An element with no element or text children. Comments and other node
/// kinds are ignored; whitespace-only text still counts as content.
#[must_use]
pub fn is_empty_element<N: TreeNode>(node: N) -> bool {
    node.is_element()
        && !node
            .children()
            .any(|child| matches!(child.kind(), NodeKind::Element | NodeKind::Text))
}

/// Whether the element's parent is not itself an element.
#[must_use]
pub fn is_root_element<N: TreeNode>(node: N) -> bool {
    node.is_element() && !node.parent().is_some_and(|parent| parent.is_element())
}

/// All descendant text, concatenated in document order.
///
/// Only text-node children of elements contribute; comments nested inside an
/// element do not. For a text, comment or doctype node this is its own
/// payload.
#[must_use]
pub fn text<N: TreeNode>(node: N) -> String {
    let mut result = String::new();
    collect_text(node, &mut result);
    result
}

fn collect_text<N: TreeNode>(node: N, out: &mut String) {
    match node.kind() {
        NodeKind::Text | NodeKind::Comment | NodeKind::Doctype => out.push_str(node.text_content()),
        NodeKind::Element | NodeKind::Document => {
            for child in node.children() {
                match child.kind() {
                    NodeKind::Text => out.push_str(child.text_content()),
                    NodeKind::Element => collect_text(child, out),
                    _ => {}
                }
            }
        }
        NodeKind::Error => {}
    }
}

/// Text of the direct text-node children only.
#[must_use]
pub fn own_text<N: TreeNode>(node: N) -> String {
    node.children()
        .filter(|child| child.kind() == NodeKind::Text)
        .fold(String::new(), |mut acc, child| {
            acc.push_str(child.text_content());
            acc
        })
}
