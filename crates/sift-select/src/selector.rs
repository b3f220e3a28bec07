//! Selector algebra: the compiled form of a query and how it matches nodes.
//!
//! A [`Selector`] is an immutable tree of conditions. The parser builds it
//! with the constructor functions on [`Selector`] (the same ones callers can
//! use to assemble selectors by hand), and [`Selector::matches`] evaluates it
//! against one node of any [`TreeNode`] tree.

use serde::Serialize;
use strum_macros::Display;

use crate::lexer::is_whitespace;
use crate::node::{NodeKind, TreeNode};
use crate::pattern::Pattern;
use crate::structural::{
    Nth, is_empty_element, is_root_element, nth_child_matches, only_child_matches, own_text, text,
};

/// Tags matched by `:input`.
const INPUT_TAGS: [&str; 4] = ["input", "select", "textarea", "button"];

/// A compiled selector: a pure, reusable test over a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Matches every node. A sequence without qualifiers (`*` or an empty
    /// operand) compiles to this.
    Universal,

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Element with this tag name (stored lower-cased, compared ignoring ASCII
    /// case). Examples: `div`, `p`, `span`
    Type(String),

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Also what `#id` and `.class` compile to.
    Attribute(AttributeSelector),

    /// A pseudo-class such as `:nth-child(2n)` or `:contains("x")`.
    PseudoClass(PseudoClass),

    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    Not(Box<Selector>),

    /// Every selector must match (a compound selector).
    And(Vec<Selector>),

    /// Any selector may match (a selector list, `a, b`).
    Or(Vec<Selector>),

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// `right` must match the node and `left` must match a node related to
    /// it by `combinator`. Chains nest to the left: `a > b c` is
    /// `Complex(Descendant, Complex(Child, a, b), c)`.
    Complex {
        /// How `left` relates to the subject.
        combinator: Combinator,
        /// The selector on the left of the combinator.
        left: Box<Selector>,
        /// The subject selector on the right of the combinator.
        right: Box<Selector>,
    },
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    #[strum(serialize = " ")]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    #[strum(serialize = ">")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    #[strum(serialize = "+")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately)"
    #[strum(serialize = "~")]
    SubsequentSibling,
}

impl Combinator {
    /// Whether some node related to `node` by this combinator matches `left`.
    fn matches_left<N: TreeNode>(self, left: &Selector, node: N) -> bool {
        match self {
            Self::Descendant => node.ancestors().any(|ancestor| left.matches(ancestor)),
            Self::Child => node.parent().is_some_and(|parent| left.matches(parent)),
            // Text and comments between the two siblings are transparent;
            // only the first other sibling is tested.
            Self::NextSibling => node
                .preceding_siblings()
                .find(|sibling| !matches!(sibling.kind(), NodeKind::Text | NodeKind::Comment))
                .is_some_and(|sibling| left.matches(sibling)),
            Self::SubsequentSibling => node
                .preceding_siblings()
                .any(|sibling| left.matches(sibling)),
        }
    }
}

/// An attribute condition: key (lower-cased) plus value test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSelector {
    /// Attribute name, compared ignoring ASCII case.
    pub name: String,
    /// What the value must satisfy.
    pub matcher: AttributeMatcher,
}

impl AttributeSelector {
    /// Element with an attribute called `name` whose value passes `matcher`.
    #[must_use]
    pub fn matches<N: TreeNode>(&self, node: N) -> bool {
        node.is_element()
            && node.attributes().any(|(key, value)| {
                key.eq_ignore_ascii_case(&self.name) && self.matcher.matches_value(value)
            })
    }
}

/// Attribute value tests per [§ 6.1](https://www.w3.org/TR/selectors-4/#attribute-representation)
/// and [§ 6.2](https://www.w3.org/TR/selectors-4/#attribute-substrings), plus `#=`.
/// Value comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeMatcher {
    /// `[attr]` — "Represents an element with the att attribute"
    Exists,
    /// `[attr=value]` — exactly `value`.
    Equals(String),
    /// `[attr~=value]` — "a whitespace-separated list of words, one of which
    /// is exactly 'val'". A value containing whitespace can never match.
    Includes(String),
    /// `[attr|=value]` — exactly `value` or beginning with `value-`.
    DashMatch(String),
    /// `[attr^=value]` — begins with `value`.
    PrefixMatch(String),
    /// `[attr$=value]` — ends with `value`.
    SuffixMatch(String),
    /// `[attr*=value]` — contains `value`.
    SubstringMatch(String),
    /// `[attr#=regex]` — the pattern matches somewhere in the value.
    Regex(Pattern),
}

impl AttributeMatcher {
    /// Test one attribute value.
    #[must_use]
    pub fn matches_value(&self, value: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals(expected) => value == expected,
            Self::Includes(word) => value
                .split(is_whitespace)
                .filter(|token| !token.is_empty())
                .any(|token| token == word),
            Self::DashMatch(prefix) => {
                value == prefix
                    || value
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            Self::PrefixMatch(prefix) => value.starts_with(prefix.as_str()),
            Self::SuffixMatch(suffix) => value.ends_with(suffix.as_str()),
            Self::SubstringMatch(needle) => value.contains(needle.as_str()),
            Self::Regex(pattern) => pattern.is_match(value),
        }
    }
}

/// `:nth-child()` and its variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NthChild {
    /// The An+B formula.
    pub formula: Nth,
    /// Count from the last sibling (`nth-last-*`).
    pub last: bool,
    /// Only count siblings with the same tag (`*-of-type`).
    pub of_type: bool,
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes),
/// including the jQuery-style text and relational extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PseudoClass {
    /// `:nth-child`, `:nth-last-child`, `:nth-of-type`, `:nth-last-of-type`,
    /// and the `:first-*`/`:last-*` shorthands.
    NthChild(NthChild),
    /// `:only-child` (or `:only-of-type` when `of_type` is set).
    OnlyChild {
        /// Only count siblings with the same tag.
        of_type: bool,
    },
    /// `:empty` — no element or text children.
    Empty,
    /// `:input` — `input`, `select`, `textarea` or `button`.
    Input,
    /// `:root` — an element whose parent is not an element.
    Root,
    /// `:link` — `a` or `area` with an `href` attribute.
    Link,
    /// `:enabled` — form control without a `disabled` attribute.
    Enabled,
    /// `:disabled` — form control with a `disabled` attribute.
    Disabled,
    /// `:has(s)` — some descendant matches `s`.
    Has(Box<Selector>),
    /// `:hasChild(s)` — some direct child matches `s`.
    HasChild(Box<Selector>),
    /// `:contains(text)` / `:containsOwn(text)` — case-insensitive substring of
    /// the node's text (or own text). Text and comment nodes match on their
    /// own payload. `text` is stored lower-cased.
    Contains {
        /// The lower-cased needle.
        text: String,
        /// Only look at direct text children.
        own: bool,
    },
    /// `:matches(re)` / `:matchesOwn(re)` — regex over the node's text (or
    /// own text).
    Matches {
        /// The compiled pattern.
        pattern: Pattern,
        /// Only look at direct text children.
        own: bool,
    },
}

impl PseudoClass {
    /// Evaluate against one node.
    #[must_use]
    pub fn matches<N: TreeNode>(&self, node: N) -> bool {
        match self {
            Self::NthChild(nth) => nth_child_matches(node, nth.formula, nth.last, nth.of_type),
            Self::OnlyChild { of_type } => only_child_matches(node, *of_type),
            Self::Empty => is_empty_element(node),
            Self::Input => is_form_control(node),
            Self::Root => is_root_element(node),
            Self::Link => {
                node.tag_name()
                    .is_some_and(|tag| tag.eq_ignore_ascii_case("a") || tag.eq_ignore_ascii_case("area"))
                    && node.attribute("href").is_some()
            }
            Self::Enabled => is_form_control(node) && node.attribute("disabled").is_none(),
            Self::Disabled => is_form_control(node) && node.attribute("disabled").is_some(),
            Self::Has(inner) => node.is_element() && has_descendant_match(node, inner),
            Self::HasChild(inner) => {
                node.is_element() && node.children().any(|child| inner.matches(child))
            }
            Self::Contains { text: needle, own } => {
                scoped_text(node, *own).to_lowercase().contains(needle.as_str())
            }
            Self::Matches { pattern, own } => pattern.is_match(&scoped_text(node, *own)),
        }
    }
}

fn is_form_control<N: TreeNode>(node: N) -> bool {
    node.tag_name()
        .is_some_and(|tag| INPUT_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)))
}

fn scoped_text<N: TreeNode>(node: N, own: bool) -> String {
    if own { own_text(node) } else { text(node) }
}

fn has_descendant_match<N: TreeNode>(node: N, selector: &Selector) -> bool {
    node.children().any(|child| {
        selector.matches(child) || (child.is_element() && has_descendant_match(child, selector))
    })
}

impl Selector {
    /// Evaluate this selector against `node`.
    #[must_use]
    pub fn matches<N: TreeNode>(&self, node: N) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(tag) => node.tag_name().is_some_and(|name| name.eq_ignore_ascii_case(tag)),
            Self::Attribute(attr) => attr.matches(node),
            Self::PseudoClass(pseudo) => pseudo.matches(node),
            Self::Not(inner) => !inner.matches(node),
            Self::And(all) => all.iter().all(|s| s.matches(node)),
            Self::Or(any) => any.iter().any(|s| s.matches(node)),
            Self::Complex {
                combinator,
                left,
                right,
            } => right.matches(node) && combinator.matches_left(left, node),
        }
    }

    /// Element with the given tag name.
    #[must_use]
    pub fn type_selector(tag: &str) -> Self {
        Self::Type(tag.to_lowercase())
    }

    /// Attribute condition; the key is lower-cased.
    #[must_use]
    pub fn attribute(name: &str, matcher: AttributeMatcher) -> Self {
        Self::Attribute(AttributeSelector {
            name: name.to_lowercase(),
            matcher,
        })
    }

    /// `#id`, i.e. `[id=id]`.
    #[must_use]
    pub fn id(id: &str) -> Self {
        Self::attribute("id", AttributeMatcher::Equals(id.to_string()))
    }

    /// `.class`, i.e. `[class~=class]`.
    #[must_use]
    pub fn class(class_name: &str) -> Self {
        Self::attribute("class", AttributeMatcher::Includes(class_name.to_string()))
    }

    /// Both `a` and `b` must match. `Universal` operands are dropped and
    /// nested intersections are flattened.
    #[must_use]
    pub fn intersection(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Universal, other) | (other, Self::Universal) => other,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), right) => {
                left.push(right);
                Self::And(left)
            }
            (left, Self::And(mut right)) => {
                right.insert(0, left);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }

    /// Either `a` or `b` may match. Nested unions are flattened.
    #[must_use]
    pub fn union(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), right) => {
                left.push(right);
                Self::Or(left)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }

    /// Matches exactly when `inner` does not.
    #[must_use]
    pub fn negate(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// `right` related to a node matching `left` by `combinator`.
    #[must_use]
    pub fn combinator(combinator: Combinator, left: Self, right: Self) -> Self {
        Self::Complex {
            combinator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `target` with some strict ancestor matching `ancestor`.
    #[must_use]
    pub fn descendant(ancestor: Self, target: Self) -> Self {
        Self::combinator(Combinator::Descendant, ancestor, target)
    }

    /// `target` whose parent matches `parent`.
    #[must_use]
    pub fn child(parent: Self, target: Self) -> Self {
        Self::combinator(Combinator::Child, parent, target)
    }

    /// `target` preceded by a sibling matching `sibling`: the nearest
    /// non-text, non-comment one when `adjacent`, any of them otherwise.
    #[must_use]
    pub fn sibling(sibling: Self, target: Self, adjacent: bool) -> Self {
        let combinator = if adjacent {
            Combinator::NextSibling
        } else {
            Combinator::SubsequentSibling
        };
        Self::combinator(combinator, sibling, target)
    }

    /// Positional test; see [`nth_child_matches`].
    #[must_use]
    pub const fn nth_child(formula: Nth, last: bool, of_type: bool) -> Self {
        Self::PseudoClass(PseudoClass::NthChild(NthChild {
            formula,
            last,
            of_type,
        }))
    }

    /// `:only-child` / `:only-of-type`.
    #[must_use]
    pub const fn only_child(of_type: bool) -> Self {
        Self::PseudoClass(PseudoClass::OnlyChild { of_type })
    }

    /// `:empty`.
    #[must_use]
    pub const fn empty() -> Self {
        Self::PseudoClass(PseudoClass::Empty)
    }

    /// `:input`.
    #[must_use]
    pub const fn input() -> Self {
        Self::PseudoClass(PseudoClass::Input)
    }

    /// `:root`.
    #[must_use]
    pub const fn root() -> Self {
        Self::PseudoClass(PseudoClass::Root)
    }

    /// `:link`.
    #[must_use]
    pub const fn link() -> Self {
        Self::PseudoClass(PseudoClass::Link)
    }

    /// `:enabled`.
    #[must_use]
    pub const fn enabled() -> Self {
        Self::PseudoClass(PseudoClass::Enabled)
    }

    /// `:disabled`.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::PseudoClass(PseudoClass::Disabled)
    }

    /// `:has(inner)`.
    #[must_use]
    pub fn has_descendant(inner: Self) -> Self {
        Self::PseudoClass(PseudoClass::Has(Box::new(inner)))
    }

    /// `:hasChild(inner)`.
    #[must_use]
    pub fn has_child(inner: Self) -> Self {
        Self::PseudoClass(PseudoClass::HasChild(Box::new(inner)))
    }

    /// `:contains(text)` or, with `own`, `:containsOwn(text)`.
    #[must_use]
    pub fn contains(needle: &str, own: bool) -> Self {
        Self::PseudoClass(PseudoClass::Contains {
            text: needle.to_lowercase(),
            own,
        })
    }

    /// `:matches(pattern)` or, with `own`, `:matchesOwn(pattern)`.
    #[must_use]
    pub const fn text_matches(pattern: Pattern, own: bool) -> Self {
        Self::PseudoClass(PseudoClass::Matches { pattern, own })
    }
}
