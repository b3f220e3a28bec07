//! CSS and jQuery-style selector compiler and matcher for static markup trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector parser** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, id and class selectors
//!   - Attribute selectors with `=`, `~=`, `|=`, `^=`, `$=`, `*=` and the
//!     regex operator `#=`
//!   - Descendant, child, next-sibling and subsequent-sibling combinators
//!   - Selector lists, `/* comments */`, CSS escapes
//!
//! - **Pseudo-classes** ([§ 4](https://www.w3.org/TR/selectors-4/#pseudo-classes))
//!   - `:not`, `:has`, `:hasChild`
//!   - `:nth-child`, `:nth-last-child`, `:nth-of-type`, `:nth-last-of-type`
//!     and the `first`/`last`/`only` shorthands
//!   - `:empty`, `:root`, `:link`, `:enabled`, `:disabled`, `:input`
//!   - `:contains`, `:containsOwn`, `:matches`, `:matchesOwn`
//!
//! - **Querying** over any tree implementing [`TreeNode`]
//!   - [`Selector::match_all`], [`Selector::match_first`], filtering
//!   - The string-based [`NodeExt`] / [`Selection`] convenience layer
//!
//! # Not Yet Implemented
//!
//! - Namespaces, pseudo-elements, `:is()`/`:where()`
//! - Specificity and cascade
//! - Matching against live (mutating) trees
//!
//! # Example
//!
//! ```
//! use sift_dom::TreeBuilder;
//! use sift_select::NodeExt;
//!
//! let mut builder = TreeBuilder::new();
//! builder.open("ul", &[]);
//! builder.element("li", &[("class", "a")]);
//! builder.element("li", &[("class", "b")]);
//! builder.close();
//! let tree = builder.finish();
//!
//! let items = tree.document().find("li:nth-child(2)");
//! assert_eq!(items.attrs("class"), ["b"]);
//! ```

use std::str::FromStr;

/// [`TreeNode`] for `sift_dom::NodeRef`.
mod dom;
/// Parse errors.
pub mod error;
/// String-based convenience API.
pub mod facade;
/// Character classes for identifiers, strings and escapes.
pub mod lexer;
/// The node capability selectors are evaluated against.
pub mod node;
/// Selector parser per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod parser;
/// Injectable regular-expression engine.
pub mod pattern;
/// Matching a compiled selector over trees and node lists.
pub mod query;
/// The compiled selector representation.
pub mod selector;
/// Positional and text matchers per [§ 14](https://www.w3.org/TR/selectors-4/#structural-pseudos).
pub mod structural;

// Re-exports for convenience
pub use error::{ParseError, ParseErrorKind, PatternError};
pub use facade::{NodeExt, Selection};
pub use node::{NodeKind, TreeNode};
pub use parser::Parser;
pub use pattern::{Pattern, PatternCompiler, PatternMatcher, RegexCompiler};
pub use selector::{AttributeMatcher, AttributeSelector, Combinator, NthChild, PseudoClass, Selector};
pub use structural::Nth;

/// Compile `query` into a reusable [`Selector`], using [`RegexCompiler`] for
/// regex operands.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered, or
/// [`ParseErrorKind::UnexpectedToken`] when input remains after a complete
/// selector list.
pub fn compile(query: &str) -> Result<Selector, ParseError> {
    compile_with(query, &RegexCompiler)
}

/// Like [`compile`], but regex operands go through `patterns`.
///
/// # Errors
///
/// See [`compile`]. Patterns `patterns` rejects surface as
/// [`ParseErrorKind::UnexpectedToken`] with the [`PatternError`] as source.
pub fn compile_with(query: &str, patterns: &dyn PatternCompiler) -> Result<Selector, ParseError> {
    let mut parser = Parser::with_patterns(query, patterns);
    let selector = parser.parse_selector_group()?;
    if !parser.is_at_end() {
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedToken,
            parser.position(),
        ));
    }
    Ok(selector)
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        compile(query)
    }
}
