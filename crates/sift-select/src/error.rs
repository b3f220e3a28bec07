//! Parse errors.
//!
//! Matching never fails; everything that can go wrong happens while a query
//! string is compiled.

use thiserror::Error;

/// What went wrong while compiling a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `\` directly followed by a line feed, carriage return or form feed.
    #[error("invalid escape sequence")]
    InvalidEscapeSeq,
    /// An identifier was required (e.g. a type selector or attribute key).
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// A name was required (e.g. after `#` or `.`).
    #[error("expected name")]
    ExpectedName,
    /// A quoted string was required.
    #[error("expected string")]
    ExpectedString,
    /// An integer was required inside an An+B formula.
    #[error("expected number")]
    ExpectedNumber,
    /// A character or keyword that cannot appear here: unknown pseudo-class,
    /// bad attribute operator, unbalanced parentheses, malformed regex, or
    /// input left over after a complete selector.
    #[error("unexpected token")]
    UnexpectedToken,
    /// Input ended in the middle of a rule.
    #[error("unexpected end of input")]
    UnexpectedEOF,
}

/// A selector compile failure with the offset (in characters) where it was
/// detected.
#[derive(Debug, Clone, Error)]
#[error("{kind} at offset {position}")]
pub struct ParseError {
    /// The failure category.
    pub kind: ParseErrorKind,
    /// Character offset of the parser cursor when the error was raised.
    pub position: usize,
    /// The regex engine's complaint, for patterns it refused to compile.
    #[source]
    pub source: Option<PatternError>,
}

impl ParseError {
    /// An error without an underlying cause.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            source: None,
        }
    }
}

/// A regex operand the pattern engine rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern {pattern:?}: {message}")]
pub struct PatternError {
    /// The pattern source as written in the selector.
    pub pattern: String,
    /// The engine's explanation.
    pub message: String,
}
