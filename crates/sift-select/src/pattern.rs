//! Regular-expression capability used by `#=`, `:matches` and `:matchesOwn`.
//!
//! The parser never talks to a regex engine directly: it hands the scanned
//! operand to a [`PatternCompiler`] and stores the resulting [`Pattern`] in the
//! selector. [`RegexCompiler`] (backed by the `regex` crate) is the default.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::PatternError;

/// A compiled, reusable text matcher.
pub trait PatternMatcher: fmt::Debug + Send + Sync {
    /// Whether the pattern matches anywhere in `haystack`.
    fn is_match(&self, haystack: &str) -> bool;

    /// The pattern source this matcher was compiled from.
    fn as_str(&self) -> &str;
}

/// Turns pattern source text into a [`PatternMatcher`].
pub trait PatternCompiler {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the engine rejects the pattern.
    fn compile(&self, source: &str) -> Result<Pattern, PatternError>;
}

/// Shared handle to a compiled pattern.
///
/// Cloning is cheap; two patterns compare equal when their sources do.
#[derive(Clone)]
pub struct Pattern(Arc<dyn PatternMatcher>);

impl Pattern {
    /// Wrap a matcher.
    #[must_use]
    pub fn new(matcher: impl PatternMatcher + 'static) -> Self {
        Self(Arc::new(matcher))
    }

    /// Whether the pattern matches anywhere in `haystack`.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    /// The pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl PatternMatcher for regex::Regex {
    fn is_match(&self, haystack: &str) -> bool {
        Self::is_match(self, haystack)
    }

    fn as_str(&self) -> &str {
        Self::as_str(self)
    }
}

/// The default engine: [`regex::Regex`] with default options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler;

impl PatternCompiler for RegexCompiler {
    fn compile(&self, source: &str) -> Result<Pattern, PatternError> {
        regex::Regex::new(source)
            .map(Pattern::new)
            .map_err(|err| PatternError {
                pattern: source.to_string(),
                message: err.to_string(),
            })
    }
}
