//! Recursive-descent selector parser.
//!
//! The grammar is the [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! subset jQuery-style engines accept, plus the text and relational
//! extensions (`:contains`, `:matches`, `:has`, `:hasChild`) and the `#=`
//! regex attribute operator:
//!
//! ```text
//! group     := selector ("," selector)*
//! selector  := sequence (combinator sequence)*
//! sequence  := ("*" | type)? (id | class | attribute | pseudo)*
//! ```
//!
//! The parser works on a `Vec<char>` with a cursor, one character of
//! lookahead at a time. Errors report the cursor offset in characters.

use std::str::FromStr;

use strum_macros::EnumString;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{is_hex_digit, is_name_char, is_name_start, is_newline, is_whitespace};
use crate::pattern::{Pattern, PatternCompiler, RegexCompiler};
use crate::selector::{AttributeMatcher, Combinator, Selector};
use crate::structural::Nth;

/// Pseudo-class names the parser knows, matched after lower-casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum PseudoName {
    Not,
    Has,
    #[strum(serialize = "haschild")]
    HasChild,
    Contains,
    #[strum(serialize = "containsown")]
    ContainsOwn,
    Matches,
    #[strum(serialize = "matchesown")]
    MatchesOwn,
    NthChild,
    NthLastChild,
    NthOfType,
    NthLastOfType,
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    OnlyChild,
    OnlyOfType,
    Input,
    Empty,
    Root,
    Link,
    Enabled,
    Disabled,
}

/// Attribute value operators: `=`, `~=`, `|=`, `^=`, `$=`, `*=`, `#=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOperator {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
    Regex,
}

impl AttributeOperator {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '~' => Some(Self::Includes),
            '|' => Some(Self::DashMatch),
            '^' => Some(Self::Prefix),
            '$' => Some(Self::Suffix),
            '*' => Some(Self::Substring),
            '#' => Some(Self::Regex),
            _ => None,
        }
    }

    /// Build the matcher for a string operand. `Regex` operands are compiled
    /// separately and never reach this.
    fn with_value(self, value: String) -> AttributeMatcher {
        match self {
            Self::Equals | Self::Regex => AttributeMatcher::Equals(value),
            Self::Includes => AttributeMatcher::Includes(value),
            Self::DashMatch => AttributeMatcher::DashMatch(value),
            Self::Prefix => AttributeMatcher::PrefixMatch(value),
            Self::Suffix => AttributeMatcher::SuffixMatch(value),
            Self::Substring => AttributeMatcher::SubstringMatch(value),
        }
    }
}

/// Cursor over a selector string.
///
/// The public `parse_*` methods each consume one grammar production starting
/// at the cursor and leave the cursor just after it. On error the cursor
/// position is unspecified; a parser is not meant to be reused after a
/// failure.
pub struct Parser<'p> {
    /// The selector text, as characters.
    input: Vec<char>,
    /// Current offset into `input`.
    position: usize,
    /// Compiles `#=` and `:matches` operands.
    patterns: &'p dyn PatternCompiler,
}

impl Parser<'static> {
    /// Create a parser that compiles regex operands with [`RegexCompiler`].
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self::with_patterns(input, &RegexCompiler)
    }
}

impl<'p> Parser<'p> {
    /// Create a parser with a custom pattern engine.
    #[must_use]
    pub fn with_patterns(input: impl Into<String>, patterns: &'p dyn PatternCompiler) -> Self {
        Self {
            input: input.into().chars().collect(),
            position: 0,
            patterns,
        }
    }

    /// Current cursor offset, in characters.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Whether the whole input has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// A comma-separated list of selectors; the result matches when any of
    /// them does. Stops before a `)` or anything that cannot continue the
    /// list.
    ///
    /// # Errors
    ///
    /// Propagates the first error from any selector in the list.
    pub fn parse_selector_group(&mut self) -> Result<Selector, ParseError> {
        let mut result = self.parse_selector()?;
        while self.peek() == Some(',') {
            self.advance(1);
            let next = self.parse_selector()?;
            result = Selector::union(result, next);
        }
        Ok(result)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Simple-selector sequences joined by combinators, grouped to the left.
    /// Whitespace alone is the descendant combinator; whitespace around `>`,
    /// `+` and `~` is ignored.
    ///
    /// # Errors
    ///
    /// Fails when a combinator is not followed by a sequence, or when a
    /// sequence fails.
    pub fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        self.skip_whitespace();
        let mut result = self.parse_simple_selector_sequence()?;

        loop {
            let before = self.position;
            self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',' | ')') => return Ok(result),
                Some('>') => self.explicit_combinator(Combinator::Child),
                Some('+') => self.explicit_combinator(Combinator::NextSibling),
                Some('~') => self.explicit_combinator(Combinator::SubsequentSibling),
                Some(_) if self.position > before => Combinator::Descendant,
                Some(_) => return Ok(result),
            };
            let right = self.parse_simple_selector_sequence()?;
            result = Selector::combinator(combinator, result, right);
        }
    }

    fn explicit_combinator(&mut self, combinator: Combinator) -> Combinator {
        self.advance(1);
        self.skip_whitespace();
        combinator
    }

    /// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#structure)
    ///
    /// An optional type or universal selector followed by any number of id,
    /// class, attribute and pseudo-class qualifiers, all of which must match.
    /// A sequence with no conditions at all is the universal selector.
    ///
    /// # Errors
    ///
    /// `UnexpectedEOF` at end of input; otherwise whatever the first failing
    /// qualifier reports.
    pub fn parse_simple_selector_sequence(&mut self) -> Result<Selector, ParseError> {
        let mut result = match self.peek() {
            None => return Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some('*') => {
                self.advance(1);
                Selector::Universal
            }
            Some('#' | '.' | '[' | ':') => Selector::Universal,
            Some(_) => self.parse_type_selector()?,
        };

        loop {
            let qualifier = match self.peek() {
                Some('#') => self.parse_id_selector()?,
                Some('.') => self.parse_class_selector()?,
                Some('[') => self.parse_attribute_selector()?,
                Some(':') => self.parse_pseudo_class_selector()?,
                _ => break,
            };
            result = Selector::intersection(result, qualifier);
        }
        Ok(result)
    }

    fn parse_type_selector(&mut self) -> Result<Selector, ParseError> {
        let tag = self.parse_identifier()?;
        Ok(Selector::type_selector(&tag))
    }

    fn parse_id_selector(&mut self) -> Result<Selector, ParseError> {
        self.advance(1);
        let id = self.parse_name()?;
        Ok(Selector::id(&id))
    }

    fn parse_class_selector(&mut self) -> Result<Selector, ParseError> {
        self.advance(1);
        let class_name = self.parse_name()?;
        Ok(Selector::class(&class_name))
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn parse_attribute_selector(&mut self) -> Result<Selector, ParseError> {
        self.advance(1);
        self.skip_whitespace();
        let key = self.parse_identifier()?;
        self.skip_whitespace();

        match self.peek() {
            None => return Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some(']') => {
                self.advance(1);
                return Ok(Selector::attribute(&key, AttributeMatcher::Exists));
            }
            Some(_) => {}
        }

        let operator = self.parse_attribute_operator()?;
        self.skip_whitespace();

        let matcher = if operator == AttributeOperator::Regex {
            AttributeMatcher::Regex(self.parse_regex()?)
        } else {
            let value = match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEOF)),
                Some('"' | '\'') => self.parse_string()?,
                Some(_) => self.parse_identifier()?,
            };
            operator.with_value(value)
        };

        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some(']') => {
                self.advance(1);
                Ok(Selector::attribute(&key, matcher))
            }
            Some(_) => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    fn parse_attribute_operator(&mut self) -> Result<AttributeOperator, ParseError> {
        let Some(first) = self.peek() else {
            return Err(self.error(ParseErrorKind::UnexpectedEOF));
        };
        if first == '=' {
            self.advance(1);
            return Ok(AttributeOperator::Equals);
        }
        let Some(operator) = AttributeOperator::from_symbol(first) else {
            return Err(self.error(ParseErrorKind::UnexpectedToken));
        };
        match self.peek_at(1) {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some('=') => {
                self.advance(2);
                Ok(operator)
            }
            Some(_) => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Names are case-insensitive, so `:containsOwn` and `:containsown` are
    /// the same pseudo-class.
    fn parse_pseudo_class_selector(&mut self) -> Result<Selector, ParseError> {
        self.advance(1);
        let start = self.position;
        let name = self.parse_identifier()?.to_lowercase();
        let Ok(pseudo) = PseudoName::from_str(&name) else {
            return Err(ParseError::new(ParseErrorKind::UnexpectedToken, start));
        };

        let selector = match pseudo {
            PseudoName::Not | PseudoName::Has | PseudoName::HasChild => {
                self.expect_open_parenthesis()?;
                let inner = self.parse_selector_group()?;
                self.expect_closing_parenthesis()?;
                match pseudo {
                    PseudoName::Not => Selector::negate(inner),
                    PseudoName::Has => Selector::has_descendant(inner),
                    _ => Selector::has_child(inner),
                }
            }
            PseudoName::Contains | PseudoName::ContainsOwn => {
                self.expect_open_parenthesis()?;
                let needle = match self.peek() {
                    None => return Err(self.error(ParseErrorKind::UnexpectedEOF)),
                    Some('"' | '\'') => self.parse_string()?,
                    Some(_) => self.parse_identifier()?,
                };
                self.expect_closing_parenthesis()?;
                Selector::contains(&needle, pseudo == PseudoName::ContainsOwn)
            }
            PseudoName::Matches | PseudoName::MatchesOwn => {
                self.expect_open_parenthesis()?;
                let pattern = self.parse_regex()?;
                self.expect_closing_parenthesis()?;
                Selector::text_matches(pattern, pseudo == PseudoName::MatchesOwn)
            }
            PseudoName::NthChild
            | PseudoName::NthLastChild
            | PseudoName::NthOfType
            | PseudoName::NthLastOfType => {
                self.expect_open_parenthesis()?;
                let formula = self.parse_nth()?;
                self.expect_closing_parenthesis()?;
                let last = matches!(pseudo, PseudoName::NthLastChild | PseudoName::NthLastOfType);
                let of_type = matches!(pseudo, PseudoName::NthOfType | PseudoName::NthLastOfType);
                Selector::nth_child(formula, last, of_type)
            }
            PseudoName::FirstChild => Selector::nth_child(Nth::FIRST, false, false),
            PseudoName::LastChild => Selector::nth_child(Nth::FIRST, true, false),
            PseudoName::FirstOfType => Selector::nth_child(Nth::FIRST, false, true),
            PseudoName::LastOfType => Selector::nth_child(Nth::FIRST, true, true),
            PseudoName::OnlyChild => Selector::only_child(false),
            PseudoName::OnlyOfType => Selector::only_child(true),
            PseudoName::Input => Selector::input(),
            PseudoName::Empty => Selector::empty(),
            PseudoName::Root => Selector::root(),
            PseudoName::Link => Selector::link(),
            PseudoName::Enabled => Selector::enabled(),
            PseudoName::Disabled => Selector::disabled(),
        };
        Ok(selector)
    }

    /// [§ 6.6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
    ///
    /// Accepts `odd`, `even`, `B`, `An`, `An+B`, `An-B`, `n`, `-n+B`, with
    /// optional whitespace around the sign of `B`. Numbers must fit in 32
    /// bits.
    ///
    /// # Errors
    ///
    /// `UnexpectedEOF` at end of input, `ExpectedNumber` when a sign is not
    /// followed by digits, `UnexpectedToken` for anything else.
    pub fn parse_nth(&mut self) -> Result<Nth, ParseError> {
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some('-') => {
                self.advance(1);
                self.parse_nth_signed(-1)
            }
            Some('+') => {
                self.advance(1);
                self.parse_nth_signed(1)
            }
            Some(c) if c.is_ascii_digit() => self.parse_nth_signed(1),
            Some('n' | 'N') => {
                self.advance(1);
                Ok(Nth::new(1, self.parse_nth_offset()?))
            }
            Some('o' | 'O' | 'e' | 'E') => {
                let start = self.position;
                match self.parse_name()?.to_lowercase().as_str() {
                    "odd" => Ok(Nth::ODD),
                    "even" => Ok(Nth::EVEN),
                    _ => Err(ParseError::new(ParseErrorKind::UnexpectedToken, start)),
                }
            }
            Some(_) => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    /// After an optional sign: either `<digits>` (then maybe `n`) or `n`.
    fn parse_nth_signed(&mut self, sign: i64) -> Result<Nth, ParseError> {
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some(c) if c.is_ascii_digit() => {
                let coefficient = sign * self.parse_integer()?;
                match self.peek() {
                    None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
                    Some('n' | 'N') => {
                        self.advance(1);
                        Ok(Nth::new(coefficient, self.parse_nth_offset()?))
                    }
                    Some(_) => Ok(Nth::new(0, coefficient)),
                }
            }
            Some('n' | 'N') => {
                self.advance(1);
                Ok(Nth::new(sign, self.parse_nth_offset()?))
            }
            Some(_) => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    /// The `±B` part following `n`; zero when absent.
    fn parse_nth_offset(&mut self) -> Result<i64, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some(sign @ ('+' | '-')) => {
                self.advance(1);
                self.skip_whitespace();
                let offset = self.parse_integer()?;
                Ok(if sign == '-' { -offset } else { offset })
            }
            Some(_) => Ok(0),
        }
    }

    /// Unsigned decimal digits that fit in an `i32`.
    fn parse_integer(&mut self) -> Result<i64, ParseError> {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
        let digits: String = self.input[start..self.position].iter().collect();
        digits
            .parse::<i32>()
            .map(i64::from)
            .map_err(|_| ParseError::new(ParseErrorKind::ExpectedNumber, start))
    }

    /// An identifier: optional `-`, then a name-start character or an escape,
    /// then the rest of a name.
    ///
    /// # Errors
    ///
    /// `ExpectedIdentifier` when the first character cannot start one;
    /// escape errors propagate.
    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let dashed = self.peek() == Some('-');
        if dashed {
            self.advance(1);
        }
        match self.peek() {
            Some(c) if is_name_start(c) || c == '\\' => {}
            _ => return Err(self.error(ParseErrorKind::ExpectedIdentifier)),
        }
        let name = self.parse_name()?;
        Ok(if dashed { format!("-{name}") } else { name })
    }

    /// A run of name characters and escapes.
    ///
    /// # Errors
    ///
    /// `ExpectedName` when the run is empty; escape errors propagate.
    pub fn parse_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if is_name_char(c) => {
                    name.push(c);
                    self.advance(1);
                }
                Some('\\') => name.push(self.parse_escape()?),
                _ => break,
            }
        }
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedName));
        }
        Ok(name)
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The cursor must be on a `\`. One to six hex digits decode to that code
    /// point, consuming a single whitespace character after them (`\r\n`
    /// counts as one). Zero, surrogates and values past U+10FFFF become
    /// U+FFFD. Any other character stands for itself.
    ///
    /// # Errors
    ///
    /// `InvalidEscapeSeq` when the `\` is followed by a newline,
    /// `UnexpectedEOF` when it ends the input.
    pub fn parse_escape(&mut self) -> Result<char, ParseError> {
        if self.peek() != Some('\\') {
            return Err(self.error(ParseErrorKind::UnexpectedToken));
        }
        let Some(c) = self.peek_at(1) else {
            return Err(self.error(ParseErrorKind::UnexpectedEOF));
        };
        if is_newline(c) {
            return Err(self.error(ParseErrorKind::InvalidEscapeSeq));
        }
        if !is_hex_digit(c) {
            self.advance(2);
            return Ok(c);
        }

        self.advance(1);
        let start = self.position;
        while self.position - start < 6 && self.peek().is_some_and(is_hex_digit) {
            self.advance(1);
        }
        let code_point = self.input[start..self.position]
            .iter()
            .filter_map(|digit| digit.to_digit(16))
            .fold(0_u32, |acc, digit| acc * 16 + digit);

        match self.peek() {
            Some('\r') if self.peek_at(1) == Some('\n') => self.advance(2),
            Some(c) if is_whitespace(c) => self.advance(1),
            _ => {}
        }

        if code_point == 0 {
            return Ok(char::REPLACEMENT_CHARACTER);
        }
        Ok(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// A `"` or `'` quoted string. A `\` before a line break joins the lines;
    /// other escapes decode as in [`Parser::parse_escape`].
    ///
    /// # Errors
    ///
    /// `ExpectedString` when there is no opening quote (or nothing after it),
    /// `UnexpectedToken` on an unescaped line break, `UnexpectedEOF` when the
    /// closing quote is missing.
    pub fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = match self.peek() {
            Some(c @ ('"' | '\'')) if self.peek_at(1).is_some() => c,
            _ => return Err(self.error(ParseErrorKind::ExpectedString)),
        };
        self.advance(1);

        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEOF)),
                Some(c) if c == quote => {
                    self.advance(1);
                    return Ok(value);
                }
                Some('\\') => match self.peek_at(1) {
                    Some('\r') if self.peek_at(2) == Some('\n') => self.advance(3),
                    Some(c) if is_newline(c) => self.advance(2),
                    _ => value.push(self.parse_escape()?),
                },
                Some(c) if is_newline(c) => {
                    return Err(self.error(ParseErrorKind::UnexpectedToken));
                }
                Some(c) => {
                    value.push(c);
                    self.advance(1);
                }
            }
        }
    }

    /// A regex operand: everything up to the first `)` or `]` that closes
    /// more brackets than were opened. Brackets are counted without regard
    /// to escaping.
    fn parse_regex(&mut self) -> Result<Pattern, ParseError> {
        let start = self.position;
        if self.input.len() < start + 2 {
            return Err(self.error(ParseErrorKind::UnexpectedEOF));
        }

        let mut depth: i32 = 0;
        let mut end = start;
        while let Some(&c) = self.input.get(end) {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => {
                    depth -= 1;
                    if depth < 0 {
                        break;
                    }
                }
                _ => {}
            }
            end += 1;
        }
        if end >= self.input.len() {
            return Err(ParseError::new(ParseErrorKind::UnexpectedEOF, end));
        }

        let source: String = self.input[start..end].iter().collect();
        let pattern = self.patterns.compile(&source).map_err(|err| ParseError {
            kind: ParseErrorKind::UnexpectedToken,
            position: start,
            source: Some(err),
        })?;
        self.position = end;
        Ok(pattern)
    }

    /// Skip whitespace and `/* ... */` comments. An unterminated comment is
    /// left in place.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(c) if is_whitespace(c) => self.advance(1),
                Some('/') if self.peek_at(1) == Some('*') => match self.comment_end() {
                    Some(end) => self.position = end,
                    None => return,
                },
                _ => return,
            }
        }
    }

    /// Offset just past the `*/` closing the comment at the cursor.
    fn comment_end(&self) -> Option<usize> {
        let body = self.position + 2;
        self.input[body..]
            .windows(2)
            .position(|pair| matches!(pair, ['*', '/']))
            .map(|offset| body + offset + 2)
    }

    /// Consume `(` plus trailing whitespace.
    fn expect_open_parenthesis(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some('(') => {
                self.advance(1);
                self.skip_whitespace();
                Ok(())
            }
            Some(_) => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    /// Consume optional whitespace and a `)`.
    fn expect_closing_parenthesis(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEOF)),
            Some(')') => {
                self.advance(1);
                Ok(())
            }
            Some(_) => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    const fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.position)
    }

    const fn advance(&mut self, count: usize) {
        self.position += count;
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}
