//! Character classes shared by identifier, string and formula parsing.
//!
//! Names follow [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#tokenizer-definitions)
//! loosely: digits are name characters but never name-starts, and any code point
//! above U+007F counts as a letter.

/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
#[must_use]
pub const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// "A name-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
#[must_use]
pub const fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// `0-9`, `a-f`, `A-F`.
#[must_use]
pub const fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Space, tab, line feed, carriage return or form feed.
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Characters that may not follow a `\` directly, and that end a quoted
/// string unless escaped.
#[must_use]
pub const fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0C')
}
