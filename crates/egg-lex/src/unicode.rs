//! Character classification helpers shared by the lexer's scanning rules.

/// True for the first character of an identifier: ASCII letter or underscore.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// True for a non-initial identifier character: letter, digit or underscore.
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True for a character in the Egg operator alphabet: the lexer consumes
/// a maximal run of these as one `Operator` item; the tokenizer later
/// subdivides the run by longest-prefix match.
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '!' | '%'
            | '&'
            | '('
            | ')'
            | '*'
            | '+'
            | ','
            | '-'
            | '.'
            | '/'
            | ':'
            | ';'
            | '<'
            | '='
            | '>'
            | '?'
            | '@'
            | '['
            | ']'
            | '^'
            | '{'
            | '|'
            | '}'
            | '~'
    )
}

fn hex_digit_to_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'a'..='f' => Some(c as u32 - 'a' as u32 + 10),
        'A'..='F' => Some(c as u32 - 'A' as u32 + 10),
        _ => None,
    }
}

/// Parses a run of hex digits (as produced by a `\xNN` or `\u{NNNN}` escape)
/// into a codepoint value.
pub fn parse_hex_codepoint(hex: &str) -> Option<u32> {
    if hex.is_empty() || hex.len() > 8 {
        return None;
    }
    let mut value = 0u32;
    for c in hex.chars() {
        value = value.checked_mul(16)?;
        value = value.checked_add(hex_digit_to_value(c)?)?;
    }
    is_valid_scalar(value).then_some(value)
}

/// True for codepoints that are valid Unicode scalar values (excludes the
/// UTF-16 surrogate range).
pub fn is_valid_scalar(codepoint: u32) -> bool {
    codepoint <= 0x10FFFF && !(0xD800..=0xDFFF).contains(&codepoint)
}
