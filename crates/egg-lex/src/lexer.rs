//! Stage 1: context-free lexical analysis.
//!
//! The lexer classifies raw source text into a flat stream of
//! [`LexerItem`]s. It makes no attempt to disambiguate keywords from
//! identifiers or to subdivide a run of operator characters into
//! specific operators — that is the tokenizer's job, one layer up.
//! Whitespace and comments are emitted as items rather than silently
//! dropped, so the tokenizer can decide contiguity.

use egg_util::span::{SourceLocation, SourceRange};
use egg_util::{Handler, IssueBuilder};

use crate::cursor::Cursor;
use crate::unicode::{is_ident_continue, is_ident_start, is_operator_char, parse_hex_codepoint};

/// The coarse category of a single lexer item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexerKind {
    Whitespace,
    Comment,
    Integer,
    Float,
    String,
    Operator,
    Identifier,
    EndOfFile,
}

/// The decoded payload carried by some lexer item kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum LexerValue {
    None,
    /// Unsigned magnitude; a preceding minus sign is a separate `Operator` item.
    Integer(u64),
    Float(f64),
    /// Decoded text; `verbatim` on the enclosing item still carries the quotes.
    String(String),
}

/// One classified run of source text.
#[derive(Clone, Debug, PartialEq)]
pub struct LexerItem {
    pub kind: LexerKind,
    pub value: LexerValue,
    pub verbatim: String,
    pub range: SourceRange,
}

/// Scans source text into a stream of [`LexerItem`]s on demand.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a Handler,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        let mut cursor = Cursor::new(source);
        if cursor.remaining().starts_with('\u{FEFF}') {
            cursor.advance();
        }
        Self { cursor, handler }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.cursor.line(), self.cursor.column())
    }

    /// Returns the next classified item; `LexerKind::EndOfFile` items are
    /// returned forever once the source is exhausted.
    pub fn next(&mut self) -> LexerItem {
        let begin_pos = self.cursor.position();
        let begin = self.location();

        if self.cursor.is_at_end() {
            return self.item(LexerKind::EndOfFile, LexerValue::None, begin_pos, begin);
        }

        match self.cursor.current_char() {
            ' ' | '\t' | '\r' | '\n' | '\u{c}' => self.scan_whitespace(begin_pos, begin),
            '/' if self.cursor.peek_char(1) == '/' || self.cursor.peek_char(1) == '*' => {
                self.scan_comment(begin_pos, begin)
            }
            '"' => self.scan_quoted_string(begin_pos, begin),
            '`' => self.scan_backquoted_string(begin_pos, begin),
            c if c.is_ascii_digit() => self.scan_number(begin_pos, begin),
            c if is_ident_start(c) => self.scan_identifier(begin_pos, begin),
            c if is_operator_char(c) => self.scan_operator(begin_pos, begin),
            c => {
                self.cursor.advance();
                self.error(&format!("Unexpected character: '{c}'"), begin, self.location());
                self.item(LexerKind::Operator, LexerValue::None, begin_pos, begin)
            }
        }
    }

    fn item(
        &self,
        kind: LexerKind,
        value: LexerValue,
        begin_pos: usize,
        begin: SourceLocation,
    ) -> LexerItem {
        LexerItem {
            kind,
            value,
            verbatim: self.cursor.slice_from(begin_pos).to_string(),
            range: SourceRange::new(begin, self.location()),
        }
    }

    fn scan_whitespace(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\r' | '\n' | '\u{c}') {
            self.cursor.advance();
        }
        self.item(LexerKind::Whitespace, LexerValue::None, begin_pos, begin)
    }

    fn scan_comment(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        self.cursor.advance();
        if self.cursor.match_char('/') {
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
        } else {
            self.cursor.advance();
            let mut closed = false;
            while !self.cursor.is_at_end() {
                if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                    self.cursor.advance();
                    self.cursor.advance();
                    closed = true;
                    break;
                }
                self.cursor.advance();
            }
            if !closed {
                self.error(
                    "Unexpected end of file found in comment",
                    begin,
                    self.location(),
                );
            }
        }
        self.item(LexerKind::Comment, LexerValue::None, begin_pos, begin)
    }

    fn scan_identifier(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        while !self.cursor.is_at_end() && is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        self.item(LexerKind::Identifier, LexerValue::None, begin_pos, begin)
    }

    fn scan_number(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        if self.cursor.current_char() == '0' && matches!(self.cursor.peek_char(1), 'x' | 'X') {
            return self.scan_hex_integer(begin_pos, begin);
        }

        let leading_zero = self.cursor.current_char() == '0';
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if leading_zero && self.cursor.position() - begin_pos > 1 {
            self.error("Invalid number (extraneous leading '0')", begin, self.location());
        }

        let mut is_float = false;
        if self.cursor.current_char() == '.' {
            is_float = true;
            self.cursor.advance();
            if !self.cursor.current_char().is_ascii_digit() {
                self.error(
                    "Expected digit to follow decimal point in number",
                    begin,
                    self.location(),
                );
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        if matches!(self.cursor.current_char(), 'e' | 'E') {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            if !self.cursor.current_char().is_ascii_digit() {
                self.error(
                    "Expected digit in exponent of floating-point number",
                    begin,
                    self.location(),
                );
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        if is_ident_start(self.cursor.current_char()) {
            self.error(
                "Invalid character following number",
                begin,
                self.location(),
            );
        }

        let text = self.cursor.slice_from(begin_pos);
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => self.item(LexerKind::Float, LexerValue::Float(value), begin_pos, begin),
                Err(_) => {
                    self.error(&format!("Invalid floating-point number: {text}"), begin, self.location());
                    self.item(LexerKind::Float, LexerValue::Float(0.0), begin_pos, begin)
                }
            }
        } else {
            match text.parse::<u64>() {
                Ok(value) => self.item(LexerKind::Integer, LexerValue::Integer(value), begin_pos, begin),
                Err(_) => {
                    self.error(&format!("Invalid integer: {text}"), begin, self.location());
                    self.item(LexerKind::Integer, LexerValue::Integer(0), begin_pos, begin)
                }
            }
        }
    }

    fn scan_hex_integer(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        self.cursor.advance();
        self.cursor.advance();
        let digits_begin = self.cursor.position();
        while self.cursor.current_char().is_ascii_hexdigit() {
            self.cursor.advance();
        }
        let digits = self.cursor.slice_from(digits_begin);
        if digits.is_empty() {
            self.error("Expected hexadecimal digit after '0x'", begin, self.location());
            return self.item(LexerKind::Integer, LexerValue::Integer(0), begin_pos, begin);
        }
        if digits.len() > 16 {
            self.error("Overlong hexadecimal integer", begin, self.location());
        }
        if is_ident_start(self.cursor.current_char()) {
            self.error("Invalid character following number", begin, self.location());
        }
        match u64::from_str_radix(digits, 16) {
            Ok(value) => self.item(LexerKind::Integer, LexerValue::Integer(value), begin_pos, begin),
            Err(_) => {
                self.error("Hexadecimal integer truncated", begin, self.location());
                self.item(LexerKind::Integer, LexerValue::Integer(0), begin_pos, begin)
            }
        }
    }

    fn scan_quoted_string(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        self.cursor.advance();
        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                self.error("Unexpected end of file found in quoted string", begin, self.location());
                break;
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    if let Some(c) = self.scan_escape(begin) {
                        content.push(c);
                    }
                }
                c => {
                    content.push(c);
                    self.cursor.advance();
                }
            }
        }
        self.item(LexerKind::String, LexerValue::String(content), begin_pos, begin)
    }

    /// Multi-line string delimited by backquotes; `` `` `` inside it encodes
    /// a literal backtick.
    fn scan_backquoted_string(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        self.cursor.advance();
        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                self.error("Unexpected end of file found in backquoted string", begin, self.location());
                break;
            }
            if self.cursor.current_char() == '`' {
                if self.cursor.peek_char(1) == '`' {
                    content.push('`');
                    self.cursor.advance();
                    self.cursor.advance();
                    continue;
                }
                self.cursor.advance();
                break;
            }
            content.push(self.cursor.current_char());
            self.cursor.advance();
        }
        self.item(LexerKind::String, LexerValue::String(content), begin_pos, begin)
    }

    fn scan_escape(&mut self, string_begin: SourceLocation) -> Option<char> {
        if self.cursor.is_at_end() {
            self.error("Unexpected end of file found in string escape", string_begin, self.location());
            return None;
        }
        let c = self.cursor.current_char();
        self.cursor.advance();
        match c {
            '"' => Some('"'),
            '\\' => Some('\\'),
            '/' => Some('/'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'u' => self.scan_unicode_escape(string_begin, 4),
            'U' => self.scan_unicode_escape(string_begin, 8),
            other => {
                self.error(&format!("Unknown escape sequence '\\{other}' in string"), string_begin, self.location());
                Some(other)
            }
        }
    }

    /// `\u{4hex}` / `\U{up to 8hex}`, with an optional `;`-truncated form
    /// (`\u4hex;`) sharing the same digit cap.
    fn scan_unicode_escape(&mut self, string_begin: SourceLocation, max_digits: usize) -> Option<char> {
        let braced = self.cursor.match_char('{');
        let hex_begin = self.cursor.position();
        let mut count = 0;
        while count < max_digits && self.cursor.current_char().is_ascii_hexdigit() {
            self.cursor.advance();
            count += 1;
        }
        let hex = self.cursor.slice_from(hex_begin).to_string();
        if braced {
            if !self.cursor.match_char('}') {
                self.error("Unterminated unicode escape sequence", string_begin, self.location());
                return None;
            }
        } else {
            self.cursor.match_char(';');
        }
        match parse_hex_codepoint(&hex).and_then(char::from_u32) {
            Some(c) => Some(c),
            None => {
                self.error(&format!("Invalid unicode escape value: U+{hex}"), string_begin, self.location());
                None
            }
        }
    }

    fn scan_operator(&mut self, begin_pos: usize, begin: SourceLocation) -> LexerItem {
        while !self.cursor.is_at_end() && is_operator_char(self.cursor.current_char()) {
            self.cursor.advance();
        }
        self.item(LexerKind::Operator, LexerValue::None, begin_pos, begin)
    }

    fn error(&self, message: &str, begin: SourceLocation, end: SourceLocation) {
        IssueBuilder::error(message)
            .range(SourceRange::new(begin, end))
            .emit(self.handler);
    }
}
