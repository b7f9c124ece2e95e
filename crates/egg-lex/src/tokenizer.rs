//! Stage 2: a disambiguating tokenizer wrapping the context-free lexer.
//!
//! Skips whitespace and comments, subdivides operator runs by
//! longest-prefix match against the closed operator table, merges
//! attribute syntax (`@ident.ident...`), and resolves identifiers
//! against the closed keyword set. See `egg-tokenizer.cpp` in the
//! upstream project for the algorithm this mirrors: keywords are found
//! by a forward linear scan, operators by a reverse scan over a
//! shortest-first table so the first match is always the longest one.

use egg_util::span::{SourceLocation, SourceRange};
use egg_util::symbol::{self, Symbol};
use egg_util::{Handler, IssueBuilder};

use crate::lexer::{Lexer, LexerItem, LexerKind, LexerValue};

/// The closed set of Egg operators, longest-match resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Operator {
    Bang,
    BangEquals,
    BangBang,
    BangBangEquals,
    Percent,
    PercentEquals,
    Ampersand,
    AmpersandAmpersand,
    AmpersandAmpersandEquals,
    AmpersandEquals,
    ParenOpen,
    ParenClose,
    Star,
    StarEquals,
    Plus,
    PlusPlus,
    PlusEquals,
    Comma,
    Minus,
    MinusMinus,
    MinusEquals,
    Arrow,
    Dot,
    Ellipsis,
    Slash,
    SlashEquals,
    Colon,
    Semicolon,
    Less,
    LessLess,
    LessLessEquals,
    LessEquals,
    LessPipe,
    LessPipeEquals,
    Equals,
    EqualsEquals,
    Greater,
    GreaterEquals,
    GreaterGreater,
    GreaterGreaterEquals,
    GreaterGreaterGreater,
    GreaterGreaterGreaterEquals,
    GreaterPipe,
    GreaterPipeEquals,
    Question,
    QuestionQuestion,
    QuestionQuestionEquals,
    BracketOpen,
    BracketClose,
    Caret,
    CaretEquals,
    BraceOpen,
    Pipe,
    PipeEquals,
    PipePipe,
    PipePipeEquals,
    BraceClose,
    Tilde,
}

impl Operator {
    pub fn text(&self) -> &'static str {
        use Operator::*;
        match self {
            Bang => "!",
            BangEquals => "!=",
            BangBang => "!!",
            BangBangEquals => "!!=",
            Percent => "%",
            PercentEquals => "%=",
            Ampersand => "&",
            AmpersandAmpersand => "&&",
            AmpersandAmpersandEquals => "&&=",
            AmpersandEquals => "&=",
            ParenOpen => "(",
            ParenClose => ")",
            Star => "*",
            StarEquals => "*=",
            Plus => "+",
            PlusPlus => "++",
            PlusEquals => "+=",
            Comma => ",",
            Minus => "-",
            MinusMinus => "--",
            MinusEquals => "-=",
            Arrow => "->",
            Dot => ".",
            Ellipsis => "...",
            Slash => "/",
            SlashEquals => "/=",
            Colon => ":",
            Semicolon => ";",
            Less => "<",
            LessLess => "<<",
            LessLessEquals => "<<=",
            LessEquals => "<=",
            LessPipe => "<|",
            LessPipeEquals => "<|=",
            Equals => "=",
            EqualsEquals => "==",
            Greater => ">",
            GreaterEquals => ">=",
            GreaterGreater => ">>",
            GreaterGreaterEquals => ">>=",
            GreaterGreaterGreater => ">>>",
            GreaterGreaterGreaterEquals => ">>>=",
            GreaterPipe => ">|",
            GreaterPipeEquals => ">|=",
            Question => "?",
            QuestionQuestion => "??",
            QuestionQuestionEquals => "??=",
            BracketOpen => "[",
            BracketClose => "]",
            Caret => "^",
            CaretEquals => "^=",
            BraceOpen => "{",
            Pipe => "|",
            PipeEquals => "|=",
            PipePipe => "||",
            PipePipeEquals => "||=",
            BraceClose => "}",
            Tilde => "~",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Sorted shortest-first; `resolve_operator` scans it in reverse so the
/// first candidate whose text prefixes the remaining run is the longest.
const OPERATORS: &[(&str, Operator)] = &[
    ("!", Operator::Bang),
    ("%", Operator::Percent),
    ("&", Operator::Ampersand),
    ("(", Operator::ParenOpen),
    (")", Operator::ParenClose),
    ("*", Operator::Star),
    ("+", Operator::Plus),
    (",", Operator::Comma),
    ("-", Operator::Minus),
    (".", Operator::Dot),
    ("/", Operator::Slash),
    (":", Operator::Colon),
    (";", Operator::Semicolon),
    ("<", Operator::Less),
    ("=", Operator::Equals),
    (">", Operator::Greater),
    ("?", Operator::Question),
    ("[", Operator::BracketOpen),
    ("]", Operator::BracketClose),
    ("^", Operator::Caret),
    ("{", Operator::BraceOpen),
    ("|", Operator::Pipe),
    ("}", Operator::BraceClose),
    ("~", Operator::Tilde),
    ("!=", Operator::BangEquals),
    ("!!", Operator::BangBang),
    ("%=", Operator::PercentEquals),
    ("&&", Operator::AmpersandAmpersand),
    ("&=", Operator::AmpersandEquals),
    ("*=", Operator::StarEquals),
    ("++", Operator::PlusPlus),
    ("+=", Operator::PlusEquals),
    ("--", Operator::MinusMinus),
    ("-=", Operator::MinusEquals),
    ("->", Operator::Arrow),
    ("/=", Operator::SlashEquals),
    ("<<", Operator::LessLess),
    ("<=", Operator::LessEquals),
    ("<|", Operator::LessPipe),
    ("==", Operator::EqualsEquals),
    (">=", Operator::GreaterEquals),
    (">>", Operator::GreaterGreater),
    (">|", Operator::GreaterPipe),
    ("??", Operator::QuestionQuestion),
    ("^=", Operator::CaretEquals),
    ("|=", Operator::PipeEquals),
    ("||", Operator::PipePipe),
    ("!!=", Operator::BangBangEquals),
    ("&&=", Operator::AmpersandAmpersandEquals),
    ("...", Operator::Ellipsis),
    ("<<=", Operator::LessLessEquals),
    ("<|=", Operator::LessPipeEquals),
    (">>=", Operator::GreaterGreaterEquals),
    (">>>", Operator::GreaterGreaterGreater),
    (">|=", Operator::GreaterPipeEquals),
    ("??=", Operator::QuestionQuestionEquals),
    ("||=", Operator::PipePipeEquals),
    (">>>=", Operator::GreaterGreaterGreaterEquals),
];

/// Finds the longest operator whose text prefixes `run`, returning the
/// match and its length in bytes.
fn resolve_operator(run: &str) -> Option<(Operator, usize)> {
    OPERATORS
        .iter()
        .rev()
        .find(|(text, _)| run.starts_with(text))
        .map(|(text, op)| (*op, text.len()))
}

/// Typed token kind; value is carried separately on [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Integer,
    Float,
    String,
    Keyword,
    Identifier,
    Operator,
    Attribute,
    EndOfFile,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    None,
    Integer(u64),
    Float(f64),
    String(String),
    Symbol(Symbol),
    Operator(Operator),
}

/// A single resolved token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub range: SourceRange,
    /// False when whitespace or a comment preceded this token.
    pub contiguous: bool,
}

impl Token {
    pub fn width(&self) -> u32 {
        if self.range.begin.line == self.range.end.line {
            self.range.end.column.saturating_sub(self.range.begin.column)
        } else {
            0
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::Keyword, TokenValue::Symbol(s)) => write!(f, "keyword '{s}'"),
            (TokenKind::Operator, TokenValue::Operator(op)) => write!(f, "operator '{op}'"),
            (TokenKind::String, TokenValue::String(s)) => write!(f, "\"{s}\""),
            (TokenKind::Integer, TokenValue::Integer(i)) => write!(f, "'{i}'"),
            (TokenKind::Float, TokenValue::Float(v)) => write!(f, "'{v}'"),
            (TokenKind::Identifier, TokenValue::Symbol(s)) => write!(f, "'{s}'"),
            (TokenKind::Attribute, TokenValue::String(s)) => write!(f, "'{s}'"),
            (TokenKind::EndOfFile, _) => write!(f, "<end-of-file>"),
            _ => write!(f, "<token>"),
        }
    }
}

/// Pulls tokens from a [`Lexer`], skipping whitespace/comments and
/// subdividing operator runs on demand.
///
/// A partially-consumed operator run is held as `pending`: `eatOperator`
/// in the original design either fully consumes the current lexer item
/// or trims its front, leaving the remainder in place for the next call.
pub struct Tokenizer<'a> {
    lexer: Lexer<'a>,
    handler: &'a Handler,
    pending: Option<LexerItem>,
    saw_skip_before_next: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(lexer: Lexer<'a>, handler: &'a Handler) -> Self {
        Self {
            lexer,
            handler,
            pending: None,
            saw_skip_before_next: false,
        }
    }

    fn next_lexer_item(&mut self) -> LexerItem {
        match self.pending.take() {
            Some(item) => item,
            None => self.lexer.next(),
        }
    }

    /// Skips whitespace/comment items, recording whether any were seen.
    fn skip_trivia(&mut self) -> LexerItem {
        loop {
            let item = self.next_lexer_item();
            match item.kind {
                LexerKind::Whitespace | LexerKind::Comment => {
                    self.saw_skip_before_next = true;
                }
                _ => return item,
            }
        }
    }

    pub fn next(&mut self) -> Token {
        let contiguous = !std::mem::take(&mut self.saw_skip_before_next);
        let item = self.skip_trivia();
        let contiguous = contiguous && !self.saw_skip_before_next;

        match item.kind {
            LexerKind::EndOfFile => Token {
                kind: TokenKind::EndOfFile,
                value: TokenValue::None,
                range: item.range,
                contiguous,
            },
            LexerKind::Integer => {
                let LexerValue::Integer(v) = item.value else { unreachable!() };
                Token {
                    kind: TokenKind::Integer,
                    value: TokenValue::Integer(v),
                    range: item.range,
                    contiguous,
                }
            }
            LexerKind::Float => {
                let LexerValue::Float(v) = item.value else { unreachable!() };
                Token {
                    kind: TokenKind::Float,
                    value: TokenValue::Float(v),
                    range: item.range,
                    contiguous,
                }
            }
            LexerKind::String => {
                let LexerValue::String(s) = item.value else { unreachable!() };
                Token {
                    kind: TokenKind::String,
                    value: TokenValue::String(s),
                    range: item.range,
                    contiguous,
                }
            }
            LexerKind::Identifier => {
                let symbol = Symbol::intern(&item.verbatim);
                let kind = if symbol.is_known() {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                Token {
                    kind,
                    value: TokenValue::Symbol(symbol),
                    range: item.range,
                    contiguous,
                }
            }
            LexerKind::Operator if item.verbatim.starts_with('@') => {
                self.resolve_attribute(item, contiguous)
            }
            LexerKind::Operator => self.resolve_operator_item(item, contiguous),
            LexerKind::Whitespace | LexerKind::Comment => unreachable!("skipped by skip_trivia"),
        }
    }

    fn resolve_operator_item(&mut self, item: LexerItem, contiguous: bool) -> Token {
        let begin = item.range.begin;
        match resolve_operator(&item.verbatim) {
            Some((op, consumed)) => {
                let end = advance_location(begin, &item.verbatim[..consumed]);
                if consumed < item.verbatim.len() {
                    let remainder = item.verbatim[consumed..].to_string();
                    self.pending = Some(LexerItem {
                        kind: LexerKind::Operator,
                        value: LexerValue::None,
                        verbatim: remainder,
                        range: SourceRange::new(end, item.range.end),
                    });
                }
                Token {
                    kind: TokenKind::Operator,
                    value: TokenValue::Operator(op),
                    range: SourceRange::new(begin, end),
                    contiguous,
                }
            }
            None => {
                IssueBuilder::error("Unexpected character")
                    .token(&item.verbatim)
                    .range(item.range)
                    .emit(self.handler);
                Token {
                    kind: TokenKind::Operator,
                    value: TokenValue::None,
                    range: item.range,
                    contiguous,
                }
            }
        }
    }

    /// `@`(`@`)*`ident`(`.ident`)*; the whole run must be `@` characters
    /// immediately followed by an identifier.
    fn resolve_attribute(&mut self, item: LexerItem, contiguous: bool) -> Token {
        let begin = item.range.begin;
        if !item.verbatim.chars().all(|c| c == '@') {
            IssueBuilder::error("Malformed attribute")
                .token(&item.verbatim)
                .range(item.range)
                .emit(self.handler);
            return Token {
                kind: TokenKind::Attribute,
                value: TokenValue::String(item.verbatim),
                range: item.range,
                contiguous,
            };
        }

        let mut text = item.verbatim;
        let mut end = item.range.end;
        loop {
            let next_item = self.next_lexer_item();
            if next_item.kind != LexerKind::Identifier {
                IssueBuilder::error("Expected identifier to follow '@' in attribute")
                    .range(next_item.range)
                    .emit(self.handler);
                self.pending = Some(next_item);
                break;
            }
            text.push_str(&next_item.verbatim);
            end = next_item.range.end;

            let following = self.next_lexer_item();
            if following.verbatim == "." {
                text.push('.');
            } else {
                self.pending = Some(following);
                break;
            }
        }

        Token {
            kind: TokenKind::Attribute,
            value: TokenValue::String(text),
            range: SourceRange::new(begin, end),
            contiguous,
        }
    }
}

fn advance_location(begin: SourceLocation, consumed: &str) -> SourceLocation {
    SourceLocation::new(begin.line, begin.column + consumed.chars().count() as u32)
}

pub use symbol::{
    KW_ANY, KW_BOOL, KW_BREAK, KW_CASE, KW_CATCH, KW_CONTINUE, KW_DEFAULT, KW_DO, KW_ELSE,
    KW_FALSE, KW_FINALLY, KW_FLOAT, KW_FOR, KW_IF, KW_INT, KW_NULL, KW_OBJECT, KW_RETURN,
    KW_STATIC, KW_STRING, KW_SWITCH, KW_THROW, KW_TRUE, KW_TRY, KW_TYPE, KW_VAR, KW_VOID,
    KW_WHILE, KW_YIELD,
};
