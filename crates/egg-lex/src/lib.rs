//! The Egg lexer/tokenizer: the first two stages of the front-end
//! pipeline, turning UTF-8 source text into a stream of [`tokenizer::Token`].
//!
//! Two layers, per the upstream design (`ovum/lexer.h`):
//!
//! - [`lexer`] is context-free: it classifies a run of characters into
//!   a coarse [`lexer::LexerKind`] (whitespace, comment, integer, float,
//!   string, a maximal operator-character run, identifier) without
//!   knowing anything about keywords or multi-character operators.
//! - [`tokenizer`] wraps a lexer to disambiguate: it skips trivia,
//!   subdivides operator runs by longest-prefix match, resolves
//!   identifiers against the closed keyword set, and merges `@attribute`
//!   syntax. "It is usually necessary to wrap [the lexer] in a
//!   tokenizer to handle disambiguation such as 'a--b'."
//!
//! # Example
//!
//! ```
//! use egg_lex::lexer::Lexer;
//! use egg_lex::tokenizer::{Tokenizer, TokenKind};
//! use egg_util::Handler;
//!
//! let handler = Handler::new();
//! let lexer = Lexer::new("print(1);", &handler);
//! let mut tokenizer = Tokenizer::new(lexer, &handler);
//! let first = tokenizer.next();
//! assert_eq!(first.kind, TokenKind::Identifier);
//! ```

pub mod cursor;
pub mod lexer;
pub mod tokenizer;
pub mod unicode;

pub use lexer::{Lexer, LexerItem, LexerKind, LexerValue};
pub use tokenizer::{Token, TokenKind, TokenValue, Tokenizer};
