//! The Egg parser: a hand-written recursive-descent parser turning a
//! [`egg_lex::Tokenizer`] into a typed [`ast::Node`] tree.
//!
//! The token source is pulled lazily through an absolute-index lookahead
//! buffer (`Parser::at`): any rule can peek arbitrarily far ahead from its
//! own starting index without discarding what it has already pulled,
//! which is what lets alternatives backtrack cheaply. Every rule threads
//! a three-state [`Partial`] result (`Success` / `Skipped` / `Failed`)
//! rather than throwing — see `ovum/egg-parser.cpp`'s `Partial`/`Context`
//! pair, which this mirrors in a tagged-enum idiom instead of
//! exception-carrying state.
//!
//! # Example
//!
//! ```
//! use egg_par::parse;
//!
//! let outcome = parse("print(\"hi\");", "test.egg");
//! assert!(outcome.root.is_some());
//! assert!(outcome.issues.is_empty());
//! ```

pub mod ast;
mod expr;
mod guard;
mod specification;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use ast::{Node, NodeKind};
use egg_lex::tokenizer::Operator;
use egg_lex::{Lexer, Token, TokenKind, TokenValue, Tokenizer};
use egg_util::span::SourceRange;
use egg_util::symbol::Symbol;
use egg_util::{Handler, Issue, IssueBuilder};

/// Result of parsing one resource: a tree iff no `Error` issue was
/// recorded, plus every issue (error, warning, or information) in
/// source order.
#[derive(Debug)]
pub struct ParseOutcome {
    pub root: Option<Node>,
    pub issues: Vec<Issue>,
    pub resource: String,
}

/// Parse `source` (named `resource` for diagnostics) into an AST.
pub fn parse(source: &str, resource: impl Into<String>) -> ParseOutcome {
    let resource = resource.into();
    let handler = Handler::new();
    let lexer = Lexer::new(source, &handler);
    let tokenizer = Tokenizer::new(lexer, &handler);
    let mut parser = Parser::new(tokenizer, &handler);
    let root = parser.parse_module();
    let issues = handler.into_issues();
    let root = if issues.iter().any(|i| i.severity == egg_util::Severity::Error) {
        None
    } else {
        root
    };
    ParseOutcome { root, issues, resource }
}

/// The three-state result of a single parse rule.
///
/// `Skipped` carries no position: a skipped rule must not have consumed
/// any token or recorded any issue, so callers always retry from the
/// index they started at.
pub(crate) enum Partial {
    /// `ambiguous` is set when the node is a type expression that began
    /// with a bare identifier (or ends in `.name` property access on
    /// one): it might need to be reinterpreted as a value expression by
    /// the caller if what follows doesn't look like a declaration.
    Success { node: Node, tokens_after: usize, ambiguous: bool },
    Skipped,
    Failed { tokens_after: usize },
}

impl Partial {
    pub(crate) fn is_success(&self) -> bool {
        matches!(self, Partial::Success { .. })
    }

    pub(crate) fn is_skipped(&self) -> bool {
        matches!(self, Partial::Skipped)
    }

    pub(crate) fn is_ambiguous(&self) -> bool {
        matches!(self, Partial::Success { ambiguous: true, .. })
    }

    pub(crate) fn tokens_after(&self) -> usize {
        match self {
            Partial::Success { tokens_after, .. } => *tokens_after,
            Partial::Failed { tokens_after } => *tokens_after,
            Partial::Skipped => panic!("tokens_after queried on a Skipped Partial"),
        }
    }
}

/// Snapshot of `(tokensBefore, issuesBefore)` at the start of a rule.
///
/// `skip()` asserts that no issue was recorded since construction —
/// a rule that recorded an issue and wants to bail must use `fail()`
/// instead, never `skip()`.
pub(crate) struct Context {
    pub(crate) tokens_before: usize,
    issues_before: usize,
}

impl Context {
    pub(crate) fn success(&self, node: Node, tokens_after: usize) -> Partial {
        Partial::Success { node, tokens_after, ambiguous: false }
    }

    pub(crate) fn success_ambiguous(&self, node: Node, tokens_after: usize) -> Partial {
        Partial::Success { node, tokens_after, ambiguous: true }
    }

    pub(crate) fn skip(&self, parser: &Parser) -> Partial {
        debug_assert_eq!(
            parser.handler.len(),
            self.issues_before,
            "skip() called after recording an issue; use fail() instead"
        );
        Partial::Skipped
    }

    pub(crate) fn fail(&self, tokens_after: usize) -> Partial {
        Partial::Failed { tokens_after }
    }
}

/// Recursive-descent driver over an absolute-index token buffer.
pub(crate) struct Parser<'a> {
    handler: &'a Handler,
    tokenizer: Tokenizer<'a>,
    tokens: Vec<Token>,
}

impl<'a> Parser<'a> {
    fn new(tokenizer: Tokenizer<'a>, handler: &'a Handler) -> Self {
        Self { handler, tokenizer, tokens: Vec::new() }
    }

    pub(crate) fn context(&self, tokens_before: usize) -> Context {
        Context { tokens_before, issues_before: self.handler.len() }
    }

    /// Pulls from the tokenizer until the buffer covers `index`, then
    /// returns a clone of the token there. Past end-of-file the
    /// tokenizer keeps handing back `EndOfFile` tokens, so this never
    /// needs special-casing for out-of-range indices.
    pub(crate) fn at(&mut self, index: usize) -> Token {
        while self.tokens.len() <= index {
            let next = self.tokenizer.next();
            self.tokens.push(next);
        }
        self.tokens[index].clone()
    }

    pub(crate) fn is_eof(&mut self, index: usize) -> bool {
        self.at(index).kind == TokenKind::EndOfFile
    }

    pub(crate) fn is_operator(&mut self, index: usize, op: Operator) -> bool {
        matches!(self.at(index).value, TokenValue::Operator(o) if o == op)
    }

    pub(crate) fn operator_at(&mut self, index: usize) -> Option<Operator> {
        match self.at(index).value {
            TokenValue::Operator(o) => Some(o),
            _ => None,
        }
    }

    pub(crate) fn is_keyword(&mut self, index: usize, keyword: Symbol) -> bool {
        let token = self.at(index);
        token.kind == TokenKind::Keyword && matches!(token.value, TokenValue::Symbol(s) if s == keyword)
    }

    pub(crate) fn is_identifier(&mut self, index: usize) -> bool {
        self.at(index).kind == TokenKind::Identifier
    }

    /// The symbol naming an `Identifier` or `Keyword` token, if any.
    pub(crate) fn symbol_at(&mut self, index: usize) -> Option<Symbol> {
        match self.at(index).value {
            TokenValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn range_at(&mut self, index: usize) -> SourceRange {
        self.at(index).range
    }

    pub(crate) fn error_expected(&mut self, index: usize, expected: &str) -> Partial {
        let token = self.at(index);
        let range = token.range;
        IssueBuilder::error(format!("Expected {expected} but instead got"))
            .token(token)
            .range(range)
            .emit(self.handler);
        Partial::Failed { tokens_after: index }
    }

    pub(crate) fn error_unexpected(&mut self, index: usize, what: &str) -> Partial {
        let token = self.at(index);
        let range = token.range;
        IssueBuilder::error(format!("Unexpected {what}"))
            .token(token)
            .range(range)
            .emit(self.handler);
        Partial::Failed { tokens_after: index }
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>, range: SourceRange) {
        self.handler.warning(message, range);
    }

    /// Top-level entry: a module is a sequence of statements up to EOF.
    fn parse_module(&mut self) -> Option<Node> {
        let begin = self.range_at(0);
        let mut root = Node::new(NodeKind::ModuleRoot, begin);
        let mut index = 0;
        loop {
            if self.is_eof(index) {
                root.range = root.range.extend_to(self.range_at(index));
                break;
            }
            match self.parse_statement(index) {
                Partial::Success { node, tokens_after, .. } => {
                    root.push_child(node);
                    index = tokens_after;
                }
                Partial::Skipped => {
                    self.error_unexpected(index, "token");
                    return None;
                }
                Partial::Failed { .. } => return None,
            }
        }
        Some(root)
    }
}
