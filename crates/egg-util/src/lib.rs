//! egg-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the fundamental types shared by every stage of the
//! Egg front-end pipeline (lexer, tokenizer, parser): source locations,
//! string interning, and diagnostic reporting. None of it is specific to
//! any one stage; it exists so the three stages can agree on a common
//! vocabulary for "where in the source did this happen" and "what do we
//! tell the caller about it".
//!
//! ============================================================================
//! STRING INTERNING (SYMBOL)
//! ============================================================================
//!
//! Identifiers and string literals repeat constantly across a source file
//! ("x", "get", "it"...). Interning stores each distinct string once and
//! hands out a small copy-able handle (`Symbol`) everywhere else, so
//! comparing two identifiers for equality is an integer compare rather
//! than a byte-by-byte scan.
//!
//! Properties:
//! - `Symbol::intern(s) == Symbol::intern(t)` iff `s == t`.
//! - Comparison and hashing are O(1); only the first intern of a given
//!   string pays for hashing its bytes.
//! - Interned strings live for the process lifetime: the parser's output
//!   AST borrows nothing from the source buffer, so it can outlive it.
//!
//! ============================================================================
//! DIAGNOSTICS
//! ============================================================================
//!
//! Every stage reports problems as an [`Issue`] through a [`Handler`]: a
//! root AST is returned if and only if no `Severity::Error` issue was
//! recorded.

pub mod diagnostic;
pub mod span;
pub mod symbol;

mod error;

pub use diagnostic::{Handler, Issue, IssueBuilder, Severity};
pub use error::{DiagnosticError, SymbolError};
pub use span::{SourceLocation, SourceRange};
pub use symbol::Symbol;

// Re-exported for crates that want a fast, non-cryptographic hash map
// without adding their own dependency on rustc-hash.
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
