//! Issue reporting infrastructure.
//!
//! The lexer, tokenizer and parser all report problems as an [`Issue`]:
//! a severity, a message, and the source range it concerns. A [`Handler`]
//! collects them in insertion order and answers the one question callers
//! actually need — did a fatal error happen.
//!
//! # Examples
//!
//! ```
//! use egg_util::diagnostic::{Handler, Severity};
//! use egg_util::span::SourceRange;
//!
//! let handler = Handler::new();
//! handler.error("Unexpected character: '$'", SourceRange::ZERO);
//!
//! assert!(handler.has_errors());
//! ```

mod builder;

pub use builder::IssueBuilder;

use crate::span::SourceRange;
use std::cell::RefCell;
use std::fmt;

/// Severity of a recorded [`Issue`].
///
/// Ordered so that `Error > Warning > Information`: useful when a
/// caller wants "the worst thing recorded" via `Iterator::max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Information,
    Warning,
    Error,
}

impl Severity {
    #[inline]
    pub const fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
        }
    }
}

/// A single diagnostic: what went wrong, how bad it is, and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    pub range: SourceRange,
}

impl Issue {
    pub fn new(severity: Severity, message: impl Into<String>, range: SourceRange) -> Self {
        Self {
            severity,
            message: message.into(),
            range,
        }
    }

    pub fn error(message: impl Into<String>, range: SourceRange) -> Self {
        Self::new(Severity::Error, message, range)
    }

    pub fn warning(message: impl Into<String>, range: SourceRange) -> Self {
        Self::new(Severity::Warning, message, range)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.message, self.range)
    }
}

/// Accumulates issues during a single lex/tokenize/parse pass.
///
/// Unlike a general-purpose compiler handler this is not meant to be
/// shared across files: one `Handler` per resource, dropped with it.
#[derive(Default)]
pub struct Handler {
    issues: RefCell<Vec<Issue>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            issues: RefCell::new(Vec::new()),
        }
    }

    pub fn error(&self, message: impl Into<String>, range: SourceRange) {
        self.emit(Issue::error(message, range));
    }

    pub fn warning(&self, message: impl Into<String>, range: SourceRange) {
        self.emit(Issue::warning(message, range));
    }

    pub fn emit(&self, issue: Issue) {
        self.issues.borrow_mut().push(issue);
    }

    pub fn build_error(&self, message: impl Into<String>) -> IssueBuilder {
        IssueBuilder::error(message)
    }

    pub fn build_warning(&self, message: impl Into<String>) -> IssueBuilder {
        IssueBuilder::warning(message)
    }

    pub fn has_errors(&self) -> bool {
        self.issues.borrow().iter().any(|i| i.severity.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .borrow()
            .iter()
            .filter(|i| i.severity.is_error())
            .count()
    }

    /// Number of issues recorded so far; used by the parser's `Context`
    /// to snapshot `issuesBefore` and detect whether a rule recorded
    /// anything since it started.
    pub fn len(&self) -> usize {
        self.issues.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.borrow().is_empty()
    }

    /// Consume the handler, returning issues in insertion order.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues.into_inner()
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.issues.borrow().clone()
    }

    pub fn clear(&self) {
        self.issues.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_puts_error_highest() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Information);
    }

    #[test]
    fn handler_tracks_errors_separately_from_warnings() {
        let handler = Handler::new();
        handler.warning("redundant suffix", SourceRange::ZERO);
        assert!(!handler.has_errors());
        handler.error("unexpected token", SourceRange::ZERO);
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.len(), 2);
    }

    #[test]
    fn handler_preserves_insertion_order() {
        let handler = Handler::new();
        handler.warning("first", SourceRange::ZERO);
        handler.error("second", SourceRange::ZERO);
        let issues = handler.into_issues();
        assert_eq!(issues[0].message, "first");
        assert_eq!(issues[1].message, "second");
    }
}
