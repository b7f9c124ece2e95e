//! Fluent construction of an [`Issue`] before it is known where it will land.

use super::{Handler, Issue, Severity};
use crate::span::SourceRange;

pub struct IssueBuilder {
    severity: Severity,
    message: String,
    range: SourceRange,
}

impl IssueBuilder {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            range: SourceRange::ZERO,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn range(mut self, range: SourceRange) -> Self {
        self.range = range;
        self
    }

    /// Append `": {token}"` to the message, the pretty-printed-offending-token
    /// convention used throughout the tokenizer and parser error text.
    pub fn token(mut self, token: impl std::fmt::Display) -> Self {
        self.message = format!("{}: {}", self.message, token);
        self
    }

    pub fn build(self) -> Issue {
        Issue::new(self.severity, self.message, self.range)
    }

    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceLocation;

    #[test]
    fn builder_attaches_token_text() {
        let issue = IssueBuilder::error("Unexpected character")
            .token("'$'")
            .range(SourceRange::point(SourceLocation::new(2, 3)))
            .build();
        assert_eq!(issue.message, "Unexpected character: '$'");
        assert_eq!(issue.range.begin, SourceLocation::new(2, 3));
    }

    #[test]
    fn builder_emits_to_handler() {
        let handler = Handler::new();
        IssueBuilder::warning("Redundant repetition of type suffix '?'").emit(&handler);
        assert!(!handler.has_errors());
        assert_eq!(handler.len(), 1);
    }
}
