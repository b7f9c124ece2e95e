//! Core error types for egg-util.

use thiserror::Error;

/// Error type for symbol interning operations.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Failed to intern symbol: {0}")]
    InternFailed(String),

    #[error("Symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Error type for diagnostic operations.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("Failed to format diagnostic: {0}")]
    FormatFailed(String),
}

pub type SymbolResult<T> = std::result::Result<T, SymbolError>;
pub type DiagnosticResult<T> = std::result::Result<T, DiagnosticError>;
