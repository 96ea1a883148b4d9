//! Error type for the syntax crate.

use thiserror::Error;

/// Malformed source text. Positions are 1-based; for edit payloads parsed
/// with [`crate::Tree::parse_expression`] they are relative to the payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, message: impl Into<String>) -> ParseError {
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}
