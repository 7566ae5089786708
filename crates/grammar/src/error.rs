// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for lexing and parsing

use sqlgen_ir::Span;
use thiserror::Error;

/// Result type alias for grammar operations
pub type GrammarResult<T> = Result<T, ParseError>;

/// A parse error with a file-relative source position
///
/// Parse errors halt analysis of the statement they occur in; the parser
/// recovers at the next statement terminator so the remaining statements in
/// the file are still analyzed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{span}: {message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_position() {
        let err = ParseError::new("unexpected token", Span::new(3, 14));
        let msg = format!("{err}");
        assert!(msg.contains("3:14"));
        assert!(msg.contains("unexpected token"));
    }
}
