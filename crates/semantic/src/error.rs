// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error and diagnostic types for semantic analysis

use serde::{Deserialize, Serialize};
use sqlgen_ir::Span;
use thiserror::Error;

/// Result type alias for semantic operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Errors raised during symbol and type resolution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Table not found in the current scope or any parent scope
    #[error("no such table: {0}")]
    TableNotFound(String),

    /// Column not found in any visible table
    #[error("no such column: {0}")]
    ColumnNotFound(String),

    /// Column reference matched in multiple tables at the same level
    #[error("ambiguous column reference: {0} (found in {1:?})")]
    AmbiguousColumn(String, Vec<String>),

    /// Duplicate table alias in the same scope
    #[error("duplicate table alias: {0}")]
    DuplicateAlias(String),

    /// View definitions reference each other in a cycle
    #[error("circular view definition: {}", .0.join(" -> "))]
    CircularReference(Vec<String>),
}

/// A user-facing problem found during analysis, anchored to a source position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

/// Receiver for diagnostics; analysis reports everything it finds instead of
/// failing on the first problem
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display_carries_position() {
        let d = Diagnostic::new(Span::new(3, 7), "no such column: zip");
        assert_eq!(d.to_string(), "3:7: no such column: zip");
    }

    #[test]
    fn test_circular_reference_lists_members() {
        let err = SemanticError::CircularReference(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "circular view definition: a -> b -> a");
    }
}
