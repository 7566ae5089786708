// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for catalog operations

use serde::Serialize;
use sqlgen_ir::Span;
use thiserror::Error;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while folding schema statements
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum CatalogError {
    /// A CREATE TABLE for a name that already exists
    #[error("table '{name}' already exists")]
    DuplicateTable { name: String, span: Span },

    /// A CREATE VIEW for a name that already exists
    #[error("view '{name}' already exists")]
    DuplicateView { name: String, span: Span },

    /// Two columns with the same name in one table
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        table: String,
        column: String,
        span: Span,
    },

    /// A statement referenced a table the schema does not contain
    #[error("no such table '{name}'")]
    UnknownTable { name: String, span: Span },

    /// A statement referenced a column the table does not contain
    #[error("no such column '{column}' in table '{table}'")]
    UnknownColumn {
        table: String,
        column: String,
        span: Span,
    },

    /// A DROP for an object the schema does not contain
    #[error("no such {kind} '{name}' to drop")]
    UnknownObject {
        kind: String,
        name: String,
        span: Span,
    },
}

impl CatalogError {
    pub fn span(&self) -> Span {
        match self {
            CatalogError::DuplicateTable { span, .. }
            | CatalogError::DuplicateView { span, .. }
            | CatalogError::DuplicateColumn { span, .. }
            | CatalogError::UnknownTable { span, .. }
            | CatalogError::UnknownColumn { span, .. }
            | CatalogError::UnknownObject { span, .. } => *span,
        }
    }
}
