// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! This module represents SQL expressions in the syntax tree.
//!
//! ## Design
//!
//! Expressions form a tree where complex expressions contain sub-expressions:
//!
//! - **Column references**: `table.column` or unqualified `column`
//! - **Literal values**: numbers, strings, blobs, NULL
//! - **Bind parameters**: `?`, `?N`, `:name`, `$N`, `@name`
//! - **Binary operations**: arithmetic, comparison, logical, concatenation,
//!   JSON path operators
//! - **Unary operations**: negation, NOT
//! - **Function calls**: with optional DISTINCT and an optional OVER clause
//! - **CASE expressions**: with or without an operand
//! - **CAST**, **BETWEEN**, **IN** (list or subquery), **EXISTS**, scalar
//!   subqueries
//!
//! Every node carries a [`Span`] so diagnostics can point back into the
//! source file.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A SQL expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Expr {
    /// Column reference (e.g., `table.column` or just `column`)
    Column(ColumnRef),

    /// Literal value
    Literal { value: Literal, span: Span },

    /// Bind parameter placeholder
    Bind(BindParameter),

    /// Binary operation (e.g., `a + b`, `x = 5`, `doc -> '$.x'`)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },

    /// Unary operation (e.g., `-x`, `NOT a`)
    UnaryOp {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },

    /// `expr IS [NOT] NULL`
    IsNull {
        expr: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `expr [NOT] BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
        span: Span,
    },

    /// `expr [NOT] IN (a, b, c)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
        span: Span,
    },

    /// `expr [NOT] IN (SELECT ...)`
    InSubquery {
        expr: Box<Expr>,
        query: Box<crate::stmt::Select>,
        negated: bool,
        span: Span,
    },

    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        query: Box<crate::stmt::Select>,
        negated: bool,
        span: Span,
    },

    /// Scalar subquery `(SELECT ...)`
    Subquery {
        query: Box<crate::stmt::Select>,
        span: Span,
    },

    /// Function call (e.g., `COUNT(*)`, `MAX(column)`, `ROW_NUMBER() OVER ()`)
    Function(FunctionCall),

    /// CASE expression
    Case {
        operand: Option<Box<Expr>>,
        branches: Vec<CaseBranch>,
        else_branch: Option<Box<Expr>>,
        span: Span,
    },

    /// `CAST(expr AS type)`
    Cast {
        expr: Box<Expr>,
        target_type: String,
        span: Span,
    },
}

impl Expr {
    /// Source position of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Column(c) => c.span,
            Expr::Literal { span, .. } => *span,
            Expr::Bind(b) => b.span,
            Expr::BinaryOp { span, .. } => *span,
            Expr::UnaryOp { span, .. } => *span,
            Expr::IsNull { span, .. } => *span,
            Expr::Between { span, .. } => *span,
            Expr::InList { span, .. } => *span,
            Expr::InSubquery { span, .. } => *span,
            Expr::Exists { span, .. } => *span,
            Expr::Subquery { span, .. } => *span,
            Expr::Function(f) => f.span,
            Expr::Case { span, .. } => *span,
            Expr::Cast { span, .. } => *span,
        }
    }

    /// A short source-like rendering used to name unaliased result columns
    pub fn display_name(&self) -> String {
        match self {
            Expr::Column(c) => c.column.clone(),
            Expr::Function(f) => f.name.to_lowercase(),
            Expr::Literal { value, .. } => value.to_string(),
            Expr::Cast { expr, .. } => expr.display_name(),
            _ => "expr".to_string(),
        }
    }

    /// Whether this expression references the named column, qualified or
    /// not. Subqueries are not descended into; a reference there belongs to
    /// the subquery's own scope.
    pub fn references_column(&self, name: &str) -> bool {
        match self {
            Expr::Column(c) => c.column.eq_ignore_ascii_case(name),
            Expr::Literal { .. } | Expr::Bind(_) => false,
            Expr::BinaryOp { left, right, .. } => {
                left.references_column(name) || right.references_column(name)
            }
            Expr::UnaryOp { expr, .. }
            | Expr::IsNull { expr, .. }
            | Expr::Cast { expr, .. }
            | Expr::InSubquery { expr, .. } => expr.references_column(name),
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.references_column(name)
                    || low.references_column(name)
                    || high.references_column(name)
            }
            Expr::InList { expr, list, .. } => {
                expr.references_column(name)
                    || list.iter().any(|e| e.references_column(name))
            }
            Expr::Exists { .. } | Expr::Subquery { .. } => false,
            Expr::Function(f) => f.args.iter().any(|a| a.references_column(name)),
            Expr::Case {
                operand,
                branches,
                else_branch,
                ..
            } => {
                operand.as_deref().is_some_and(|o| o.references_column(name))
                    || branches.iter().any(|b| {
                        b.condition.references_column(name)
                            || b.result.references_column(name)
                    })
                    || else_branch
                        .as_deref()
                        .is_some_and(|e| e.references_column(name))
            }
        }
    }
}

/// A column reference with optional table qualification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Optional table name or alias qualifier
    pub table: Option<String>,
    /// Column name
    pub column: String,
    pub span: Span,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
            span: Span::default(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Literal {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
    /// Hex blob literal, e.g. `x'53514C'` (payload without quotes)
    Blob(String),
    Boolean(bool),
    /// CURRENT_TIMESTAMP / CURRENT_DATE / CURRENT_TIME
    CurrentTimestamp,
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Integer(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::String(v) => write!(f, "'{v}'"),
            Literal::Blob(v) => write!(f, "x'{v}'"),
            Literal::Boolean(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            Literal::CurrentTimestamp => write!(f, "CURRENT_TIMESTAMP"),
        }
    }
}

/// A bind parameter placeholder whose type is back-inferred from context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindParameter {
    pub kind: BindParameterKind,
    pub span: Span,
}

/// Placeholder syntax variants
///
/// Numbered parameters referring to the same index must unify to a single
/// type across all of their usage sites; the same holds for named parameters
/// sharing a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindParameterKind {
    /// `?`
    Anonymous,
    /// `?N` (SQLite) or `$N` (PostgreSQL)
    Numbered(u32),
    /// `:name` or `@name`
    Named(String),
}

impl std::fmt::Display for BindParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindParameterKind::Anonymous => write!(f, "?"),
            BindParameterKind::Numbered(n) => write!(f, "?{n}"),
            BindParameterKind::Named(name) => write!(f, ":{name}"),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
    // String
    Like,
    NotLike,
    Concat,
    // NULL-aware equality
    Is,
    IsNot,
    // JSON path operators (dialect-gated by the grammar)
    JsonExtract,
    JsonExtractText,
}

impl BinaryOp {
    /// Whether this operator yields a boolean-flavored INTEGER
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Like
                | BinaryOp::NotLike
                | BinaryOp::Is
                | BinaryOp::IsNot
        )
    }

    /// Whether this is one of the JSON path operators
    pub fn is_json_path(self) -> bool {
        matches!(self, BinaryOp::JsonExtract | BinaryOp::JsonExtractText)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnaryOp {
    /// Numeric negation (-x)
    Neg,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~x)
    BitNot,
}

/// A function invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name as written (matched case-insensitively)
    pub name: String,
    /// Arguments; empty for `f()`
    pub args: Vec<Expr>,
    /// `COUNT(*)` style wildcard argument
    pub wildcard: bool,
    /// `COUNT(DISTINCT x)` modifier
    pub distinct: bool,
    /// Window invocation (`... OVER (...)`)
    pub over: Option<WindowSpec>,
    pub span: Span,
}

impl FunctionCall {
    /// Whether this call is a window-function invocation
    pub fn is_window(&self) -> bool {
        self.over.is_some()
    }
}

/// A window definition attached to a function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderingTerm>,
}

/// One `WHEN ... THEN ...` arm of a CASE expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranch {
    pub condition: Expr,
    pub result: Expr,
}

/// An ORDER BY term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingTerm {
    pub expr: Expr,
    pub descending: bool,
    /// `NULLS FIRST` / `NULLS LAST`, when the dialect supports it
    pub nulls_first: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_column() {
        let expr = Expr::Column(ColumnRef::new("total").with_table("orders"));
        assert_eq!(expr.display_name(), "total");
    }

    #[test]
    fn test_display_name_function() {
        let expr = Expr::Function(FunctionCall {
            name: "COUNT".to_string(),
            args: vec![],
            wildcard: true,
            distinct: false,
            over: None,
            span: Span::default(),
        });
        assert_eq!(expr.display_name(), "count");
    }

    #[test]
    fn test_comparison_classification() {
        assert!(BinaryOp::Eq.is_comparison());
        assert!(BinaryOp::Is.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(!BinaryOp::JsonExtract.is_comparison());
    }

    #[test]
    fn test_json_path_classification() {
        assert!(BinaryOp::JsonExtract.is_json_path());
        assert!(BinaryOp::JsonExtractText.is_json_path());
        assert!(!BinaryOp::Concat.is_json_path());
    }
}
