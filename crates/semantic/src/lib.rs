// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Semantic analysis
//!
//! Symbol resolution, type inference and validation over parsed statements.
//!
//! Analysis runs one statement at a time against a folded
//! [`Schema`](sqlgen_catalog::Schema): scopes are built for every SELECT
//! core, expressions are typed through an explicit chain of dialect
//! resolvers terminating at the ANSI base, bind parameter types are
//! back-inferred from their usage sites, and every problem becomes a
//! [`Diagnostic`] instead of an early return. View result shapes are
//! computed lazily on first reference and cached per analysis generation.

pub mod analyzer;
pub mod binder;
pub mod error;
pub mod lazy_query;
pub mod mixin;
pub mod resolver;
pub mod scope;
pub mod symbol;
pub mod validator;

pub use analyzer::{Analyzer, StatementAnalysis};
pub use binder::{BindSite, Binder};
pub use error::{Diagnostic, DiagnosticSink, SemanticError, SemanticResult};
pub use lazy_query::{QueryColumn, ShapeCache};
pub use mixin::{ColumnExposure, MixinRegistry};
pub use resolver::{resolver_chain, AnsiResolver, DialectResolver};
pub use scope::{Scope, ScopeManager, ScopeType};
pub use symbol::{ColumnSymbol, TableSymbol};
pub use validator::{FileValidation, Validator};
