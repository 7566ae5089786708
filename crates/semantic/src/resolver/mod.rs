// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Chained type resolvers
//!
//! Expression typing runs through an explicit chain of resolvers: active
//! module resolvers first, then the dialect's own resolver, then the ANSI
//! terminal. A resolver returns `Some` to answer for a node and `None` to
//! pass it down the chain; the ANSI resolver answers for everything, so the
//! chain always terminates.
//!
//! Dialect resolvers consult only the registry layers their dialect
//! introduces; inherited functions fall through to the parent naturally.

mod ansi;
mod dialects;
mod json;

pub use ansi::AnsiResolver;
pub use dialects::{HsqlResolver, MySqlResolver, PostgresResolver, SqliteResolver};
pub use json::JsonResolver;

use crate::analyzer::Analyzer;
use sqlgen_ir::{Dialect, Expr, FunctionCall, IntermediateType, Module};

/// One link in the type-resolution chain
pub trait DialectResolver {
    /// Type an expression. `expected` is the type back-inferred from the
    /// surrounding context, consumed by bind parameters. `None` delegates
    /// to the next resolver.
    fn expr_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        expr: &Expr,
        expected: Option<&IntermediateType>,
    ) -> Option<IntermediateType>;

    /// Type a function invocation given already-typed arguments. `None`
    /// delegates to the next resolver.
    fn call_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        call: &FunctionCall,
        args: &[IntermediateType],
    ) -> Option<IntermediateType>;
}

/// Build the resolver chain for a dialect with the given modules active
pub fn resolver_chain(dialect: Dialect, modules: &[Module]) -> Vec<Box<dyn DialectResolver>> {
    let mut chain: Vec<Box<dyn DialectResolver>> = Vec::new();
    for module in modules {
        match module {
            Module::Json => chain.push(Box::new(JsonResolver)),
            _ => {}
        }
    }
    match dialect {
        Dialect::Sqlite(version) => chain.push(Box::new(SqliteResolver::new(version))),
        Dialect::MySql => chain.push(Box::new(MySqlResolver)),
        Dialect::PostgreSql => chain.push(Box::new(PostgresResolver)),
        Dialect::Hsql => chain.push(Box::new(HsqlResolver)),
        _ => {}
    }
    chain.push(Box::new(AnsiResolver));
    chain
}
