// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-dialect resolver layers.
//!
//! Each layer answers only for what its dialect introduces: functions from
//! its own registry layers and, where supported, the JSON path operators.
//! Everything else returns `None` and falls through to the ANSI terminal.

use crate::analyzer::Analyzer;
use crate::error::Diagnostic;
use crate::resolver::ansi::check_invocation;
use crate::resolver::DialectResolver;
use sqlgen_ir::{Dialect, Expr, FunctionCall, IntermediateType, SqliteVersion, StorageClass};

/// SQLite layer at a specific version
pub struct SqliteResolver {
    version: SqliteVersion,
}

impl SqliteResolver {
    pub fn new(version: SqliteVersion) -> Self {
        Self { version }
    }
}

impl DialectResolver for SqliteResolver {
    fn expr_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        expr: &Expr,
        _expected: Option<&IntermediateType>,
    ) -> Option<IntermediateType> {
        if self.version < SqliteVersion::V3_38 {
            return None;
        }
        json_path(cx, scope, expr)
    }

    fn call_type(
        &self,
        cx: &mut Analyzer<'_>,
        _scope: usize,
        call: &FunctionCall,
        args: &[IntermediateType],
    ) -> Option<IntermediateType> {
        let registry = cx.registry;
        for layer in Dialect::Sqlite(self.version).chain() {
            if layer == Dialect::Ansi {
                break;
            }
            if let Some(sig) = registry.layer_function(layer, &call.name) {
                check_invocation(cx, call, sig.kind);
                return Some(sig.rule.apply(args));
            }
        }
        None
    }
}

/// MySQL layer
pub struct MySqlResolver;

impl DialectResolver for MySqlResolver {
    fn expr_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        expr: &Expr,
        _expected: Option<&IntermediateType>,
    ) -> Option<IntermediateType> {
        json_path(cx, scope, expr)
    }

    fn call_type(
        &self,
        cx: &mut Analyzer<'_>,
        _scope: usize,
        call: &FunctionCall,
        args: &[IntermediateType],
    ) -> Option<IntermediateType> {
        layer_call(cx, Dialect::MySql, call, args)
    }
}

/// PostgreSQL layer
pub struct PostgresResolver;

impl DialectResolver for PostgresResolver {
    fn expr_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        expr: &Expr,
        _expected: Option<&IntermediateType>,
    ) -> Option<IntermediateType> {
        json_path(cx, scope, expr)
    }

    fn call_type(
        &self,
        cx: &mut Analyzer<'_>,
        _scope: usize,
        call: &FunctionCall,
        args: &[IntermediateType],
    ) -> Option<IntermediateType> {
        layer_call(cx, Dialect::PostgreSql, call, args)
    }
}

/// HSQL layer
pub struct HsqlResolver;

impl DialectResolver for HsqlResolver {
    fn expr_type(
        &self,
        _cx: &mut Analyzer<'_>,
        _scope: usize,
        _expr: &Expr,
        _expected: Option<&IntermediateType>,
    ) -> Option<IntermediateType> {
        None
    }

    fn call_type(
        &self,
        cx: &mut Analyzer<'_>,
        _scope: usize,
        call: &FunctionCall,
        args: &[IntermediateType],
    ) -> Option<IntermediateType> {
        layer_call(cx, Dialect::Hsql, call, args)
    }
}

fn layer_call(
    cx: &mut Analyzer<'_>,
    layer: Dialect,
    call: &FunctionCall,
    args: &[IntermediateType],
) -> Option<IntermediateType> {
    let registry = cx.registry;
    let sig = registry.layer_function(layer, &call.name)?;
    check_invocation(cx, call, sig.kind);
    Some(sig.rule.apply(args))
}

/// `doc -> '$.path'` and `doc ->> '$.path'` both yield nullable TEXT; the
/// left-hand side must hold a JSON document, which in this model is TEXT.
fn json_path(cx: &mut Analyzer<'_>, scope: usize, expr: &Expr) -> Option<IntermediateType> {
    let Expr::BinaryOp {
        left, op, right, ..
    } = expr
    else {
        return None;
    };
    if !op.is_json_path() {
        return None;
    }
    let subject = cx.infer_expr(scope, left, None);
    let acceptable = matches!(
        subject.storage_class,
        StorageClass::Text | StorageClass::Null | StorageClass::Argument
    );
    if !acceptable && !subject.unresolved {
        cx.report(Diagnostic::new(
            left.span(),
            format!(
                "JSON path operator applied to {} value",
                subject.storage_class
            ),
        ));
    }
    cx.infer_expr(scope, right, Some(&IntermediateType::text()));
    Some(IntermediateType::text().nullable(true))
}
