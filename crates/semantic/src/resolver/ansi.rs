// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The SQL-92 terminal resolver: answers for every construct so the chain
//! never falls off the end.

use crate::analyzer::Analyzer;
use crate::error::Diagnostic;
use crate::resolver::DialectResolver;
use sqlgen_ir::{
    BinaryOp, Dialect, Expr, FunctionCall, IntermediateType, Literal, StorageClass, UnaryOp,
};
use sqlgen_function_registry::FunctionKind;

/// Terminal resolver for the ANSI base dialect
pub struct AnsiResolver;

impl DialectResolver for AnsiResolver {
    fn expr_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        expr: &Expr,
        expected: Option<&IntermediateType>,
    ) -> Option<IntermediateType> {
        Some(self.resolve(cx, scope, expr, expected))
    }

    fn call_type(
        &self,
        cx: &mut Analyzer<'_>,
        _scope: usize,
        call: &FunctionCall,
        args: &[IntermediateType],
    ) -> Option<IntermediateType> {
        let sig = cx.registry.layer_function(Dialect::Ansi, &call.name)?;
        check_invocation(cx, call, sig.kind);
        Some(sig.rule.apply(args))
    }
}

/// Shared invocation-shape checks, run by whichever layer resolves the call
pub(super) fn check_invocation(cx: &mut Analyzer<'_>, call: &FunctionCall, kind: FunctionKind) {
    if kind == FunctionKind::Window && !call.is_window() {
        cx.report(Diagnostic::new(
            call.span,
            format!(
                "{} is a window function and requires an OVER clause",
                call.name.to_lowercase()
            ),
        ));
    }
    if kind == FunctionKind::Scalar && call.is_window() {
        cx.report(Diagnostic::new(
            call.span,
            format!("{} may not be used with OVER", call.name.to_lowercase()),
        ));
    }
    if call.wildcard && !call.name.eq_ignore_ascii_case("COUNT") {
        cx.report(Diagnostic::new(
            call.span,
            format!("{}(*) is not valid", call.name.to_lowercase()),
        ));
    }
}

impl AnsiResolver {
    fn resolve(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        expr: &Expr,
        expected: Option<&IntermediateType>,
    ) -> IntermediateType {
        match expr {
            Expr::Column(column) => cx.resolve_column_ref(scope, column),

            Expr::Literal { value, .. } => literal_type(value),

            Expr::Bind(bind) => {
                let ty = match expected {
                    Some(e) if e.storage_class != StorageClass::Null && !e.is_argument() => {
                        e.clone()
                    }
                    _ => IntermediateType::argument(),
                };
                cx.binder.record(bind, ty.clone());
                ty
            }

            Expr::BinaryOp {
                left, op, right, ..
            } => self.binary_type(cx, scope, left, *op, right),

            Expr::UnaryOp { op, expr, .. } => {
                let inner = cx.infer_expr(scope, expr, None);
                match op {
                    UnaryOp::Not => IntermediateType::boolean().nullable(inner.nullable),
                    UnaryOp::BitNot => IntermediateType::integer().nullable(inner.nullable),
                    UnaryOp::Neg => {
                        let class = match inner.storage_class {
                            StorageClass::Real => StorageClass::Real,
                            _ => StorageClass::Integer,
                        };
                        IntermediateType::new(class).nullable(inner.nullable)
                    }
                    _ => inner,
                }
            }

            // IS NULL is never itself NULL
            Expr::IsNull { expr, .. } => {
                cx.infer_expr(scope, expr, None);
                IntermediateType::boolean()
            }

            Expr::Between {
                expr, low, high, ..
            } => {
                let subject = cx.infer_expr(scope, expr, None);
                let low_ty = cx.infer_expr(scope, low, Some(&subject));
                let high_ty = cx.infer_expr(scope, high, Some(&subject));
                IntermediateType::boolean()
                    .nullable(subject.nullable || low_ty.nullable || high_ty.nullable)
            }

            Expr::InList { expr, list, .. } => {
                let subject = cx.infer_expr(scope, expr, None);
                let mut nullable = subject.nullable;
                for item in list {
                    nullable |= cx.infer_expr(scope, item, Some(&subject)).nullable;
                }
                IntermediateType::boolean().nullable(nullable)
            }

            Expr::InSubquery {
                expr, query, span, ..
            } => {
                let shape = cx.subquery_shape(query, scope);
                if shape.len() != 1 {
                    cx.report(Diagnostic::new(
                        *span,
                        format!("IN subquery must return one column, got {}", shape.len()),
                    ));
                }
                let expected = shape.first().map(|c| c.ty.clone());
                let subject = cx.infer_expr(scope, expr, expected.as_ref());
                IntermediateType::boolean().nullable(subject.nullable)
            }

            Expr::Exists { query, .. } => {
                cx.subquery_shape(query, scope);
                IntermediateType::boolean()
            }

            Expr::Subquery { query, span } => {
                let shape = cx.subquery_shape(query, scope);
                if shape.len() != 1 {
                    cx.report(Diagnostic::new(
                        *span,
                        format!(
                            "scalar subquery must return one column, got {}",
                            shape.len()
                        ),
                    ));
                }
                match shape.into_iter().next() {
                    // An empty result set surfaces as NULL
                    Some(column) => column.ty.nullable(true),
                    None => IntermediateType::unresolved(),
                }
            }

            Expr::Function(call) => cx.resolve_call(scope, call),

            Expr::Case {
                operand,
                branches,
                else_branch,
                ..
            } => {
                let operand_ty = operand.as_ref().map(|o| cx.infer_expr(scope, o, None));
                let mut results = Vec::with_capacity(branches.len() + 1);
                for branch in branches {
                    cx.infer_expr(scope, &branch.condition, operand_ty.as_ref());
                    results.push(cx.infer_expr(scope, &branch.result, None));
                }
                match else_branch {
                    Some(e) => results.push(cx.infer_expr(scope, e, None)),
                    // A missing ELSE contributes NULL
                    None => results.push(IntermediateType::null()),
                }
                IntermediateType::encapsulating(&results)
            }

            Expr::Cast {
                expr, target_type, ..
            } => {
                let target = sqlgen_catalog::intermediate_type_for(target_type);
                let inner = cx.infer_expr(scope, expr, Some(&target));
                target.nullable(inner.nullable)
            }

            _ => IntermediateType::unresolved(),
        }
    }

    fn binary_type(
        &self,
        cx: &mut Analyzer<'_>,
        scope: usize,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
    ) -> IntermediateType {
        // JSON path operators reaching the base layer type as nullable TEXT;
        // the dialect layers add LHS validation on top.
        if op.is_json_path() {
            let _ = cx.infer_expr(scope, left, None);
            let _ = cx.infer_expr(scope, right, Some(&IntermediateType::text()));
            return IntermediateType::text().nullable(true);
        }

        // Bind parameters take the type of the opposite side, so type the
        // non-bind side first.
        let bind_left = matches!(left, Expr::Bind(_));
        let bind_right = matches!(right, Expr::Bind(_));
        let (left_ty, right_ty) = if bind_left && !bind_right {
            let rt = cx.infer_expr(scope, right, None);
            let expected = partner_type(&rt, op);
            let lt = cx.infer_expr(scope, left, expected.as_ref());
            (lt, rt)
        } else {
            let lt = cx.infer_expr(scope, left, None);
            let expected = partner_type(&lt, op);
            let rt = cx.infer_expr(scope, right, expected.as_ref());
            (lt, rt)
        };
        let nullable = left_ty.nullable || right_ty.nullable;

        if op.is_comparison() {
            return IntermediateType::boolean().nullable(nullable);
        }
        match op {
            BinaryOp::Concat => IntermediateType::text().nullable(nullable),
            _ => {
                // Arithmetic: REAL if either side is REAL, INTEGER otherwise
                let class = if left_ty.storage_class == StorageClass::Real
                    || right_ty.storage_class == StorageClass::Real
                {
                    StorageClass::Real
                } else {
                    StorageClass::Integer
                };
                IntermediateType::new(class).nullable(nullable)
            }
        }
    }
}

/// The type a bind parameter inherits from its comparison partner. NULL-aware
/// equality (`IS` / `IS NOT`) additionally admits NULL on the bind side.
fn partner_type(partner: &IntermediateType, op: BinaryOp) -> Option<IntermediateType> {
    if partner.is_argument() || partner.storage_class == StorageClass::Null {
        return None;
    }
    let ty = partner.clone();
    match op {
        BinaryOp::Is | BinaryOp::IsNot => Some(ty.nullable(true)),
        _ => Some(ty),
    }
}

fn literal_type(value: &Literal) -> IntermediateType {
    match value {
        Literal::Null => IntermediateType::null(),
        Literal::Integer(_) => IntermediateType::integer(),
        Literal::Float(_) => IntermediateType::real(),
        Literal::String(_) => IntermediateType::text(),
        Literal::Blob(_) => IntermediateType::blob(),
        Literal::Boolean(_) => IntermediateType::boolean(),
        Literal::CurrentTimestamp => IntermediateType::text(),
        _ => IntermediateType::unresolved(),
    }
}
