// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The JSON module layer: function lookups against the module table, wrapped
//! around whatever dialect chain is active.

use crate::analyzer::Analyzer;
use crate::resolver::ansi::check_invocation;
use crate::resolver::DialectResolver;
use sqlgen_ir::{Expr, FunctionCall, IntermediateType, Module};

pub struct JsonResolver;

impl DialectResolver for JsonResolver {
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
        let registry = cx.registry;
        let sig = registry.module_function(Module::Json, &call.name)?;
        check_invocation(cx, call, sig.kind);
        Some(sig.rule.apply(args))
    }
}
