// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Element mixins
//!
//! Behavior overrides keyed by the syntax node they apply to. A mixin
//! returns `Some` to claim a node and `None` to delegate to the default
//! logic; delegation is always explicit, never implicit inheritance.
//!
//! The one required override: a result column wrapping a window-function
//! invocation exposes exactly one column, named by its alias or else the
//! expression text, instead of deriving columns from its constituents.

use crate::lazy_query::QueryColumn;
use sqlgen_ir::{Expr, IntermediateType, ResultColumn};

/// Override for how a result column exposes columns in a query shape
pub trait ColumnExposure {
    /// `Some(columns)` claims the node, `None` delegates to the default
    fn expose(&self, column: &ResultColumn, inferred: &IntermediateType)
        -> Option<Vec<QueryColumn>>;
}

/// A window-function result column exposes exactly one column
pub struct WindowFunctionExposure;

impl ColumnExposure for WindowFunctionExposure {
    fn expose(
        &self,
        column: &ResultColumn,
        inferred: &IntermediateType,
    ) -> Option<Vec<QueryColumn>> {
        let ResultColumn::Expr { expr, alias } = column else {
            return None;
        };
        let Expr::Function(call) = expr else {
            return None;
        };
        if !call.is_window() {
            return None;
        }
        let name = alias.clone().unwrap_or_else(|| expr.display_name());
        Some(vec![QueryColumn::new(name, inferred.clone())])
    }
}

/// Registry of active mixins, consulted in registration order
#[derive(Default)]
pub struct MixinRegistry {
    exposures: Vec<Box<dyn ColumnExposure>>,
}

impl MixinRegistry {
    /// Registry with the standard overrides installed
    pub fn standard() -> Self {
        let mut registry = Self::default();
        registry.register(Box::new(WindowFunctionExposure));
        registry
    }

    pub fn register(&mut self, exposure: Box<dyn ColumnExposure>) {
        self.exposures.push(exposure);
    }

    /// First mixin claiming the node wins; `None` means use the default
    pub fn expose(
        &self,
        column: &ResultColumn,
        inferred: &IntermediateType,
    ) -> Option<Vec<QueryColumn>> {
        self.exposures
            .iter()
            .find_map(|m| m.expose(column, inferred))
    }
}

impl std::fmt::Debug for MixinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixinRegistry")
            .field("exposures", &self.exposures.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{FunctionCall, Span, WindowSpec};

    fn window_call(alias: Option<&str>) -> ResultColumn {
        ResultColumn::Expr {
            expr: Expr::Function(FunctionCall {
                name: "ROW_NUMBER".to_string(),
                args: vec![],
                wildcard: false,
                distinct: false,
                over: Some(WindowSpec {
                    partition_by: vec![],
                    order_by: vec![],
                }),
                span: Span::default(),
            }),
            alias: alias.map(str::to_string),
        }
    }

    #[test]
    fn test_window_column_exposes_single_named_column() {
        let registry = MixinRegistry::standard();
        let ty = IntermediateType::integer();

        let exposed = registry.expose(&window_call(Some("rn")), &ty).unwrap();
        assert_eq!(exposed.len(), 1);
        assert_eq!(exposed[0].name, "rn");

        let exposed = registry.expose(&window_call(None), &ty).unwrap();
        assert_eq!(exposed[0].name, "row_number");
    }

    #[test]
    fn test_non_window_columns_delegate() {
        let registry = MixinRegistry::standard();
        let plain = ResultColumn::Expr {
            expr: Expr::Column(sqlgen_ir::ColumnRef::new("id")),
            alias: None,
        };
        assert!(registry.expose(&plain, &IntermediateType::integer()).is_none());
    }
}
