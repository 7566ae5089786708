// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Symbol types for semantic analysis
//!
//! Tables and columns as they appear to a query: a table symbol may stand
//! for a real table, a view, a CTE or a FROM-clause subquery, and its
//! columns carry the inferred [`IntermediateType`] rather than a declared
//! SQL type.

use serde::{Deserialize, Serialize};
use sqlgen_ir::IntermediateType;

/// A table-like source visible in a scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSymbol {
    /// Underlying table/view/CTE name
    pub table_name: String,

    /// Optional alias (e.g. `u` in `FROM users u`)
    pub alias: Option<String>,

    /// Columns this source exposes
    pub columns: Vec<ColumnSymbol>,
}

impl TableSymbol {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            alias: None,
            columns: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnSymbol>) -> Self {
        self.columns = columns;
        self
    }

    /// Whether `name` refers to this source. An aliased source is only
    /// reachable through its alias.
    pub fn matches(&self, name: &str) -> bool {
        match &self.alias {
            Some(alias) => alias.eq_ignore_ascii_case(name),
            None => self.table_name.eq_ignore_ascii_case(name),
        }
    }

    /// Alias if present, otherwise the table name
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table_name)
    }

    pub fn find_column(&self, name: &str) -> Option<&ColumnSymbol> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Force every column nullable; applied to the weak side of an outer
    /// join.
    pub fn nullable(mut self) -> Self {
        for column in &mut self.columns {
            column.ty.nullable = true;
        }
        self
    }

    /// Hide the named columns from wildcard expansion and unqualified
    /// lookup; used for the right-hand copies of USING/NATURAL join columns.
    pub fn hide_columns(&mut self, names: &[String]) {
        for column in &mut self.columns {
            if names.iter().any(|n| n.eq_ignore_ascii_case(&column.name)) {
                column.hidden = true;
            }
        }
    }
}

/// One column exposed by a table symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSymbol {
    pub name: String,
    pub ty: IntermediateType,
    /// Source this column came from, for diagnostics
    pub table_name: String,
    /// Excluded from `*` expansion and unqualified resolution
    #[serde(default)]
    pub hidden: bool,
}

impl ColumnSymbol {
    pub fn new(
        name: impl Into<String>,
        ty: IntermediateType,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            table_name: table_name.into(),
            hidden: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_shadows_table_name() {
        let table = TableSymbol::new("users").with_alias("u");
        assert!(table.matches("u"));
        assert!(!table.matches("users"));
        assert_eq!(table.display_name(), "u");

        let plain = TableSymbol::new("users");
        assert!(plain.matches("USERS"));
    }

    #[test]
    fn test_nullable_weakens_all_columns() {
        let table = TableSymbol::new("orders")
            .with_columns(vec![
                ColumnSymbol::new("id", IntermediateType::integer(), "orders"),
                ColumnSymbol::new("total", IntermediateType::real(), "orders"),
            ])
            .nullable();
        assert!(table.columns.iter().all(|c| c.ty.nullable));
    }

    #[test]
    fn test_hide_columns_marks_only_named() {
        let mut table = TableSymbol::new("b").with_columns(vec![
            ColumnSymbol::new("id", IntermediateType::integer(), "b"),
            ColumnSymbol::new("label", IntermediateType::text(), "b"),
        ]);
        table.hide_columns(&["id".to_string()]);
        assert!(table.find_column("id").unwrap().hidden);
        assert!(!table.find_column("label").unwrap().hidden);
    }
}
