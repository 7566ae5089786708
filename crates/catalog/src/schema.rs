// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema
//!
//! The accumulated result of folding schema statements: tables with typed
//! columns, and views retaining their defining query so the result shape can
//! be computed lazily against whatever schema state exists when the view is
//! referenced.

use serde::{Deserialize, Serialize};
use sqlgen_ir::{IntermediateType, Select};

/// One typed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Declared type as written in the source
    pub declared_type: String,
    pub ty: IntermediateType,
    /// Declared as the table's optimistic-lock version counter
    #[serde(default)]
    pub lock: bool,
}

/// One table with its columns in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// One view, shape unevaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    /// Explicit column aliases, if the definition carried them
    pub columns: Option<Vec<String>>,
    pub query: Select,
}

/// Tables and views accumulated so far, in definition order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    tables: Vec<Table>,
    views: Vec<View>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name.eq_ignore_ascii_case(name))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub(crate) fn push_view(&mut self, view: View) {
        self.views.push(view);
    }

    pub(crate) fn remove_table(&mut self, name: &str) -> bool {
        let before = self.tables.len();
        self.tables.retain(|t| !t.name.eq_ignore_ascii_case(name));
        self.tables.len() != before
    }

    pub(crate) fn remove_view(&mut self, name: &str) -> bool {
        let before = self.views.len();
        self.views.retain(|v| !v.name.eq_ignore_ascii_case(name));
        self.views.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut schema = Schema::new();
        schema.push_table(Table {
            name: "Users".to_string(),
            columns: vec![Column {
                name: "Id".to_string(),
                declared_type: "INTEGER".to_string(),
                ty: IntermediateType::integer(),
                lock: false,
            }],
        });
        let table = schema.table("users").unwrap();
        assert!(table.column("id").is_some());
        assert!(table.column("missing").is_none());
    }
}
