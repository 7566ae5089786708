// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SchemaBuilder
//!
//! Folds parsed schema statements into a [`Schema`], in source order.
//! Migration files are folded oldest-first, so ALTERs apply over whatever
//! the earlier files accumulated.
//!
//! Folding never fails fast: each statement that cannot be applied records
//! an error and is skipped, keeping the rest of the schema usable for
//! analysis.

use crate::error::CatalogError;
use crate::schema::{Column, Schema, Table, View};
use crate::typemap::{intermediate_type_for, is_lock};
use sqlgen_ir::{AlterAction, ColumnDef, ObjectKind, SqlFile, Statement};

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
    errors: Vec<CatalogError>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every schema statement in the file; queries and DML are ignored
    pub fn fold_file(&mut self, file: &SqlFile) {
        for labeled in &file.statements {
            self.apply(&labeled.statement);
        }
    }

    /// Apply a single statement to the accumulated schema
    pub fn apply(&mut self, statement: &Statement) {
        match statement {
            Statement::CreateTable(create) => {
                if self.schema.table(&create.name).is_some() {
                    self.errors.push(CatalogError::DuplicateTable {
                        name: create.name.clone(),
                        span: create.span,
                    });
                    return;
                }
                let mut columns: Vec<Column> = Vec::with_capacity(create.columns.len());
                for def in &create.columns {
                    if columns.iter().any(|c| c.name.eq_ignore_ascii_case(&def.name)) {
                        self.errors.push(CatalogError::DuplicateColumn {
                            table: create.name.clone(),
                            column: def.name.clone(),
                            span: def.span,
                        });
                        continue;
                    }
                    columns.push(column_from_def(def));
                }
                tracing::debug!(table = %create.name, columns = columns.len(), "table added");
                self.schema.push_table(Table {
                    name: create.name.clone(),
                    columns,
                });
            }
            Statement::CreateView(create) => {
                if self.schema.view(&create.name).is_some()
                    || self.schema.table(&create.name).is_some()
                {
                    self.errors.push(CatalogError::DuplicateView {
                        name: create.name.clone(),
                        span: create.span,
                    });
                    return;
                }
                self.schema.push_view(View {
                    name: create.name.clone(),
                    columns: create.columns.clone(),
                    query: create.query.clone(),
                });
            }
            Statement::CreateIndex(create) => {
                let Some(table) = self.schema.table(&create.table) else {
                    self.errors.push(CatalogError::UnknownTable {
                        name: create.table.clone(),
                        span: create.span,
                    });
                    return;
                };
                for column in &create.columns {
                    if table.column(column).is_none() {
                        self.errors.push(CatalogError::UnknownColumn {
                            table: create.table.clone(),
                            column: column.clone(),
                            span: create.span,
                        });
                    }
                }
            }
            Statement::CreateTrigger(create) => {
                if self.schema.table(&create.table).is_none() {
                    self.errors.push(CatalogError::UnknownTable {
                        name: create.table.clone(),
                        span: create.span,
                    });
                }
            }
            Statement::AlterTable(alter) => self.apply_alter(alter),
            Statement::Drop(drop) => self.apply_drop(drop),
            // Queries and DML have no schema effect
            _ => {}
        }
    }

    fn apply_alter(&mut self, alter: &sqlgen_ir::AlterTable) {
        let Some(table) = self.schema.table_mut(&alter.table) else {
            self.errors.push(CatalogError::UnknownTable {
                name: alter.table.clone(),
                span: alter.span,
            });
            return;
        };
        match &alter.action {
            AlterAction::AddColumn(def) => {
                if table.column(&def.name).is_some() {
                    self.errors.push(CatalogError::DuplicateColumn {
                        table: alter.table.clone(),
                        column: def.name.clone(),
                        span: def.span,
                    });
                    return;
                }
                table.columns.push(column_from_def(def));
            }
            AlterAction::RenameTo(new_name) => {
                table.name = new_name.clone();
            }
            AlterAction::RenameColumn { from, to } => {
                match table.columns.iter_mut().find(|c| c.name.eq_ignore_ascii_case(from)) {
                    Some(column) => column.name = to.clone(),
                    None => self.errors.push(CatalogError::UnknownColumn {
                        table: alter.table.clone(),
                        column: from.clone(),
                        span: alter.span,
                    }),
                }
            }
            AlterAction::DropColumn(name) => {
                let before = table.columns.len();
                table.columns.retain(|c| !c.name.eq_ignore_ascii_case(name));
                if table.columns.len() == before {
                    self.errors.push(CatalogError::UnknownColumn {
                        table: alter.table.clone(),
                        column: name.clone(),
                        span: alter.span,
                    });
                }
            }
        }
    }

    fn apply_drop(&mut self, drop: &sqlgen_ir::Drop) {
        let removed = match drop.kind {
            ObjectKind::Table => self.schema.remove_table(&drop.name),
            ObjectKind::View => self.schema.remove_view(&drop.name),
            // Indexes and triggers are validated at creation but not tracked
            ObjectKind::Index | ObjectKind::Trigger => true,
        };
        if !removed && !drop.if_exists {
            let kind = match drop.kind {
                ObjectKind::Table => "table",
                ObjectKind::View => "view",
                ObjectKind::Index => "index",
                ObjectKind::Trigger => "trigger",
            };
            self.errors.push(CatalogError::UnknownObject {
                kind: kind.to_string(),
                name: drop.name.clone(),
                span: drop.span,
            });
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn errors(&self) -> &[CatalogError] {
        &self.errors
    }

    pub fn finish(self) -> (Schema, Vec<CatalogError>) {
        (self.schema, self.errors)
    }
}

fn column_from_def(def: &ColumnDef) -> Column {
    Column {
        name: def.name.clone(),
        declared_type: def.declared_type.clone(),
        ty: intermediate_type_for(&def.declared_type).nullable(!def.not_null),
        lock: is_lock(&def.declared_type),
    }
}
