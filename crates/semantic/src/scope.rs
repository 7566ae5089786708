// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scope management for semantic analysis
//!
//! Scopes form a tree mirroring query nesting: each SELECT core gets a
//! scope holding its FROM/JOIN sources, CTEs live in a tier of their own,
//! and correlated subqueries reach outward through the parent chain.
//!
//! Resolution order for an unqualified column: sources at the nearest level
//! first (an ambiguity there is an error, not a walk further out), then
//! outer levels. Child scopes shadow parents and never mutate them.

use crate::error::{SemanticError, SemanticResult};
use crate::symbol::{ColumnSymbol, TableSymbol};

/// Type of scope in a SQL query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeType {
    /// Top-level statement scope
    Query,
    /// Nested subquery scope
    Subquery,
}

/// One lexical scope
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub id: usize,
    pub parent_id: Option<usize>,
    /// FROM/JOIN sources at this level
    pub tables: Vec<TableSymbol>,
    /// CTE shapes visible at this level, consulted when a FROM reference
    /// does not name a real table
    pub ctes: Vec<TableSymbol>,
    pub scope_type: ScopeType,
}

impl Scope {
    pub fn new(id: usize, scope_type: ScopeType) -> Self {
        Self {
            id,
            parent_id: None,
            tables: Vec::new(),
            ctes: Vec::new(),
            scope_type,
        }
    }

    pub fn find_table(&self, name: &str) -> Option<&TableSymbol> {
        self.tables.iter().find(|t| t.matches(name))
    }

    pub fn find_cte(&self, name: &str) -> Option<&TableSymbol> {
        self.ctes.iter().find(|t| t.matches(name))
    }

    /// Add a FROM/JOIN source, rejecting duplicate display names
    pub fn add_table(&mut self, table: TableSymbol) -> SemanticResult<()> {
        let name = table.display_name();
        if self
            .tables
            .iter()
            .any(|t| t.display_name().eq_ignore_ascii_case(name))
        {
            return Err(SemanticError::DuplicateAlias(name.to_string()));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Register a CTE shape; a later CTE with the same name shadows an
    /// earlier one at the same level
    pub fn add_cte(&mut self, cte: TableSymbol) {
        self.ctes.retain(|t| !t.matches(cte.display_name()));
        self.ctes.push(cte);
    }
}

/// Owns all scopes of one statement analysis
#[derive(Debug, Clone, Default)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
}

impl ScopeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_scope(&mut self, scope_type: ScopeType, parent_id: Option<usize>) -> usize {
        let id = self.scopes.len();
        let mut scope = Scope::new(id, scope_type);
        scope.parent_id = parent_id;
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: usize) -> &Scope {
        &self.scopes[id]
    }

    pub fn get_mut(&mut self, id: usize) -> &mut Scope {
        &mut self.scopes[id]
    }

    /// Resolve a CTE shape by name, walking outward
    pub fn resolve_cte(&self, name: &str, scope_id: usize) -> Option<&TableSymbol> {
        let mut current = Some(scope_id);
        while let Some(id) = current {
            let scope = self.get(id);
            if let Some(cte) = scope.find_cte(name) {
                return Some(cte);
            }
            current = scope.parent_id;
        }
        None
    }

    /// Resolve a table name or alias against the scope chain
    pub fn resolve_table(&self, name: &str, scope_id: usize) -> SemanticResult<&TableSymbol> {
        let mut current = Some(scope_id);
        while let Some(id) = current {
            let scope = self.get(id);
            if let Some(table) = scope.find_table(name) {
                return Ok(table);
            }
            current = scope.parent_id;
        }
        Err(SemanticError::TableNotFound(name.to_string()))
    }

    /// Resolve an unqualified column. The nearest level with at least one
    /// match answers: exactly one match there succeeds, more than one is
    /// ambiguous. Hidden columns (merged USING/NATURAL copies) do not
    /// participate.
    pub fn resolve_column(
        &self,
        name: &str,
        scope_id: usize,
    ) -> SemanticResult<(&TableSymbol, &ColumnSymbol)> {
        let mut current = Some(scope_id);
        while let Some(id) = current {
            let scope = self.get(id);
            let mut found = Vec::new();
            for table in &scope.tables {
                if let Some(column) = table.find_column(name) {
                    if !column.hidden {
                        found.push((table, column));
                    }
                }
            }
            match found.len() {
                0 => current = scope.parent_id,
                1 => return Ok(found[0]),
                _ => {
                    let tables = found
                        .iter()
                        .map(|(t, _)| t.display_name().to_string())
                        .collect();
                    return Err(SemanticError::AmbiguousColumn(name.to_string(), tables));
                }
            }
        }
        Err(SemanticError::ColumnNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::IntermediateType;

    fn users() -> TableSymbol {
        TableSymbol::new("users").with_columns(vec![
            ColumnSymbol::new("id", IntermediateType::integer(), "users"),
            ColumnSymbol::new("name", IntermediateType::text(), "users"),
        ])
    }

    fn orders() -> TableSymbol {
        TableSymbol::new("orders").with_columns(vec![
            ColumnSymbol::new("id", IntermediateType::integer(), "orders"),
            ColumnSymbol::new("total", IntermediateType::real(), "orders"),
        ])
    }

    #[test]
    fn test_duplicate_display_name_rejected() {
        let mut scope = Scope::new(0, ScopeType::Query);
        scope.add_table(users().with_alias("u")).unwrap();
        let result = scope.add_table(orders().with_alias("u"));
        assert!(matches!(result, Err(SemanticError::DuplicateAlias(_))));
    }

    #[test]
    fn test_ambiguity_is_per_level_not_global() {
        let mut manager = ScopeManager::new();
        let outer = manager.create_scope(ScopeType::Query, None);
        let inner = manager.create_scope(ScopeType::Subquery, Some(outer));
        manager.get_mut(outer).add_table(users()).unwrap();
        manager.get_mut(inner).add_table(orders()).unwrap();

        // `id` exists in both, but the inner level wins outright
        let (table, _) = manager.resolve_column("id", inner).unwrap();
        assert_eq!(table.table_name, "orders");

        // `name` only exists outside; the walk reaches it
        let (table, column) = manager.resolve_column("name", inner).unwrap();
        assert_eq!(table.table_name, "users");
        assert_eq!(column.name, "name");
    }

    #[test]
    fn test_ambiguous_within_one_level() {
        let mut manager = ScopeManager::new();
        let scope = manager.create_scope(ScopeType::Query, None);
        manager.get_mut(scope).add_table(users()).unwrap();
        manager.get_mut(scope).add_table(orders()).unwrap();
        let result = manager.resolve_column("id", scope);
        assert!(matches!(result, Err(SemanticError::AmbiguousColumn(_, _))));
    }

    #[test]
    fn test_cte_visible_from_inner_scope() {
        let mut manager = ScopeManager::new();
        let outer = manager.create_scope(ScopeType::Query, None);
        let inner = manager.create_scope(ScopeType::Subquery, Some(outer));
        manager.get_mut(outer).add_cte(users());
        assert!(manager.resolve_cte("users", inner).is_some());
        assert!(manager.resolve_cte("missing", inner).is_none());
    }

    #[test]
    fn test_hidden_columns_skipped_in_unqualified_lookup() {
        let mut manager = ScopeManager::new();
        let scope = manager.create_scope(ScopeType::Query, None);
        manager.get_mut(scope).add_table(users()).unwrap();
        let mut right = orders();
        right.hide_columns(&["id".to_string()]);
        manager.get_mut(scope).add_table(right).unwrap();

        // would be ambiguous if the hidden copy participated
        let (table, _) = manager.resolve_column("id", scope).unwrap();
        assert_eq!(table.table_name, "users");
    }
}
