// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Chain-walking lookup over the per-dialect builtin tables

use crate::builtin;
use crate::signature::FunctionSignature;
use sqlgen_ir::{Dialect, Module, SqliteVersion};
use std::collections::HashMap;

/// Registry of builtin SQL functions
///
/// Tables are keyed by the dialect layer that introduces them; lookup walks
/// the dialect chain from the most specific layer down to ANSI, so a
/// descendant sees everything its ancestors define and its own entries win
/// on name collisions.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    by_dialect: HashMap<Dialect, Vec<FunctionSignature>>,
    by_module: HashMap<Module, Vec<FunctionSignature>>,
}

impl FunctionRegistry {
    /// Create a registry with all builtin tables loaded
    pub fn new() -> Self {
        let mut by_dialect = HashMap::new();
        by_dialect.insert(Dialect::Ansi, builtin::ansi::all_functions());
        by_dialect.insert(
            Dialect::Sqlite(SqliteVersion::V3_18),
            builtin::sqlite::base_functions(),
        );
        by_dialect.insert(
            Dialect::Sqlite(SqliteVersion::V3_25),
            builtin::sqlite::window_functions(),
        );
        by_dialect.insert(Dialect::MySql, builtin::mysql::all_functions());
        by_dialect.insert(Dialect::PostgreSql, builtin::postgresql::all_functions());
        by_dialect.insert(Dialect::Hsql, builtin::hsql::all_functions());

        let mut by_module = HashMap::new();
        by_module.insert(Module::Json, builtin::json::all_functions());

        Self {
            by_dialect,
            by_module,
        }
    }

    /// Lookup a function visible under `dialect` with the given modules
    /// active. Module tables are consulted first, then each dialect layer
    /// from the most specific to ANSI. Names compare case-insensitively.
    pub fn resolve(
        &self,
        dialect: Dialect,
        modules: &[Module],
        name: &str,
    ) -> Option<&FunctionSignature> {
        for module in modules {
            if let Some(sig) = self.module_function(*module, name) {
                return Some(sig);
            }
        }
        for layer in dialect.chain() {
            if let Some(sig) = self.layer_function(layer, name) {
                return Some(sig);
            }
        }
        None
    }

    /// Lookup in a single dialect layer's own table (no chain walk)
    pub fn layer_function(&self, layer: Dialect, name: &str) -> Option<&FunctionSignature> {
        self.by_dialect
            .get(&layer)?
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Lookup in a module table
    pub fn module_function(&self, module: Module, name: &str) -> Option<&FunctionSignature> {
        self.by_module
            .get(&module)?
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Whether `name` is a known function anywhere along the chain
    pub fn has_function(&self, dialect: Dialect, modules: &[Module], name: &str) -> bool {
        self.resolve(dialect, modules, name).is_some()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{FunctionKind, ReturnRule};
    use sqlgen_ir::{IntermediateType, StorageClass};

    #[test]
    fn test_ansi_functions_visible_from_descendants() {
        let registry = FunctionRegistry::new();
        for dialect in [
            Dialect::Sqlite(SqliteVersion::V3_18),
            Dialect::MySql,
            Dialect::PostgreSql,
            Dialect::Hsql,
        ] {
            assert!(registry.has_function(dialect, &[], "COUNT"), "{dialect}");
            assert!(registry.has_function(dialect, &[], "count"));
        }
    }

    #[test]
    fn test_sqlite_version_gates_window_functions() {
        let registry = FunctionRegistry::new();
        assert!(!registry.has_function(Dialect::Sqlite(SqliteVersion::V3_24), &[], "ROW_NUMBER"));
        assert!(registry.has_function(Dialect::Sqlite(SqliteVersion::V3_25), &[], "ROW_NUMBER"));
        assert!(registry.has_function(Dialect::Sqlite(SqliteVersion::V3_38), &[], "ROW_NUMBER"));
    }

    #[test]
    fn test_json_functions_come_from_the_module() {
        let registry = FunctionRegistry::new();
        let sqlite = Dialect::Sqlite(SqliteVersion::V3_38);
        assert!(!registry.has_function(sqlite, &[], "JSON_EXTRACT"));
        let sig = registry
            .resolve(sqlite, &[Module::Json], "json_extract")
            .unwrap();
        assert_eq!(
            sig.rule,
            ReturnRule::Fixed(IntermediateType::text().nullable(true))
        );
    }

    #[test]
    fn test_descendant_overrides_win() {
        let registry = FunctionRegistry::new();
        // GROUP_CONCAT exists only in the SQLite layer; MIN exists in both
        // the SQLite layer and ANSI. The more specific layer answers first.
        let sqlite = Dialect::Sqlite(SqliteVersion::V3_18);
        assert!(registry.layer_function(sqlite, "GROUP_CONCAT").is_some());
        let sig = registry.resolve(sqlite, &[], "MIN").unwrap();
        assert_eq!(sig.rule, ReturnRule::PassthroughNullable);
    }

    #[test]
    fn test_count_is_non_null_integer_aggregate() {
        let registry = FunctionRegistry::new();
        let sig = registry.resolve(Dialect::Ansi, &[], "COUNT").unwrap();
        assert_eq!(sig.kind, FunctionKind::Aggregate);
        let ty = sig.rule.apply(&[IntermediateType::text().nullable(true)]);
        assert_eq!(ty.storage_class, StorageClass::Integer);
        assert!(!ty.nullable);
    }
}
