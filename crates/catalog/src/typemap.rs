// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Declared SQL type → [`IntermediateType`] mapping
//!
//! Shared between column typing and CAST targets. Declared types that do not
//! map directly onto a storage class (dates, enums, anything vendor-flavored)
//! keep a TEXT storage class and attach a [`ColumnAdapter`] naming the
//! declared type, so generated accessors route through a user-supplied
//! encode/decode pair.

use sqlgen_ir::{ColumnAdapter, HostType, IntermediateType};

/// Map a declared column or CAST target type to an IntermediateType.
///
/// The result is always non-null; the caller applies NOT NULL constraints or
/// expression nullability on top.
pub fn intermediate_type_for(declared: &str) -> IntermediateType {
    let base = normalize(declared);
    match base.as_str() {
        "INT" | "INTEGER" | "BIGINT" | "INT2" | "INT8" | "MEDIUMINT" | "UNSIGNED BIG INT"
        | "SERIAL" | "BIGSERIAL" => IntermediateType::integer(),
        // Optimistic-lock version counter, stored as an INTEGER
        "LOCK" => IntermediateType::integer(),
        "TINYINT" | "SMALLINT" => IntermediateType::integer().host(HostType::Short),
        "BOOLEAN" | "BOOL" => IntermediateType::integer().host(HostType::Boolean),
        "REAL" | "DOUBLE" | "DOUBLE PRECISION" | "NUMERIC" | "DECIMAL" => {
            IntermediateType::real()
        }
        "FLOAT" => IntermediateType::real().host(HostType::Float),
        "TEXT" | "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "CHARACTER" | "CLOB"
        | "NATIVE CHARACTER" | "VARYING CHARACTER" => IntermediateType::text(),
        "BLOB" | "BINARY" | "VARBINARY" | "BYTEA" => IntermediateType::blob(),
        _ => IntermediateType::text().with_adapter(ColumnAdapter::new(declared)),
    }
}

/// Whether `declared` maps onto a storage class without an adapter
pub fn is_primitive(declared: &str) -> bool {
    intermediate_type_for(declared).adapter.is_none()
}

/// Whether `declared` designates an optimistic-lock column. UPDATEs on a
/// table with a lock column must set it and test it in their WHERE clause.
pub fn is_lock(declared: &str) -> bool {
    normalize(declared) == "LOCK"
}

/// Uppercase and strip any parenthesized size suffix
fn normalize(declared: &str) -> String {
    let trimmed = match declared.find('(') {
        Some(idx) => &declared[..idx],
        None => declared,
    };
    trimmed.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::StorageClass;

    #[test]
    fn test_lock_is_an_integer_counter() {
        assert_eq!(intermediate_type_for("LOCK"), IntermediateType::integer());
        assert!(is_lock("lock"));
        assert!(!is_lock("INTEGER"));
    }

    #[test]
    fn test_size_suffix_is_ignored() {
        assert_eq!(
            intermediate_type_for("VARCHAR(100)"),
            IntermediateType::text()
        );
        assert_eq!(
            intermediate_type_for("DECIMAL(10, 2)"),
            IntermediateType::real()
        );
    }

    #[test]
    fn test_host_type_narrowing() {
        assert_eq!(
            intermediate_type_for("BOOLEAN").host_type,
            Some(HostType::Boolean)
        );
        assert_eq!(
            intermediate_type_for("SMALLINT").host_type,
            Some(HostType::Short)
        );
        assert_eq!(
            intermediate_type_for("FLOAT").host_type,
            Some(HostType::Float)
        );
    }

    #[test]
    fn test_unknown_type_attaches_adapter() {
        let ty = intermediate_type_for("DATETIME");
        assert_eq!(ty.storage_class, StorageClass::Text);
        assert_eq!(ty.adapter, Some(ColumnAdapter::new("DATETIME")));
        assert!(!is_primitive("DATETIME"));
        assert!(is_primitive("INTEGER"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(intermediate_type_for("integer"), IntermediateType::integer());
        assert_eq!(intermediate_type_for("Text"), IntermediateType::text());
    }
}
