// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # IntermediateType
//!
//! This module defines the unit of type inference: every resolvable SQL
//! expression, column and bind parameter has exactly one [`IntermediateType`],
//! combining a storage class, nullability, and an optional host-language
//! representation.
//!
//! ## Storage classes
//!
//! The storage classes form a closed set with a fixed widening priority used
//! for multi-branch expressions (CASE/COALESCE):
//!
//! ```text
//! INTEGER < REAL < TEXT < BLOB
//! ```
//!
//! `NULL` and `ARGUMENT` sit outside the priority order. `ARGUMENT` marks a
//! bind parameter whose type has not been back-inferred from its usage
//! context yet and must never survive into a resolved result shape.

use serde::{Deserialize, Serialize};

/// Primitive storage class of a SQL value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    Integer,
    Real,
    Text,
    Blob,
    /// The type of a bare NULL literal
    Null,
    /// Placeholder for a bind parameter before back-inference
    Argument,
}

impl StorageClass {
    /// Widening priority: INTEGER < REAL < TEXT < BLOB.
    ///
    /// NULL and ARGUMENT rank below everything so any concrete branch type
    /// wins when encapsulating.
    pub fn priority(self) -> u8 {
        match self {
            StorageClass::Null | StorageClass::Argument => 0,
            StorageClass::Integer => 1,
            StorageClass::Real => 2,
            StorageClass::Text => 3,
            StorageClass::Blob => 4,
        }
    }

    /// The wider of two storage classes per the fixed priority order
    pub fn widen(self, other: StorageClass) -> StorageClass {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
            StorageClass::Null => "NULL",
            StorageClass::Argument => "ARGUMENT",
        };
        write!(f, "{s}")
    }
}

/// Host-language representation narrowing a storage class
///
/// A column declared `BOOLEAN` is stored as INTEGER but surfaces as a boolean
/// in generated accessors; likewise `SMALLINT` narrows to a short and `FLOAT`
/// to a single-precision float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HostType {
    Boolean,
    Short,
    Float,
}

/// Identifies a user-supplied encode/decode pair attached when a declared
/// column type does not map directly onto a storage class (enums, dates,
/// serialized lists, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnAdapter {
    /// The declared SQL type the adapter translates (e.g. `DATETIME`)
    pub declared_type: String,
}

impl ColumnAdapter {
    pub fn new(declared_type: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
        }
    }
}

/// The inferred type of a SQL expression, column or bind parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateType {
    /// Primitive storage class
    pub storage_class: StorageClass,

    /// Whether the value can be NULL
    pub nullable: bool,

    /// Optional host-language narrowing of the storage class
    pub host_type: Option<HostType>,

    /// Optional user-supplied encode/decode pair
    pub adapter: Option<ColumnAdapter>,

    /// Error sentinel: set when the expression failed to resolve.
    ///
    /// Downstream inference keeps running over sentinel types so one bad
    /// reference does not hide every other diagnostic in the file; files
    /// containing any diagnostic are withheld from generation.
    #[serde(default)]
    pub unresolved: bool,
}

impl IntermediateType {
    /// Create a non-null type of the given storage class
    pub fn new(storage_class: StorageClass) -> Self {
        Self {
            storage_class,
            nullable: false,
            host_type: None,
            adapter: None,
            unresolved: false,
        }
    }

    /// Non-null INTEGER
    pub fn integer() -> Self {
        Self::new(StorageClass::Integer)
    }

    /// Non-null REAL
    pub fn real() -> Self {
        Self::new(StorageClass::Real)
    }

    /// Non-null TEXT
    pub fn text() -> Self {
        Self::new(StorageClass::Text)
    }

    /// Non-null BLOB
    pub fn blob() -> Self {
        Self::new(StorageClass::Blob)
    }

    /// The type of a bare NULL literal
    pub fn null() -> Self {
        Self::new(StorageClass::Null).nullable(true)
    }

    /// A bind parameter awaiting back-inference
    pub fn argument() -> Self {
        Self::new(StorageClass::Argument).nullable(true)
    }

    /// The error-sentinel type propagated for unresolved references
    pub fn unresolved() -> Self {
        let mut ty = Self::null();
        ty.unresolved = true;
        ty
    }

    /// Non-null INTEGER narrowed to a host boolean (comparison results)
    pub fn boolean() -> Self {
        Self::integer().host(HostType::Boolean)
    }

    /// Builder method: set nullability
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: set the host type
    pub fn host(mut self, host_type: HostType) -> Self {
        self.host_type = Some(host_type);
        self
    }

    /// Builder method: attach an adapter
    pub fn with_adapter(mut self, adapter: ColumnAdapter) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Whether this type still carries the transient ARGUMENT placeholder
    pub fn is_argument(&self) -> bool {
        self.storage_class == StorageClass::Argument
    }

    /// Encapsulating type of a multi-branch expression (CASE/COALESCE/IF).
    ///
    /// The result's storage class is the widest class among the branches per
    /// the fixed priority order, and the result is nullable if any branch is
    /// nullable or unresolved.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlgen_ir::{IntermediateType, StorageClass};
    ///
    /// let ty = IntermediateType::encapsulating(&[
    ///     IntermediateType::integer(),
    ///     IntermediateType::real().nullable(true),
    /// ]);
    /// assert_eq!(ty.storage_class, StorageClass::Real);
    /// assert!(ty.nullable);
    /// ```
    pub fn encapsulating(branches: &[IntermediateType]) -> IntermediateType {
        let mut storage_class = StorageClass::Null;
        let mut nullable = false;
        for branch in branches {
            storage_class = storage_class.widen(branch.storage_class);
            nullable |= branch.nullable || branch.unresolved;
        }
        if branches.is_empty() {
            nullable = true;
        }
        IntermediateType::new(storage_class).nullable(nullable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_priority_order() {
        assert_eq!(
            StorageClass::Integer.widen(StorageClass::Real),
            StorageClass::Real
        );
        assert_eq!(
            StorageClass::Real.widen(StorageClass::Text),
            StorageClass::Text
        );
        assert_eq!(
            StorageClass::Text.widen(StorageClass::Blob),
            StorageClass::Blob
        );
        assert_eq!(
            StorageClass::Blob.widen(StorageClass::Integer),
            StorageClass::Blob
        );
    }

    #[test]
    fn test_widening_is_commutative() {
        let classes = [
            StorageClass::Integer,
            StorageClass::Real,
            StorageClass::Text,
            StorageClass::Blob,
        ];
        for a in classes {
            for b in classes {
                assert_eq!(a.widen(b), b.widen(a));
            }
        }
    }

    #[test]
    fn test_encapsulating_nullability_any_branch() {
        let ty = IntermediateType::encapsulating(&[
            IntermediateType::integer(),
            IntermediateType::integer().nullable(true),
        ]);
        assert_eq!(ty.storage_class, StorageClass::Integer);
        assert!(ty.nullable);

        let ty = IntermediateType::encapsulating(&[
            IntermediateType::text(),
            IntermediateType::text(),
        ]);
        assert!(!ty.nullable);
    }

    #[test]
    fn test_encapsulating_unresolved_branch_is_nullable() {
        let ty = IntermediateType::encapsulating(&[
            IntermediateType::integer(),
            IntermediateType::unresolved(),
        ]);
        assert!(ty.nullable);
    }

    #[test]
    fn test_null_literal_type() {
        let ty = IntermediateType::null();
        assert_eq!(ty.storage_class, StorageClass::Null);
        assert!(ty.nullable);
        assert!(!ty.unresolved);
    }

    #[test]
    fn test_serde_round_trip() {
        let ty = IntermediateType::text()
            .nullable(true)
            .with_adapter(ColumnAdapter::new("DATETIME"));
        let json = serde_json::to_string(&ty).unwrap();
        let back: IntermediateType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }

    #[test]
    fn test_argument_is_transient_marker() {
        assert!(IntermediateType::argument().is_argument());
        assert!(!IntermediateType::integer().is_argument());
    }
}
