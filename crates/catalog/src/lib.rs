// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog
//!
//! Schema state derived from parsed CREATE/ALTER/DROP statements.
//!
//! Unlike a live-database catalog, everything here comes from source files:
//! the compiler folds migration files oldest-first, so the schema a query is
//! checked against is exactly what the migrations produce. Views keep their
//! defining SELECT; their result shapes are computed lazily by the semantic
//! layer.

pub mod builder;
pub mod error;
pub mod schema;
pub mod typemap;

pub use builder::SchemaBuilder;
pub use error::{CatalogError, CatalogResult};
pub use schema::{Column, Schema, Table, View};
pub use typemap::{intermediate_type_for, is_primitive};
