// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Compiler driver
//!
//! The front door of the pipeline: compose a grammar for a dialect, parse
//! source files, fold migrations into a schema, analyze every query and
//! surface named-query interfaces for code generation.
//!
//! ```
//! use sqlgen_compiler::Session;
//! use sqlgen_ir::{Dialect, SqliteVersion};
//!
//! let mut session = Session::new(Dialect::Sqlite(SqliteVersion::V3_38), &[]);
//! let analysis = session.analyze_file(
//!     "queries.sql",
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
//!      getUser:
//!      SELECT name FROM users WHERE id = ?;",
//! );
//! assert!(analysis.is_clean());
//! assert_eq!(analysis.named_queries[0].name, "getUser");
//! ```

pub mod session;

pub use session::{FileAnalysis, NamedQuery, ProjectAnalysis, Session, SourceFile};
