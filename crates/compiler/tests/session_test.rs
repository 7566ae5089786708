// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Session-level tests: multi-file projects, migration folding, generation
//! withholding and reanalysis.

use sqlgen_compiler::{Session, SourceFile};
use sqlgen_ir::{Dialect, Module, SqliteVersion, StorageClass};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sqlite_session() -> Session {
    init_tracing();
    Session::new(Dialect::Sqlite(SqliteVersion::V3_38), &[])
}

#[test]
fn test_named_query_interface() {
    let mut session = sqlite_session();
    let analysis = session.analyze_file(
        "users.sql",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, bio TEXT);
         getUser:
         SELECT id, name, bio FROM users WHERE id = ?;",
    );
    assert!(analysis.is_clean(), "{:?}", analysis.diagnostics);
    assert_eq!(analysis.named_queries.len(), 1);
    let query = &analysis.named_queries[0];
    assert_eq!(query.name, "getUser");
    assert_eq!(query.result_columns.len(), 3);
    assert_eq!(query.result_columns[1].0, "name");
    assert_eq!(query.result_columns[1].1.storage_class, StorageClass::Text);
    assert!(query.result_columns[2].1.nullable);
    assert_eq!(query.parameters.len(), 1);
    assert_eq!(query.parameters[0].1.storage_class, StorageClass::Integer);
}

#[test]
fn test_migrations_fold_in_file_order() {
    let mut session = sqlite_session();
    let files = [
        SourceFile::new(
            "001.sql",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
        ),
        SourceFile::new(
            "002.sql",
            "ALTER TABLE users ADD COLUMN email TEXT;
             ALTER TABLE users RENAME COLUMN name TO full_name;",
        ),
        SourceFile::new(
            "queries.sql",
            "allUsers:
             SELECT id, full_name, email FROM users;",
        ),
    ];
    let analysis = session.analyze(&files);
    assert!(analysis.is_clean(), "{:?}", analysis.diagnostics().collect::<Vec<_>>());
    let queries = analysis.generated_queries().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].result_columns[1].0, "full_name");
    // added without NOT NULL
    assert!(queries[0].result_columns[2].1.nullable);
}

#[test]
fn test_generation_withheld_on_any_diagnostic() {
    let mut session = sqlite_session();
    let files = [
        SourceFile::new("schema.sql", "CREATE TABLE t (v INTEGER NOT NULL);"),
        SourceFile::new(
            "good.sql",
            "goodQuery:\nSELECT v FROM t;",
        ),
        SourceFile::new(
            "bad.sql",
            "badQuery:\nSELECT missing FROM t;",
        ),
    ];
    let analysis = session.analyze(&files);
    assert!(!analysis.is_clean());
    assert!(analysis.generated_queries().is_none());
    // the clean file still carries its interface for tooling
    assert_eq!(analysis.files[1].named_queries.len(), 1);
    assert!(analysis.files[1].is_clean());
    assert!(!analysis.files[2].is_clean());
}

#[test]
fn test_parse_errors_become_file_diagnostics() {
    let mut session = sqlite_session();
    let analysis = session.analyze_file("broken.sql", "SELECT * FROM;");
    assert!(!analysis.is_clean());
}

#[test]
fn test_catalog_errors_land_in_the_offending_file() {
    let mut session = sqlite_session();
    let files = [
        SourceFile::new("001.sql", "CREATE TABLE t (v INTEGER);"),
        SourceFile::new("002.sql", "CREATE TABLE t (v INTEGER);"),
    ];
    let analysis = session.analyze(&files);
    assert!(analysis.files[0].is_clean());
    assert!(!analysis.files[1].is_clean());
    assert!(analysis.files[1].diagnostics[0]
        .message
        .contains("already exists"));
}

#[test]
fn test_reanalysis_is_idempotent() {
    let mut session = sqlite_session();
    let files = [SourceFile::new(
        "all.sql",
        "CREATE TABLE t (v INTEGER NOT NULL);
         CREATE VIEW doubled AS SELECT v + v AS d FROM t;
         readDoubled:
         SELECT d FROM doubled;",
    )];
    let first = session.analyze(&files);
    let second = session.analyze(&files);
    assert!(first.is_clean() && second.is_clean());
    assert_eq!(
        first.files[0].named_queries,
        second.files[0].named_queries
    );
}

#[test]
fn test_dialect_gating_flows_through_the_session() {
    init_tracing();
    // RETURNING arrives in SQLite 3.35
    let source = "CREATE TABLE t (v INTEGER NOT NULL);
                  addValue:
                  INSERT INTO t (v) VALUES (?) RETURNING v;";

    let mut old = Session::new(Dialect::Sqlite(SqliteVersion::V3_33), &[]);
    assert!(!old.analyze_file("q.sql", source).is_clean());

    let mut new = Session::new(Dialect::Sqlite(SqliteVersion::V3_35), &[]);
    let analysis = new.analyze_file("q.sql", source);
    assert!(analysis.is_clean(), "{:?}", analysis.diagnostics);
    assert_eq!(analysis.named_queries[0].result_columns[0].0, "v");
}

#[test]
fn test_json_module_and_interface_serialization() {
    init_tracing();
    let mut session = Session::new(Dialect::Sqlite(SqliteVersion::V3_38), &[Module::Json]);
    let analysis = session.analyze_file(
        "docs.sql",
        "CREATE TABLE docs (doc TEXT NOT NULL);
         extractName:
         SELECT json_extract(doc, '$.name') AS name FROM docs;",
    );
    assert!(analysis.is_clean(), "{:?}", analysis.diagnostics);

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["named_queries"][0]["name"], "extractName");
    assert_eq!(
        json["named_queries"][0]["result_columns"][0][1]["nullable"],
        true
    );
}
