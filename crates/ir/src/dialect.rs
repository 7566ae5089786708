// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! This module defines SQL dialects and the "extends" chain that relates them.
//!
//! ## Design
//!
//! Every dialect extends exactly one parent dialect (never a diamond), and the
//! chain always terminates at the SQL-92 base ([`Dialect::Ansi`]):
//!
//! ```text
//! Ansi <- Sqlite(3.18) <- Sqlite(3.24) <- ... <- Sqlite(3.38)
//! Ansi <- MySql
//! Ansi <- PostgreSql
//! Ansi <- Hsql
//! ```
//!
//! Grammar composition, type resolution and validation all walk this chain:
//! a dialect's grammar is the union of every ancestor's rules plus its own,
//! and a dialect's type resolver delegates unmatched constructs to its
//! parent's resolver.
//!
//! ## Version Support
//!
//! SQLite versions gate syntax that SQLite gained over time:
//! - **3.24**: upsert (`ON CONFLICT ... DO UPDATE`)
//! - **3.25**: window functions
//! - **3.30**: `NULLS FIRST` / `NULLS LAST`
//! - **3.33**: `UPDATE ... FROM`
//! - **3.35**: `RETURNING`, `ALTER TABLE ... DROP COLUMN`
//! - **3.38**: JSON path operators (`->`, `->>`)

use serde::{Deserialize, Serialize};

/// SQLite versions with distinct grammar or type rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SqliteVersion {
    V3_18,
    V3_24,
    V3_25,
    V3_30,
    V3_33,
    V3_35,
    V3_38,
}

impl SqliteVersion {
    /// All supported versions, oldest first
    pub const ALL: [SqliteVersion; 7] = [
        SqliteVersion::V3_18,
        SqliteVersion::V3_24,
        SqliteVersion::V3_25,
        SqliteVersion::V3_30,
        SqliteVersion::V3_33,
        SqliteVersion::V3_35,
        SqliteVersion::V3_38,
    ];

    /// The version this version extends, if any
    pub fn previous(self) -> Option<SqliteVersion> {
        let idx = Self::ALL.iter().position(|v| *v == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl std::fmt::Display for SqliteVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SqliteVersion::V3_18 => "3.18",
            SqliteVersion::V3_24 => "3.24",
            SqliteVersion::V3_25 => "3.25",
            SqliteVersion::V3_30 => "3.30",
            SqliteVersion::V3_33 => "3.33",
            SqliteVersion::V3_35 => "3.35",
            SqliteVersion::V3_38 => "3.38",
        };
        write!(f, "{s}")
    }
}

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Dialect {
    /// Standard SQL-92 base dialect
    Ansi,
    /// SQLite at a specific version
    Sqlite(SqliteVersion),
    /// MySQL 5.7+
    MySql,
    /// PostgreSQL 12+
    PostgreSql,
    /// HyperSQL (HSQLDB)
    Hsql,
}

impl Dialect {
    /// The dialect this dialect extends, or `None` for the ANSI base
    pub fn parent(&self) -> Option<Dialect> {
        match self {
            Dialect::Ansi => None,
            Dialect::Sqlite(v) => Some(match v.previous() {
                Some(prev) => Dialect::Sqlite(prev),
                None => Dialect::Ansi,
            }),
            Dialect::MySql | Dialect::PostgreSql | Dialect::Hsql => Some(Dialect::Ansi),
        }
    }

    /// Iterate the extends chain from this dialect back to [`Dialect::Ansi`]
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlgen_ir::{Dialect, SqliteVersion};
    ///
    /// let chain: Vec<_> = Dialect::Sqlite(SqliteVersion::V3_24).chain().collect();
    /// assert_eq!(chain.first(), Some(&Dialect::Sqlite(SqliteVersion::V3_24)));
    /// assert_eq!(chain.last(), Some(&Dialect::Ansi));
    /// ```
    pub fn chain(&self) -> impl Iterator<Item = Dialect> {
        let mut next = Some(*self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.parent();
            Some(current)
        })
    }

    /// Check whether `ancestor` appears in this dialect's extends chain
    pub fn extends(&self, ancestor: Dialect) -> bool {
        self.chain().any(|d| d == ancestor)
    }

    /// Check if this dialect supports a specific extension
    pub fn supports(&self, ext: DialectExtension) -> bool {
        match ext {
            DialectExtension::Upsert => {
                self.extends_sqlite_at_least(SqliteVersion::V3_24)
                    || matches!(self, Dialect::MySql | Dialect::PostgreSql)
            }
            DialectExtension::WindowFunctions => {
                self.extends_sqlite_at_least(SqliteVersion::V3_25)
                    || matches!(self, Dialect::MySql | Dialect::PostgreSql | Dialect::Hsql)
            }
            DialectExtension::NullsOrdering => {
                self.extends_sqlite_at_least(SqliteVersion::V3_30)
                    || matches!(self, Dialect::PostgreSql | Dialect::Hsql)
            }
            DialectExtension::UpdateFrom => {
                self.extends_sqlite_at_least(SqliteVersion::V3_33)
                    || matches!(self, Dialect::PostgreSql)
            }
            DialectExtension::Returning => {
                self.extends_sqlite_at_least(SqliteVersion::V3_35)
                    || matches!(self, Dialect::PostgreSql)
            }
            DialectExtension::JsonPathOperators => {
                self.extends_sqlite_at_least(SqliteVersion::V3_38)
                    || matches!(self, Dialect::MySql | Dialect::PostgreSql)
            }
            DialectExtension::Cte => true,
        }
    }

    /// Whether self-referential view/CTE definitions are legal
    ///
    /// No supported dialect currently allows reference cycles; the flag exists
    /// so a dialect can opt in without touching the cycle detector.
    pub fn allows_reference_cycles(&self) -> bool {
        false
    }

    fn extends_sqlite_at_least(&self, version: SqliteVersion) -> bool {
        matches!(self, Dialect::Sqlite(v) if *v >= version)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Ansi => write!(f, "ANSI"),
            Dialect::Sqlite(v) => write!(f, "SQLite {v}"),
            Dialect::MySql => write!(f, "MySQL"),
            Dialect::PostgreSql => write!(f, "PostgreSQL"),
            Dialect::Hsql => write!(f, "HSQL"),
        }
    }
}

/// Dialect-specific extensions and features
///
/// These represent syntax or type rules that are not part of the core SQL
/// subset and are specific to certain dialects or dialect versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DialectExtension {
    /// `INSERT ... ON CONFLICT DO UPDATE` / `ON DUPLICATE KEY UPDATE`
    Upsert,
    /// Window functions (`ROW_NUMBER() OVER (...)`, etc.)
    WindowFunctions,
    /// `ORDER BY ... NULLS FIRST / NULLS LAST`
    NullsOrdering,
    /// `UPDATE ... FROM` joined updates
    UpdateFrom,
    /// `RETURNING` clause on INSERT/UPDATE/DELETE
    Returning,
    /// JSON path operators `->` and `->>`
    JsonPathOperators,
    /// Common Table Expressions (WITH clauses)
    Cte,
}

/// Optional resolver modules layered onto a dialect independently of its
/// ancestor chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Module {
    /// JSON functions (`json_extract`, `json_array_length`, ...)
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_terminates_at_ansi() {
        for dialect in [
            Dialect::Ansi,
            Dialect::Sqlite(SqliteVersion::V3_38),
            Dialect::MySql,
            Dialect::PostgreSql,
            Dialect::Hsql,
        ] {
            assert_eq!(dialect.chain().last(), Some(Dialect::Ansi));
        }
    }

    #[test]
    fn test_sqlite_chain_walks_versions() {
        let chain: Vec<_> = Dialect::Sqlite(SqliteVersion::V3_25).chain().collect();
        assert_eq!(
            chain,
            vec![
                Dialect::Sqlite(SqliteVersion::V3_25),
                Dialect::Sqlite(SqliteVersion::V3_24),
                Dialect::Sqlite(SqliteVersion::V3_18),
                Dialect::Ansi,
            ]
        );
    }

    #[test]
    fn test_extends() {
        let d = Dialect::Sqlite(SqliteVersion::V3_38);
        assert!(d.extends(Dialect::Sqlite(SqliteVersion::V3_18)));
        assert!(d.extends(Dialect::Ansi));
        assert!(!d.extends(Dialect::MySql));
    }

    #[test]
    fn test_upsert_gated_at_3_24() {
        assert!(!Dialect::Sqlite(SqliteVersion::V3_18).supports(DialectExtension::Upsert));
        assert!(Dialect::Sqlite(SqliteVersion::V3_24).supports(DialectExtension::Upsert));
        assert!(Dialect::Sqlite(SqliteVersion::V3_38).supports(DialectExtension::Upsert));
        assert!(Dialect::MySql.supports(DialectExtension::Upsert));
        assert!(!Dialect::Ansi.supports(DialectExtension::Upsert));
    }

    #[test]
    fn test_json_operators_gated_at_3_38() {
        assert!(!Dialect::Sqlite(SqliteVersion::V3_35).supports(DialectExtension::JsonPathOperators));
        assert!(Dialect::Sqlite(SqliteVersion::V3_38).supports(DialectExtension::JsonPathOperators));
        assert!(Dialect::PostgreSql.supports(DialectExtension::JsonPathOperators));
    }

    #[test]
    fn test_no_dialect_allows_cycles() {
        for dialect in [Dialect::Ansi, Dialect::MySql, Dialect::Hsql] {
            assert!(!dialect.allows_reference_cycles());
        }
    }
}
