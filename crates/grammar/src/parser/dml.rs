// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! INSERT / UPDATE / DELETE parsing, including dialect-gated upsert,
//! UPDATE ... FROM and RETURNING clauses

use super::Parser;
use crate::compose::RuleId;
use crate::error::{GrammarResult, ParseError};
use crate::token::TokenKind;
use sqlgen_ir::{
    Assignment, ConflictAction, Delete, Insert, InsertSource, ResultColumn, Update, Upsert,
};

impl Parser<'_> {
    pub(crate) fn insert(&mut self) -> GrammarResult<Insert> {
        let span = self.expect_word("INSERT")?;
        // INSERT OR REPLACE/IGNORE/... conflict verbs are accepted and ignored
        if self.eat_word("OR") && !self.at_word("INTO") {
            self.bump();
        }
        self.expect_word("INTO")?;
        let (table, _) = self.identifier()?;
        let columns = if self.at(&TokenKind::LParen) {
            Some(self.column_name_list()?)
        } else {
            None
        };

        let source = if self.eat_word("VALUES") {
            let mut rows = Vec::new();
            loop {
                self.expect(TokenKind::LParen, "'('")?;
                let mut row = Vec::new();
                loop {
                    row.push(self.expr()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
                rows.push(row);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else if self.at_word("SELECT") || self.at_word("WITH") {
            InsertSource::Select(Box::new(self.select()?))
        } else if self.eat_word("DEFAULT") {
            self.expect_word("VALUES")?;
            InsertSource::DefaultValues
        } else {
            return Err(self.unexpected("VALUES, SELECT or DEFAULT VALUES"));
        };

        let upsert = if self.at_word("ON") {
            Some(self.upsert_clause()?)
        } else {
            None
        };

        let returning = self.returning_clause()?;

        Ok(Insert {
            table,
            columns,
            source,
            upsert,
            returning,
            span,
        })
    }

    fn upsert_clause(&mut self) -> GrammarResult<Upsert> {
        let span = self.expect_word("ON")?;
        if self.at_word("CONFLICT") {
            if !self.grammar().supports(RuleId::UpsertOnConflict) {
                return Err(ParseError::new(
                    format!(
                        "ON CONFLICT is not supported by {}",
                        self.grammar().dialect()
                    ),
                    span,
                ));
            }
            self.bump();
            let targets = if self.at(&TokenKind::LParen) {
                self.column_name_list()?
            } else {
                Vec::new()
            };
            self.expect_word("DO")?;
            let action = if self.eat_word("NOTHING") {
                ConflictAction::Nothing
            } else {
                self.expect_word("UPDATE")?;
                self.expect_word("SET")?;
                let assignments = self.assignment_list()?;
                let where_clause = if self.eat_word("WHERE") {
                    Some(self.expr()?)
                } else {
                    None
                };
                ConflictAction::Update {
                    assignments,
                    where_clause,
                }
            };
            return Ok(Upsert::OnConflict { targets, action });
        }

        self.expect_word("DUPLICATE")?;
        if !self.grammar().supports(RuleId::UpsertOnDuplicateKey) {
            return Err(ParseError::new(
                format!(
                    "ON DUPLICATE KEY UPDATE is not supported by {}",
                    self.grammar().dialect()
                ),
                span,
            ));
        }
        self.expect_word("KEY")?;
        self.expect_word("UPDATE")?;
        let assignments = self.assignment_list()?;
        Ok(Upsert::OnDuplicateKeyUpdate { assignments })
    }

    pub(crate) fn update(&mut self) -> GrammarResult<Update> {
        let span = self.expect_word("UPDATE")?;
        let (table, _) = self.identifier()?;
        let alias = if !self.at_word("SET") {
            self.alias()?
        } else {
            None
        };
        self.expect_word("SET")?;
        let assignments = self.assignment_list()?;

        let from = if self.at_word("FROM") {
            if !self.grammar().supports(RuleId::UpdateFrom) {
                return Err(ParseError::new(
                    format!(
                        "UPDATE ... FROM is not supported by {}",
                        self.grammar().dialect()
                    ),
                    self.span(),
                ));
            }
            self.bump();
            Some(self.from_clause()?)
        } else {
            None
        };

        let where_clause = if self.eat_word("WHERE") {
            Some(self.expr()?)
        } else {
            None
        };
        let returning = self.returning_clause()?;

        Ok(Update {
            table,
            alias,
            assignments,
            from,
            where_clause,
            returning,
            span,
        })
    }

    pub(crate) fn delete(&mut self) -> GrammarResult<Delete> {
        let span = self.expect_word("DELETE")?;
        self.expect_word("FROM")?;
        let (table, _) = self.identifier()?;
        let alias = self.alias()?;
        let where_clause = if self.eat_word("WHERE") {
            Some(self.expr()?)
        } else {
            None
        };
        let returning = self.returning_clause()?;
        Ok(Delete {
            table,
            alias,
            where_clause,
            returning,
            span,
        })
    }

    fn assignment_list(&mut self) -> GrammarResult<Vec<Assignment>> {
        let mut assignments = Vec::new();
        loop {
            let span = self.span();
            let (column, _) = self.identifier()?;
            self.expect(TokenKind::Eq, "'='")?;
            let value = self.expr()?;
            assignments.push(Assignment {
                column,
                value,
                span,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(assignments)
    }

    fn returning_clause(&mut self) -> GrammarResult<Vec<ResultColumn>> {
        if !self.at_word("RETURNING") {
            return Ok(Vec::new());
        }
        if !self.grammar().supports(RuleId::ReturningClause) {
            return Err(ParseError::new(
                format!(
                    "RETURNING is not supported by {}",
                    self.grammar().dialect()
                ),
                self.span(),
            ));
        }
        self.bump();
        let mut columns = Vec::new();
        loop {
            columns.push(self.result_column()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use crate::compose::Grammar;
    use crate::parser::parse;
    use sqlgen_ir::{
        ConflictAction, Dialect, InsertSource, SqliteVersion, Statement, Upsert,
    };

    fn parse_one(grammar: &Grammar, sql: &str) -> Statement {
        let outcome = parse(grammar, sql);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        outcome.file.statements[0].statement.clone()
    }

    fn sqlite(version: SqliteVersion) -> Grammar {
        Grammar::compose(Dialect::Sqlite(version))
    }

    #[test]
    fn test_insert_values() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "INSERT INTO users (id, name) VALUES (?, ?), (?, ?);",
        );
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.columns.as_ref().unwrap().len(), 2);
        assert!(matches!(insert.source, InsertSource::Values(ref rows) if rows.len() == 2));
    }

    #[test]
    fn test_insert_select() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "INSERT INTO archive SELECT * FROM users;",
        );
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert!(matches!(insert.source, InsertSource::Select(_)));
    }

    #[test]
    fn test_insert_default_values() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "INSERT INTO log DEFAULT VALUES;",
        );
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.source, InsertSource::DefaultValues);
    }

    #[test]
    fn test_on_conflict_requires_3_24() {
        let sql = "INSERT INTO t (a) VALUES (?) ON CONFLICT (a) DO UPDATE SET a = ?;";
        let outcome = parse(&sqlite(SqliteVersion::V3_18), sql);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("ON CONFLICT"));

        let stmt = parse_one(&sqlite(SqliteVersion::V3_24), sql);
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert!(matches!(
            insert.upsert,
            Some(Upsert::OnConflict {
                action: ConflictAction::Update { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_on_conflict_do_nothing() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_24),
            "INSERT INTO t (a) VALUES (1) ON CONFLICT DO NOTHING;",
        );
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert!(matches!(
            insert.upsert,
            Some(Upsert::OnConflict {
                action: ConflictAction::Nothing,
                ..
            })
        ));
    }

    #[test]
    fn test_on_duplicate_key_is_mysql_only() {
        let sql = "INSERT INTO t (a) VALUES (?) ON DUPLICATE KEY UPDATE a = ?;";
        let stmt = parse_one(&Grammar::compose(Dialect::MySql), sql);
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert!(matches!(
            insert.upsert,
            Some(Upsert::OnDuplicateKeyUpdate { .. })
        ));

        let outcome = parse(&sqlite(SqliteVersion::V3_38), sql);
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_returning_gated_by_version() {
        let sql = "DELETE FROM t WHERE id = ? RETURNING id;";
        let outcome = parse(&sqlite(SqliteVersion::V3_33), sql);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("RETURNING"));

        let stmt = parse_one(&sqlite(SqliteVersion::V3_35), sql);
        let Statement::Delete(delete) = stmt else {
            panic!("expected delete");
        };
        assert_eq!(delete.returning.len(), 1);
    }

    #[test]
    fn test_update_from_is_version_gated() {
        let sql = "UPDATE t SET a = s.a FROM src s WHERE s.id = t.id;";
        let outcome = parse(&sqlite(SqliteVersion::V3_30), sql);
        assert_eq!(outcome.errors.len(), 1);

        let stmt = parse_one(&sqlite(SqliteVersion::V3_33), sql);
        let Statement::Update(update) = stmt else {
            panic!("expected update");
        };
        assert!(update.from.is_some());
        assert!(update.where_clause.is_some());
    }

    #[test]
    fn test_plain_update_and_delete() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "UPDATE users SET name = ?, age = age + 1 WHERE id = ?;",
        );
        let Statement::Update(update) = stmt else {
            panic!("expected update");
        };
        assert_eq!(update.assignments.len(), 2);

        let stmt = parse_one(&sqlite(SqliteVersion::V3_18), "DELETE FROM users;");
        assert!(matches!(stmt, Statement::Delete(_)));
    }
}
