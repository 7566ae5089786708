// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Schema statement parsing: CREATE TABLE/VIEW/INDEX/TRIGGER, ALTER TABLE
//! and DROP

use super::Parser;
use crate::compose::RuleId;
use crate::error::{GrammarResult, ParseError};
use crate::token::TokenKind;
use sqlgen_ir::{
    AlterAction, AlterTable, ColumnDef, CreateIndex, CreateTable, CreateTrigger, CreateView, Drop,
    ObjectKind, Statement, TriggerEvent, TriggerTiming,
};

impl Parser<'_> {
    pub(crate) fn create_statement(&mut self) -> GrammarResult<Statement> {
        let span = self.expect_word("CREATE")?;
        if self.at_word("TABLE") {
            self.bump();
            let if_not_exists = self.if_not_exists()?;
            let (name, _) = self.identifier()?;
            let columns = self.column_def_list()?;
            return Ok(Statement::CreateTable(CreateTable {
                name,
                if_not_exists,
                columns,
                span,
            }));
        }
        if self.at_word("VIEW") {
            self.bump();
            self.if_not_exists()?;
            let (name, _) = self.identifier()?;
            let columns = if self.at(&TokenKind::LParen) {
                Some(self.column_name_list()?)
            } else {
                None
            };
            self.expect_word("AS")?;
            let query = self.select()?;
            return Ok(Statement::CreateView(CreateView {
                name,
                columns,
                query,
                span,
            }));
        }
        if self.at_word("INDEX") || self.at_word("UNIQUE") {
            let unique = self.eat_word("UNIQUE");
            self.expect_word("INDEX")?;
            self.if_not_exists()?;
            let (name, _) = self.identifier()?;
            self.expect_word("ON")?;
            let (table, _) = self.identifier()?;
            let columns = self.column_name_list()?;
            return Ok(Statement::CreateIndex(CreateIndex {
                name,
                table,
                columns,
                unique,
                span,
            }));
        }
        if self.at_word("TRIGGER") {
            self.bump();
            self.if_not_exists()?;
            return self.create_trigger(span).map(Statement::CreateTrigger);
        }
        Err(self.unexpected("TABLE, VIEW, INDEX or TRIGGER"))
    }

    fn if_not_exists(&mut self) -> GrammarResult<bool> {
        if self.eat_word("IF") {
            self.expect_word("NOT")?;
            self.expect_word("EXISTS")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn column_def_list(&mut self) -> GrammarResult<Vec<ColumnDef>> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut columns: Vec<ColumnDef> = Vec::new();
        loop {
            if self.at_table_constraint() {
                self.table_constraint(&mut columns)?;
            } else {
                columns.push(self.column_def()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(columns)
    }

    fn at_table_constraint(&self) -> bool {
        matches!(
            self.peek_word().as_deref(),
            Some("PRIMARY") | Some("UNIQUE") | Some("CHECK") | Some("FOREIGN") | Some("CONSTRAINT")
        )
    }

    /// Table-level constraints. PRIMARY KEY marks its columns not-null; the
    /// rest have no bearing on types and are skipped.
    fn table_constraint(&mut self, columns: &mut [ColumnDef]) -> GrammarResult<()> {
        if self.eat_word("CONSTRAINT") {
            self.identifier()?;
        }
        if self.eat_word("PRIMARY") {
            self.expect_word("KEY")?;
            let names = self.column_name_list()?;
            for name in &names {
                if let Some(col) = columns.iter_mut().find(|c| &c.name == name) {
                    col.primary_key = true;
                    col.not_null = true;
                }
            }
            return Ok(());
        }
        if self.eat_word("UNIQUE") {
            self.column_name_list()?;
            return Ok(());
        }
        if self.eat_word("CHECK") {
            self.expect(TokenKind::LParen, "'('")?;
            self.expr()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(());
        }
        self.expect_word("FOREIGN")?;
        self.expect_word("KEY")?;
        self.column_name_list()?;
        self.expect_word("REFERENCES")?;
        self.identifier()?;
        if self.at(&TokenKind::LParen) {
            self.column_name_list()?;
        }
        Ok(())
    }

    pub(crate) fn column_def(&mut self) -> GrammarResult<ColumnDef> {
        let span = self.span();
        let (name, _) = self.identifier()?;
        let declared_type = self.type_name()?;
        let mut not_null = false;
        let mut primary_key = false;
        let mut default = None;
        loop {
            if self.eat_word("NOT") {
                self.expect_word("NULL")?;
                not_null = true;
            } else if self.eat_word("NULL") {
                not_null = false;
            } else if self.eat_word("PRIMARY") {
                self.expect_word("KEY")?;
                self.eat_word("ASC");
                self.eat_word("DESC");
                self.eat_word("AUTOINCREMENT");
                primary_key = true;
                not_null = true;
            } else if self.eat_word("UNIQUE") {
                // no type consequence
            } else if self.eat_word("DEFAULT") {
                if self.eat(&TokenKind::LParen) {
                    default = Some(self.expr()?);
                    self.expect(TokenKind::RParen, "')'")?;
                } else {
                    default = Some(self.expr()?);
                }
            } else if self.eat_word("CHECK") {
                self.expect(TokenKind::LParen, "'('")?;
                self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
            } else if self.eat_word("REFERENCES") {
                self.identifier()?;
                if self.at(&TokenKind::LParen) {
                    self.column_name_list()?;
                }
            } else if self.eat_word("COLLATE") {
                self.identifier_any()?;
            } else {
                break;
            }
        }
        Ok(ColumnDef {
            name,
            declared_type,
            not_null,
            primary_key,
            default,
            span,
        })
    }

    fn create_trigger(&mut self, span: sqlgen_ir::Span) -> GrammarResult<CreateTrigger> {
        let (name, _) = self.identifier()?;
        let timing = if self.eat_word("BEFORE") {
            TriggerTiming::Before
        } else {
            self.expect_word("AFTER")?;
            TriggerTiming::After
        };
        let event = if self.eat_word("INSERT") {
            TriggerEvent::Insert
        } else if self.eat_word("UPDATE") {
            if self.eat_word("OF") {
                loop {
                    self.identifier()?;
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            TriggerEvent::Update
        } else {
            self.expect_word("DELETE")?;
            TriggerEvent::Delete
        };
        self.expect_word("ON")?;
        let (table, _) = self.identifier()?;
        if self.eat_word("FOR") {
            self.expect_word("EACH")?;
            self.expect_word("ROW")?;
        }
        if self.eat_word("WHEN") {
            self.expr()?;
        }
        self.expect_word("BEGIN")?;
        let mut body = Vec::new();
        while !self.at_word("END") {
            if self.at(&TokenKind::Eof) {
                return Err(self.unexpected("END"));
            }
            body.push(self.statement()?);
            self.expect(TokenKind::Semicolon, "';'")?;
        }
        self.expect_word("END")?;
        Ok(CreateTrigger {
            name,
            table,
            event,
            timing,
            body,
            span,
        })
    }

    pub(crate) fn alter_table(&mut self) -> GrammarResult<AlterTable> {
        let span = self.expect_word("ALTER")?;
        self.expect_word("TABLE")?;
        let (table, _) = self.identifier()?;

        let action = if self.eat_word("ADD") {
            self.eat_word("COLUMN");
            AlterAction::AddColumn(self.column_def()?)
        } else if self.eat_word("RENAME") {
            if self.eat_word("TO") {
                let (to, _) = self.identifier()?;
                AlterAction::RenameTo(to)
            } else {
                if !self.grammar().supports(RuleId::AlterRenameColumn) {
                    return Err(ParseError::new(
                        format!(
                            "ALTER TABLE ... RENAME COLUMN is not supported by {}",
                            self.grammar().dialect()
                        ),
                        self.span(),
                    ));
                }
                self.eat_word("COLUMN");
                let (from, _) = self.identifier()?;
                self.expect_word("TO")?;
                let (to, _) = self.identifier()?;
                AlterAction::RenameColumn { from, to }
            }
        } else if self.eat_word("DROP") {
            if !self.grammar().supports(RuleId::AlterDropColumn) {
                return Err(ParseError::new(
                    format!(
                        "ALTER TABLE ... DROP COLUMN is not supported by {}",
                        self.grammar().dialect()
                    ),
                    self.span(),
                ));
            }
            self.eat_word("COLUMN");
            let (name, _) = self.identifier()?;
            AlterAction::DropColumn(name)
        } else {
            return Err(self.unexpected("ADD, RENAME or DROP"));
        };

        Ok(AlterTable {
            table,
            action,
            span,
        })
    }

    pub(crate) fn drop_statement(&mut self) -> GrammarResult<Drop> {
        let span = self.expect_word("DROP")?;
        let kind = if self.eat_word("TABLE") {
            ObjectKind::Table
        } else if self.eat_word("VIEW") {
            ObjectKind::View
        } else if self.eat_word("INDEX") {
            ObjectKind::Index
        } else if self.eat_word("TRIGGER") {
            ObjectKind::Trigger
        } else {
            return Err(self.unexpected("TABLE, VIEW, INDEX or TRIGGER"));
        };
        let if_exists = if self.eat_word("IF") {
            self.expect_word("EXISTS")?;
            true
        } else {
            false
        };
        let (name, _) = self.identifier()?;
        Ok(Drop {
            kind,
            name,
            if_exists,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::compose::Grammar;
    use crate::parser::parse;
    use sqlgen_ir::{AlterAction, Dialect, SqliteVersion, Statement, TriggerTiming};

    fn parse_one(grammar: &Grammar, sql: &str) -> Statement {
        let outcome = parse(grammar, sql);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        outcome.file.statements[0].statement.clone()
    }

    fn sqlite(version: SqliteVersion) -> Grammar {
        Grammar::compose(Dialect::Sqlite(version))
    }

    #[test]
    fn test_create_table_with_constraints() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "CREATE TABLE users (\
               id INTEGER PRIMARY KEY AUTOINCREMENT,\
               name TEXT NOT NULL,\
               email VARCHAR(100) UNIQUE,\
               created_at DATETIME DEFAULT CURRENT_TIMESTAMP\
             );",
        );
        let Statement::CreateTable(table) = stmt else {
            panic!("expected create table");
        };
        assert_eq!(table.columns.len(), 4);
        assert!(table.columns[0].primary_key);
        assert!(table.columns[0].not_null);
        assert!(table.columns[1].not_null);
        assert!(!table.columns[2].not_null);
        assert_eq!(table.columns[2].declared_type, "VARCHAR(100)");
        assert!(table.columns[3].default.is_some());
    }

    #[test]
    fn test_table_level_primary_key_marks_columns() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "CREATE TABLE pairs (a INTEGER, b INTEGER, PRIMARY KEY (a, b));",
        );
        let Statement::CreateTable(table) = stmt else {
            panic!("expected create table");
        };
        assert!(table.columns.iter().all(|c| c.primary_key && c.not_null));
    }

    #[test]
    fn test_create_view_with_column_aliases() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "CREATE VIEW v (x, y) AS SELECT a, b FROM t;",
        );
        let Statement::CreateView(view) = stmt else {
            panic!("expected create view");
        };
        assert_eq!(view.columns.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_create_unique_index() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "CREATE UNIQUE INDEX idx_email ON users (email);",
        );
        let Statement::CreateIndex(index) = stmt else {
            panic!("expected create index");
        };
        assert!(index.unique);
        assert_eq!(index.table, "users");
    }

    #[test]
    fn test_create_trigger_with_body() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "CREATE TRIGGER audit AFTER UPDATE ON users FOR EACH ROW BEGIN \
               INSERT INTO log (msg) VALUES ('changed'); \
             END;",
        );
        let Statement::CreateTrigger(trigger) = stmt else {
            panic!("expected create trigger");
        };
        assert_eq!(trigger.timing, TriggerTiming::After);
        assert_eq!(trigger.body.len(), 1);
    }

    #[test]
    fn test_rename_column_gated_at_3_25() {
        let sql = "ALTER TABLE t RENAME COLUMN a TO b;";
        let outcome = parse(&sqlite(SqliteVersion::V3_24), sql);
        assert_eq!(outcome.errors.len(), 1);

        let stmt = parse_one(&sqlite(SqliteVersion::V3_25), sql);
        let Statement::AlterTable(alter) = stmt else {
            panic!("expected alter table");
        };
        assert!(matches!(alter.action, AlterAction::RenameColumn { .. }));
    }

    #[test]
    fn test_drop_column_gated_at_3_35() {
        let sql = "ALTER TABLE t DROP COLUMN a;";
        let outcome = parse(&sqlite(SqliteVersion::V3_33), sql);
        assert_eq!(outcome.errors.len(), 1);

        let stmt = parse_one(&sqlite(SqliteVersion::V3_35), sql);
        let Statement::AlterTable(alter) = stmt else {
            panic!("expected alter table");
        };
        assert!(matches!(alter.action, AlterAction::DropColumn(_)));
    }

    #[test]
    fn test_rename_table_allowed_everywhere() {
        let stmt = parse_one(
            &sqlite(SqliteVersion::V3_18),
            "ALTER TABLE old_name RENAME TO new_name;",
        );
        let Statement::AlterTable(alter) = stmt else {
            panic!("expected alter table");
        };
        assert!(matches!(alter.action, AlterAction::RenameTo(ref to) if to == "new_name"));
    }

    #[test]
    fn test_drop_table_if_exists() {
        let stmt = parse_one(&sqlite(SqliteVersion::V3_18), "DROP TABLE IF EXISTS t;");
        let Statement::Drop(drop) = stmt else {
            panic!("expected drop");
        };
        assert!(drop.if_exists);
    }
}
