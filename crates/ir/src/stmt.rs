// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statements
//!
//! Syntax-tree types for full SQL statements: schema definitions
//! (CREATE TABLE/VIEW/INDEX/TRIGGER, ALTER TABLE, DROP), queries (SELECT with
//! joins, CTEs and compound operators) and DML (INSERT with upsert clauses,
//! UPDATE, DELETE, each with an optional RETURNING clause).
//!
//! A source file is a sequence of statements, some of which carry a label
//! (`name:`) marking them as named queries for code generation.

use crate::expr::{Expr, OrderingTerm};
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlFile {
    pub statements: Vec<LabeledStatement>,
}

/// A statement with an optional query label for codegen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    /// `label:` preceding the statement, if any
    pub label: Option<String>,
    pub statement: Statement,
}

/// A SQL statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Statement {
    CreateTable(CreateTable),
    CreateView(CreateView),
    CreateIndex(CreateIndex),
    CreateTrigger(CreateTrigger),
    AlterTable(AlterTable),
    Drop(Drop),
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::CreateTable(s) => s.span,
            Statement::CreateView(s) => s.span,
            Statement::CreateIndex(s) => s.span,
            Statement::CreateTrigger(s) => s.span,
            Statement::AlterTable(s) => s.span,
            Statement::Drop(s) => s.span,
            Statement::Select(s) => s.span,
            Statement::Insert(s) => s.span,
            Statement::Update(s) => s.span,
            Statement::Delete(s) => s.span,
        }
    }
}

/// `CREATE TABLE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: String,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    pub span: Span,
}

/// A column definition within CREATE TABLE / ALTER TABLE ADD COLUMN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Declared type as written (e.g. `VARCHAR(100)`, `DATETIME`)
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default: Option<Expr>,
    pub span: Span,
}

/// `CREATE VIEW name [(cols)] AS SELECT ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateView {
    pub name: String,
    /// Explicit column aliases, if given
    pub columns: Option<Vec<String>>,
    pub query: Select,
    pub span: Span,
}

/// `CREATE [UNIQUE] INDEX`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub span: Span,
}

/// `CREATE TRIGGER`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTrigger {
    pub name: String,
    pub table: String,
    pub event: TriggerEvent,
    pub timing: TriggerTiming,
    /// Body statements between BEGIN and END
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerTiming {
    Before,
    After,
}

/// `ALTER TABLE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTable {
    pub table: String,
    pub action: AlterAction,
    pub span: Span,
}

/// Matched exhaustively by schema folding: a new action must be folded,
/// never silently skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    RenameTo(String),
    RenameColumn { from: String, to: String },
    DropColumn(String),
}

/// `DROP TABLE/VIEW/INDEX/TRIGGER`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drop {
    pub kind: ObjectKind,
    pub name: String,
    pub if_exists: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Table,
    View,
    Index,
    Trigger,
}

/// A full SELECT statement: optional WITH prefix, a possibly-compound body,
/// and trailing ORDER BY / LIMIT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub with: Option<With>,
    pub body: SelectBody,
    pub order_by: Vec<OrderingTerm>,
    pub limit: Option<Limit>,
    pub span: Span,
}

impl Select {
    /// The leftmost SELECT core, which defines column names for the whole
    /// compound statement
    pub fn first_core(&self) -> &SelectCore {
        self.body.first_core()
    }

    /// All cores left to right (one per compound arm)
    pub fn cores(&self) -> Vec<&SelectCore> {
        self.body.cores()
    }
}

/// A SELECT body: a single core or a compound of cores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectBody {
    Core(SelectCore),
    Compound {
        left: Box<SelectBody>,
        op: CompoundOp,
        right: SelectCore,
    },
}

impl SelectBody {
    pub fn first_core(&self) -> &SelectCore {
        match self {
            SelectBody::Core(core) => core,
            SelectBody::Compound { left, .. } => left.first_core(),
        }
    }

    pub fn cores(&self) -> Vec<&SelectCore> {
        match self {
            SelectBody::Core(core) => vec![core],
            SelectBody::Compound { left, right, .. } => {
                let mut cores = left.cores();
                cores.push(right);
                cores
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundOp {
    Union,
    UnionAll,
    Intersect,
    Except,
}

/// One SELECT core: projection, FROM, WHERE, GROUP BY, HAVING
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCore {
    pub distinct: bool,
    pub columns: Vec<ResultColumn>,
    pub from: Option<FromClause>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub span: Span,
}

/// An item in the SELECT projection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultColumn {
    /// `*`
    Wildcard(Span),
    /// `table.*`
    TableWildcard { table: String, span: Span },
    /// An expression with an optional alias
    Expr { expr: Expr, alias: Option<String> },
}

/// The FROM clause: a first source plus zero or more joins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    pub first: TableOrSubquery,
    pub joins: Vec<Join>,
}

/// A table reference or a parenthesized subquery in FROM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableOrSubquery {
    Table {
        name: String,
        alias: Option<String>,
        span: Span,
    },
    Subquery {
        query: Box<Select>,
        alias: Option<String>,
        span: Span,
    },
}

impl TableOrSubquery {
    pub fn span(&self) -> Span {
        match self {
            TableOrSubquery::Table { span, .. } => *span,
            TableOrSubquery::Subquery { span, .. } => *span,
        }
    }
}

/// One JOIN in a FROM clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub natural: bool,
    pub table: TableOrSubquery,
    pub constraint: Option<JoinConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<String>),
}

/// A WITH prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub recursive: bool,
    pub ctes: Vec<CommonTableExpression>,
}

/// One common table expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpression {
    pub name: String,
    pub columns: Option<Vec<String>>,
    pub query: Select,
    pub span: Span,
}

/// LIMIT / OFFSET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub limit: Expr,
    pub offset: Option<Expr>,
}

/// `INSERT INTO`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: String,
    /// Explicit column list, if given
    pub columns: Option<Vec<String>>,
    pub source: InsertSource,
    pub upsert: Option<Upsert>,
    pub returning: Vec<ResultColumn>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Select(Box<Select>),
    DefaultValues,
}

/// Upsert clauses, per dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Upsert {
    /// SQLite / PostgreSQL `ON CONFLICT [(cols)] DO ...`
    OnConflict {
        targets: Vec<String>,
        action: ConflictAction,
    },
    /// MySQL `ON DUPLICATE KEY UPDATE ...`
    OnDuplicateKeyUpdate { assignments: Vec<Assignment> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConflictAction {
    Nothing,
    Update {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
}

/// One `col = expr` assignment in UPDATE or an upsert clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
    pub span: Span,
}

/// `UPDATE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: String,
    pub alias: Option<String>,
    pub assignments: Vec<Assignment>,
    /// `UPDATE ... FROM` sources, when the dialect supports them
    pub from: Option<FromClause>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<ResultColumn>,
    pub span: Span,
}

/// `DELETE FROM`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: String,
    pub alias: Option<String>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<ResultColumn>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core(span: Span) -> SelectCore {
        SelectCore {
            distinct: false,
            columns: vec![ResultColumn::Wildcard(span)],
            from: None,
            where_clause: None,
            group_by: vec![],
            having: None,
            span,
        }
    }

    #[test]
    fn test_compound_cores_left_to_right() {
        let a = core(Span::new(1, 1));
        let b = core(Span::new(2, 1));
        let c = core(Span::new(3, 1));
        let body = SelectBody::Compound {
            left: Box::new(SelectBody::Compound {
                left: Box::new(SelectBody::Core(a)),
                op: CompoundOp::Union,
                right: b,
            }),
            op: CompoundOp::UnionAll,
            right: c,
        };
        let cores = body.cores();
        assert_eq!(cores.len(), 3);
        assert_eq!(cores[0].span, Span::new(1, 1));
        assert_eq!(cores[2].span, Span::new(3, 1));
        assert_eq!(body.first_core().span, Span::new(1, 1));
    }
}
