// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgen IR
//!
//! Core data model shared by every sqlgen crate:
//!
//! - [`Dialect`] and its "extends" chain terminating at SQL-92
//! - [`IntermediateType`]: storage class + nullability + host type/adapter,
//!   the unit of type inference
//! - The syntax tree: [`Expr`], [`Statement`] and friends
//!
//! This crate holds no behavior beyond structural queries on these types;
//! parsing lives in `sqlgen-grammar` and inference in `sqlgen-semantic`.

mod dialect;
mod expr;
mod span;
mod stmt;
mod types;

pub use dialect::{Dialect, DialectExtension, Module, SqliteVersion};
pub use expr::{
    BinaryOp, BindParameter, BindParameterKind, CaseBranch, ColumnRef, Expr, FunctionCall,
    Literal, OrderingTerm, UnaryOp, WindowSpec,
};
pub use span::Span;
pub use stmt::{
    AlterAction, AlterTable, Assignment, ColumnDef, CommonTableExpression, CompoundOp,
    ConflictAction, CreateIndex, CreateTable, CreateTrigger, CreateView, Delete, Drop,
    FromClause, Insert, InsertSource, Join, JoinConstraint, JoinKind, LabeledStatement, Limit,
    ObjectKind, ResultColumn, Select, SelectBody, SelectCore, SqlFile, Statement,
    TableOrSubquery, TriggerEvent, TriggerTiming, Update, Upsert, With,
};
pub use types::{ColumnAdapter, HostType, IntermediateType, StorageClass};
