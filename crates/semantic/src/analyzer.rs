// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement analysis
//!
//! The analyzer walks one statement at a time against a folded schema,
//! building scopes for every SELECT core, typing every expression through
//! the resolver chain, collecting bind parameter sites and reporting every
//! problem it finds as a diagnostic instead of stopping at the first one.
//!
//! View shapes are computed lazily through the [`ShapeCache`] when a view is
//! first referenced, with explicit cycle detection.

use crate::binder::Binder;
use crate::error::{Diagnostic, DiagnosticSink, SemanticError};
use crate::lazy_query::{QueryColumn, ShapeCache};
use crate::mixin::MixinRegistry;
use crate::resolver::{resolver_chain, DialectResolver};
use crate::scope::{ScopeManager, ScopeType};
use crate::symbol::{ColumnSymbol, TableSymbol};
use sqlgen_catalog::{Schema, Table};
use sqlgen_function_registry::FunctionRegistry;
use sqlgen_ir::{
    Assignment, ColumnRef, CommonTableExpression, ConflictAction, CreateTrigger, Delete, Dialect,
    Expr, FromClause, FunctionCall, Insert, InsertSource, IntermediateType, Join, JoinConstraint,
    JoinKind, Literal, Module, OrderingTerm, ResultColumn, Select, SelectCore, Span, Statement,
    TableOrSubquery, TriggerEvent, Update, Upsert, With,
};
use std::rc::Rc;
use tracing::debug;

/// What one statement analysis produced
#[derive(Debug, Clone, PartialEq)]
pub struct StatementAnalysis {
    /// Shape of the rows the statement returns (empty for non-returning DML
    /// and DDL)
    pub result_columns: Vec<QueryColumn>,
    /// Bind parameters by 1-based index, unified across usage sites
    pub parameters: Vec<(u32, IntermediateType)>,
}

/// Per-statement semantic analyzer
pub struct Analyzer<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) registry: &'a FunctionRegistry,
    dialect: Dialect,
    resolvers: Rc<Vec<Box<dyn DialectResolver>>>,
    mixins: MixinRegistry,
    pub(crate) scopes: ScopeManager,
    pub(crate) binder: Binder,
    diagnostics: Vec<Diagnostic>,
    shapes: &'a mut ShapeCache,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        schema: &'a Schema,
        registry: &'a FunctionRegistry,
        dialect: Dialect,
        modules: &[Module],
        shapes: &'a mut ShapeCache,
    ) -> Self {
        Self {
            schema,
            registry,
            dialect,
            resolvers: Rc::new(resolver_chain(dialect, modules)),
            mixins: MixinRegistry::standard(),
            scopes: ScopeManager::new(),
            binder: Binder::new(),
            diagnostics: Vec::new(),
            shapes,
        }
    }

    /// Analyze one statement: result shape plus unified bind parameters
    pub fn analyze_statement(&mut self, statement: &Statement) -> StatementAnalysis {
        debug!(dialect = %self.dialect, "analyzing statement");
        let result_columns = self.statement_shape(statement, None);
        let binder = std::mem::take(&mut self.binder);
        let parameters = binder.finish(&mut self.diagnostics);
        StatementAnalysis {
            result_columns,
            parameters,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.report(diagnostic);
    }

    fn report_error(&mut self, span: Span, error: &SemanticError) {
        self.report(Diagnostic::new(span, error.to_string()));
    }

    // ------------------------------------------------------------------
    // Expression typing (entry points used by the resolver chain)
    // ------------------------------------------------------------------

    /// Run an expression through the resolver chain. `expected` is the type
    /// the surrounding context implies, consumed by bind parameters.
    pub(crate) fn infer_expr(
        &mut self,
        scope: usize,
        expr: &Expr,
        expected: Option<&IntermediateType>,
    ) -> IntermediateType {
        let resolvers = Rc::clone(&self.resolvers);
        for resolver in resolvers.iter() {
            if let Some(ty) = resolver.expr_type(self, scope, expr, expected) {
                return ty;
            }
        }
        // The ANSI terminal answers for everything, so this is unreachable
        // unless a chain was built without it.
        IntermediateType::unresolved()
    }

    /// Type a function call: arguments first, then the chain; an unclaimed
    /// name is an unknown function.
    pub(crate) fn resolve_call(&mut self, scope: usize, call: &FunctionCall) -> IntermediateType {
        if let Some(over) = &call.over {
            for expr in &over.partition_by {
                self.infer_expr(scope, expr, None);
            }
            for term in &over.order_by {
                self.infer_expr(scope, &term.expr, None);
            }
        }
        let args: Vec<IntermediateType> = call
            .args
            .iter()
            .map(|arg| self.infer_expr(scope, arg, None))
            .collect();
        let resolvers = Rc::clone(&self.resolvers);
        for resolver in resolvers.iter() {
            if let Some(ty) = resolver.call_type(self, scope, call, &args) {
                return ty;
            }
        }
        self.report(Diagnostic::new(
            call.span,
            format!("unknown function: {}", call.name.to_lowercase()),
        ));
        IntermediateType::unresolved()
    }

    /// Resolve a column reference against the scope chain
    pub(crate) fn resolve_column_ref(
        &mut self,
        scope: usize,
        column: &ColumnRef,
    ) -> IntermediateType {
        match &column.table {
            Some(table) => {
                let result = self
                    .scopes
                    .resolve_table(table, scope)
                    .map(|t| t.find_column(&column.column).map(|c| c.ty.clone()));
                match result {
                    Ok(Some(ty)) => ty,
                    Ok(None) => {
                        self.report_error(
                            column.span,
                            &SemanticError::ColumnNotFound(format!(
                                "{}.{}",
                                table, column.column
                            )),
                        );
                        IntermediateType::unresolved()
                    }
                    Err(error) => {
                        self.report_error(column.span, &error);
                        IntermediateType::unresolved()
                    }
                }
            }
            None => {
                let result = self
                    .scopes
                    .resolve_column(&column.column, scope)
                    .map(|(_, c)| c.ty.clone());
                match result {
                    Ok(ty) => ty,
                    Err(error) => {
                        self.report_error(column.span, &error);
                        IntermediateType::unresolved()
                    }
                }
            }
        }
    }

    /// Shape of a subquery appearing inside an expression
    pub(crate) fn subquery_shape(&mut self, query: &Select, parent: usize) -> Vec<QueryColumn> {
        self.select_shape(query, Some(parent))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statement_shape(&mut self, statement: &Statement, parent: Option<usize>) -> Vec<QueryColumn> {
        match statement {
            Statement::Select(select) => self.select_shape(select, parent),
            Statement::Insert(insert) => self.analyze_insert(insert, parent),
            Statement::Update(update) => self.analyze_update(update, parent),
            Statement::Delete(delete) => self.analyze_delete(delete, parent),
            Statement::CreateView(view) => {
                // Force the shape so definition problems surface here
                self.view_shape(&view.name, view.span);
                Vec::new()
            }
            Statement::CreateTrigger(trigger) => {
                self.analyze_trigger(trigger);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // SELECT
    // ------------------------------------------------------------------

    fn select_shape(&mut self, select: &Select, parent: Option<usize>) -> Vec<QueryColumn> {
        let scope_type = match parent {
            None => ScopeType::Query,
            Some(_) => ScopeType::Subquery,
        };
        let statement_scope = self.scopes.create_scope(scope_type, parent);
        if let Some(with) = &select.with {
            self.register_ctes(with, statement_scope);
        }

        let cores = select.cores();
        let mut core_scopes = Vec::with_capacity(cores.len());
        let mut shapes = Vec::with_capacity(cores.len());
        for core in &cores {
            let (scope, shape) = self.core_shape(core, statement_scope);
            core_scopes.push(scope);
            shapes.push(shape);
        }

        let mut merged = shapes.remove(0);
        for (shape, core) in shapes.into_iter().zip(cores.iter().skip(1)) {
            self.merge_compound_arm(&mut merged, shape, core.span);
        }

        // ORDER BY sees result-column aliases before scope columns
        let order_scope = core_scopes[0];
        for term in &select.order_by {
            self.order_term(term, &merged, order_scope);
        }
        if let Some(limit) = &select.limit {
            let integer = IntermediateType::integer();
            self.infer_expr(order_scope, &limit.limit, Some(&integer));
            if let Some(offset) = &limit.offset {
                self.infer_expr(order_scope, offset, Some(&integer));
            }
        }
        merged
    }

    fn merge_compound_arm(
        &mut self,
        merged: &mut [QueryColumn],
        shape: Vec<QueryColumn>,
        span: Span,
    ) {
        if shape.len() != merged.len() {
            self.report(Diagnostic::new(
                span,
                format!(
                    "compound SELECT arms return {} and {} columns",
                    merged.len(),
                    shape.len()
                ),
            ));
            return;
        }
        for (column, arm) in merged.iter_mut().zip(&shape) {
            column.ty.storage_class = column.ty.storage_class.widen(arm.ty.storage_class);
            column.ty.nullable |= arm.ty.nullable;
            column.ty.unresolved |= arm.ty.unresolved;
            if column.ty.host_type != arm.ty.host_type {
                column.ty.host_type = None;
            }
            if column.ty.adapter != arm.ty.adapter {
                column.ty.adapter = None;
            }
        }
    }

    fn core_shape(&mut self, core: &SelectCore, parent: usize) -> (usize, Vec<QueryColumn>) {
        let scope_type = self.scopes.get(parent).scope_type;
        let scope = self.scopes.create_scope(scope_type, Some(parent));
        if let Some(from) = &core.from {
            self.add_from(scope, from);
        }
        if let Some(where_clause) = &core.where_clause {
            self.infer_expr(scope, where_clause, None);
        }
        for expr in &core.group_by {
            self.infer_expr(scope, expr, None);
        }
        if let Some(having) = &core.having {
            self.infer_expr(scope, having, None);
        }
        let shape = self.project(scope, &core.columns);
        (scope, shape)
    }

    /// Expand a projection list into a result shape
    fn project(&mut self, scope: usize, columns: &[ResultColumn]) -> Vec<QueryColumn> {
        let mut shape = Vec::new();
        for column in columns {
            match column {
                ResultColumn::Wildcard(span) => {
                    let expanded: Vec<QueryColumn> = self
                        .scopes
                        .get(scope)
                        .tables
                        .iter()
                        .flat_map(|table| {
                            table
                                .columns
                                .iter()
                                .filter(|c| !c.hidden)
                                .map(|c| QueryColumn::new(c.name.clone(), c.ty.clone()))
                        })
                        .collect();
                    if expanded.is_empty() {
                        self.report(Diagnostic::new(*span, "no tables to select from"));
                    }
                    shape.extend(expanded);
                }
                ResultColumn::TableWildcard { table, span } => {
                    let result = self.scopes.resolve_table(table, scope).map(|t| {
                        t.columns
                            .iter()
                            .filter(|c| !c.hidden)
                            .map(|c| QueryColumn::new(c.name.clone(), c.ty.clone()))
                            .collect::<Vec<_>>()
                    });
                    match result {
                        Ok(expanded) => shape.extend(expanded),
                        Err(error) => self.report_error(*span, &error),
                    }
                }
                ResultColumn::Expr { expr, alias } => {
                    let ty = self.infer_expr(scope, expr, None);
                    match self.mixins.expose(column, &ty) {
                        Some(exposed) => shape.extend(exposed),
                        None => {
                            let name = alias.clone().unwrap_or_else(|| expr.display_name());
                            shape.push(QueryColumn::new(name, ty));
                        }
                    }
                }
            }
        }
        shape
    }

    fn order_term(&mut self, term: &OrderingTerm, shape: &[QueryColumn], scope: usize) {
        match &term.expr {
            // A bare name may refer to a result-column alias
            Expr::Column(column) if column.table.is_none() => {
                if shape
                    .iter()
                    .any(|c| c.name.eq_ignore_ascii_case(&column.column))
                {
                    return;
                }
                self.infer_expr(scope, &term.expr, None);
            }
            // Positional ordering
            Expr::Literal {
                value: Literal::Integer(position),
                span,
            } => {
                if *position < 1 || *position as usize > shape.len() {
                    self.report(Diagnostic::new(
                        *span,
                        format!("ORDER BY position {position} is out of range"),
                    ));
                }
            }
            _ => {
                self.infer_expr(scope, &term.expr, None);
            }
        }
    }

    // ------------------------------------------------------------------
    // CTEs and views
    // ------------------------------------------------------------------

    fn register_ctes(&mut self, with: &With, scope: usize) {
        for cte in &with.ctes {
            if with.recursive {
                // Seed the self-reference with the non-recursive first arm;
                // its analysis is a probe, so roll back binds and diagnostics
                // recorded during it.
                let saved_binder = self.binder.clone();
                let saved_diagnostics = self.diagnostics.len();
                let (_, seed) = self.core_shape(cte.query.first_core(), scope);
                self.binder = saved_binder;
                self.diagnostics.truncate(saved_diagnostics);

                let seed = self.rename_columns(cte.columns.as_deref(), seed, cte.span);
                let symbol = cte_symbol(cte, &seed);
                self.scopes.get_mut(scope).add_cte(symbol);
            }
            let shape = self.select_shape(&cte.query, Some(scope));
            let shape = self.rename_columns(cte.columns.as_deref(), shape, cte.span);
            let symbol = cte_symbol(cte, &shape);
            self.scopes.get_mut(scope).add_cte(symbol);
        }
    }

    /// Shape of a view, computed on first reference and cached per generation
    fn view_shape(&mut self, name: &str, span: Span) -> Vec<QueryColumn> {
        if let Some(shape) = self.shapes.get(name) {
            return shape.clone();
        }
        if let Err(error) = self.shapes.enter(name) {
            self.report_error(span, &error);
            return Vec::new();
        }
        debug!(view = name, "computing view shape");
        let shape = match self.schema.view(name).cloned() {
            Some(view) => {
                let shape = self.select_shape(&view.query, None);
                self.rename_columns(view.columns.as_deref(), shape, span)
            }
            None => Vec::new(),
        };
        self.shapes.leave(name);
        self.shapes.insert(name, shape.clone());
        shape
    }

    /// Apply explicit column aliases from a view or CTE definition
    fn rename_columns(
        &mut self,
        names: Option<&[String]>,
        shape: Vec<QueryColumn>,
        span: Span,
    ) -> Vec<QueryColumn> {
        let Some(names) = names else {
            return shape;
        };
        if names.len() != shape.len() {
            self.report(Diagnostic::new(
                span,
                format!(
                    "{} column names given for {} result columns",
                    names.len(),
                    shape.len()
                ),
            ));
        }
        names
            .iter()
            .zip(shape)
            .map(|(name, column)| QueryColumn::new(name.clone(), column.ty))
            .collect()
    }

    // ------------------------------------------------------------------
    // FROM clauses and joins
    // ------------------------------------------------------------------

    fn add_from(&mut self, scope: usize, from: &FromClause) {
        if let Some(symbol) = self.from_symbol(&from.first, scope) {
            self.add_symbol(scope, symbol, from.first.span());
        }
        for join in &from.joins {
            self.add_join(scope, join);
        }
    }

    fn add_join(&mut self, scope: usize, join: &Join) {
        let span = join.table.span();
        let Some(mut symbol) = self.from_symbol(&join.table, scope) else {
            if let Some(JoinConstraint::On(expr)) = &join.constraint {
                self.infer_expr(scope, expr, None);
            }
            return;
        };

        // Merge duplicated join columns: the right-hand copies disappear
        // from wildcard expansion and unqualified lookup.
        if join.natural {
            let existing: Vec<String> = self
                .scopes
                .get(scope)
                .tables
                .iter()
                .flat_map(|t| t.columns.iter().filter(|c| !c.hidden))
                .map(|c| c.name.clone())
                .collect();
            let common: Vec<String> = symbol
                .columns
                .iter()
                .filter(|c| existing.iter().any(|e| e.eq_ignore_ascii_case(&c.name)))
                .map(|c| c.name.clone())
                .collect();
            symbol.hide_columns(&common);
        }
        if let Some(JoinConstraint::Using(columns)) = &join.constraint {
            for column in columns {
                let in_left = self
                    .scopes
                    .get(scope)
                    .tables
                    .iter()
                    .any(|t| t.find_column(column).is_some());
                if symbol.find_column(column).is_none() || !in_left {
                    self.report(Diagnostic::new(
                        span,
                        format!("column {column} in USING clause not found on both sides"),
                    ));
                }
            }
            symbol.hide_columns(columns);
        }

        // Outer joins weaken the row-missing side to nullable
        match join.kind {
            JoinKind::Left => symbol = symbol.nullable(),
            JoinKind::Right => self.weaken_scope(scope),
            JoinKind::Full => {
                self.weaken_scope(scope);
                symbol = symbol.nullable();
            }
            JoinKind::Inner | JoinKind::Cross => {}
        }

        self.add_symbol(scope, symbol, span);
        if let Some(JoinConstraint::On(expr)) = &join.constraint {
            self.infer_expr(scope, expr, None);
        }
    }

    fn weaken_scope(&mut self, scope: usize) {
        for table in &mut self.scopes.get_mut(scope).tables {
            for column in &mut table.columns {
                column.ty.nullable = true;
            }
        }
    }

    fn add_symbol(&mut self, scope: usize, symbol: TableSymbol, span: Span) {
        if let Err(error) = self.scopes.get_mut(scope).add_table(symbol) {
            self.report_error(span, &error);
        }
    }

    /// Resolve a FROM source: CTEs shadow tables, tables shadow views
    fn from_symbol(&mut self, source: &TableOrSubquery, scope: usize) -> Option<TableSymbol> {
        match source {
            TableOrSubquery::Table { name, alias, span } => {
                let mut symbol = if let Some(cte) = self.scopes.resolve_cte(name, scope).cloned() {
                    cte
                } else if let Some(table) = self.schema.table(name).cloned() {
                    table_symbol(&table)
                } else if self.schema.view(name).is_some() {
                    let shape = self.view_shape(name, *span);
                    shape_symbol(name, &shape)
                } else {
                    self.report_error(*span, &SemanticError::TableNotFound(name.clone()));
                    return None;
                };
                symbol.alias = alias.clone();
                Some(symbol)
            }
            TableOrSubquery::Subquery { query, alias, .. } => {
                let shape = self.subquery_shape(query, scope);
                let name = alias.clone().unwrap_or_default();
                Some(shape_symbol(&name, &shape))
            }
        }
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    fn analyze_insert(&mut self, insert: &Insert, parent: Option<usize>) -> Vec<QueryColumn> {
        let Some(table) = self.schema.table(&insert.table).cloned() else {
            self.report_error(
                insert.span,
                &SemanticError::TableNotFound(insert.table.clone()),
            );
            return Vec::new();
        };

        let targets: Vec<(String, IntermediateType)> = match &insert.columns {
            Some(names) => names
                .iter()
                .filter_map(|name| match table.column(name) {
                    Some(column) => Some((column.name.clone(), column.ty.clone())),
                    None => {
                        self.report_error(
                            insert.span,
                            &SemanticError::ColumnNotFound(format!(
                                "{}.{}",
                                insert.table, name
                            )),
                        );
                        None
                    }
                })
                .collect(),
            None => table
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.ty.clone()))
                .collect(),
        };

        // VALUES expressions cannot see the table's columns
        let values_scope = self.scopes.create_scope(ScopeType::Query, parent);
        match &insert.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    if row.len() != targets.len() {
                        self.report(Diagnostic::new(
                            insert.span,
                            format!("{} values for {} columns", row.len(), targets.len()),
                        ));
                    }
                    for (value, (_, expected)) in row.iter().zip(&targets) {
                        let expected = expected.clone();
                        self.infer_expr(values_scope, value, Some(&expected));
                    }
                    for value in row.iter().skip(targets.len()) {
                        self.infer_expr(values_scope, value, None);
                    }
                }
            }
            InsertSource::Select(query) => {
                let shape = self.select_shape(query, parent);
                if shape.len() != targets.len() {
                    self.report(Diagnostic::new(
                        insert.span,
                        format!(
                            "SELECT returns {} columns for {} insert columns",
                            shape.len(),
                            targets.len()
                        ),
                    ));
                }
            }
            InsertSource::DefaultValues => {}
        }

        // Upsert assignments and RETURNING see the table's row
        let row_scope = self.scopes.create_scope(ScopeType::Query, parent);
        self.add_symbol(row_scope, table_symbol(&table), insert.span);

        if let Some(upsert) = &insert.upsert {
            match upsert {
                Upsert::OnConflict { targets, action } => {
                    // The proposed row is reachable only as `excluded.col`;
                    // hiding its columns keeps unqualified names and
                    // RETURNING wildcards bound to the table row.
                    let mut excluded = table_symbol(&table);
                    excluded.alias = Some("excluded".to_string());
                    let names: Vec<String> =
                        excluded.columns.iter().map(|c| c.name.clone()).collect();
                    excluded.hide_columns(&names);
                    self.add_symbol(row_scope, excluded, insert.span);
                    for target in targets {
                        if table.column(target).is_none() {
                            self.report_error(
                                insert.span,
                                &SemanticError::ColumnNotFound(format!(
                                    "{}.{}",
                                    insert.table, target
                                )),
                            );
                        }
                    }
                    if let ConflictAction::Update {
                        assignments,
                        where_clause,
                    } = action
                    {
                        self.analyze_assignments(row_scope, &table, assignments);
                        if let Some(where_clause) = where_clause {
                            self.infer_expr(row_scope, where_clause, None);
                        }
                    }
                }
                Upsert::OnDuplicateKeyUpdate { assignments } => {
                    self.analyze_assignments(row_scope, &table, assignments);
                }
                _ => {}
            }
        }

        self.project(row_scope, &insert.returning)
    }

    fn analyze_update(&mut self, update: &Update, parent: Option<usize>) -> Vec<QueryColumn> {
        let Some(table) = self.schema.table(&update.table).cloned() else {
            self.report_error(
                update.span,
                &SemanticError::TableNotFound(update.table.clone()),
            );
            return Vec::new();
        };
        let scope = self.scopes.create_scope(ScopeType::Query, parent);
        let mut symbol = table_symbol(&table);
        symbol.alias = update.alias.clone();
        self.add_symbol(scope, symbol, update.span);
        if let Some(from) = &update.from {
            self.add_from(scope, from);
        }
        self.analyze_assignments(scope, &table, &update.assignments);
        if let Some(where_clause) = &update.where_clause {
            self.infer_expr(scope, where_clause, None);
        }
        if let Some(lock) = table.columns.iter().find(|c| c.lock) {
            let set = update
                .assignments
                .iter()
                .any(|a| a.column.eq_ignore_ascii_case(&lock.name));
            if !set {
                self.report(Diagnostic::new(
                    update.span,
                    format!(
                        "UPDATE of {} must set lock column {}",
                        update.table, lock.name
                    ),
                ));
            }
            let tested = update
                .where_clause
                .as_ref()
                .is_some_and(|w| w.references_column(&lock.name));
            if !tested {
                self.report(Diagnostic::new(
                    update.span,
                    format!(
                        "UPDATE of {} must test lock column {} in its WHERE clause",
                        update.table, lock.name
                    ),
                ));
            }
        }
        self.project(scope, &update.returning)
    }

    fn analyze_delete(&mut self, delete: &Delete, parent: Option<usize>) -> Vec<QueryColumn> {
        let Some(table) = self.schema.table(&delete.table).cloned() else {
            self.report_error(
                delete.span,
                &SemanticError::TableNotFound(delete.table.clone()),
            );
            return Vec::new();
        };
        let scope = self.scopes.create_scope(ScopeType::Query, parent);
        let mut symbol = table_symbol(&table);
        symbol.alias = delete.alias.clone();
        self.add_symbol(scope, symbol, delete.span);
        if let Some(where_clause) = &delete.where_clause {
            self.infer_expr(scope, where_clause, None);
        }
        self.project(scope, &delete.returning)
    }

    fn analyze_assignments(&mut self, scope: usize, table: &Table, assignments: &[Assignment]) {
        for assignment in assignments {
            match table.column(&assignment.column) {
                Some(column) => {
                    let expected = column.ty.clone();
                    self.infer_expr(scope, &assignment.value, Some(&expected));
                }
                None => {
                    self.report_error(
                        assignment.span,
                        &SemanticError::ColumnNotFound(format!(
                            "{}.{}",
                            table.name, assignment.column
                        )),
                    );
                    self.infer_expr(scope, &assignment.value, None);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    fn analyze_trigger(&mut self, trigger: &CreateTrigger) {
        let Some(table) = self.schema.table(&trigger.table).cloned() else {
            self.report_error(
                trigger.span,
                &SemanticError::TableNotFound(trigger.table.clone()),
            );
            return;
        };
        // NEW/OLD row references per event kind
        let scope = self.scopes.create_scope(ScopeType::Query, None);
        let (new_row, old_row) = match trigger.event {
            TriggerEvent::Insert => (true, false),
            TriggerEvent::Delete => (false, true),
            TriggerEvent::Update => (true, true),
        };
        if new_row {
            let mut symbol = table_symbol(&table);
            symbol.alias = Some("NEW".to_string());
            self.add_symbol(scope, symbol, trigger.span);
        }
        if old_row {
            let mut symbol = table_symbol(&table);
            symbol.alias = Some("OLD".to_string());
            self.add_symbol(scope, symbol, trigger.span);
        }
        for statement in &trigger.body {
            self.statement_shape(statement, Some(scope));
        }
    }
}

fn table_symbol(table: &Table) -> TableSymbol {
    TableSymbol::new(table.name.clone()).with_columns(
        table
            .columns
            .iter()
            .map(|c| ColumnSymbol::new(c.name.clone(), c.ty.clone(), table.name.clone()))
            .collect(),
    )
}

fn shape_symbol(name: &str, shape: &[QueryColumn]) -> TableSymbol {
    TableSymbol::new(name).with_columns(
        shape
            .iter()
            .map(|c| ColumnSymbol::new(c.name.clone(), c.ty.clone(), name))
            .collect(),
    )
}

fn cte_symbol(cte: &CommonTableExpression, shape: &[QueryColumn]) -> TableSymbol {
    shape_symbol(&cte.name, shape)
}
