// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # File validation
//!
//! Runs the analyzer over every statement of a parsed file, adds the
//! file-level structural checks (duplicate query labels), and returns every
//! diagnostic found. Validation never stops early: a broken statement still
//! lets every other statement report its own problems.

use crate::analyzer::{Analyzer, StatementAnalysis};
use crate::error::Diagnostic;
use crate::lazy_query::ShapeCache;
use sqlgen_catalog::Schema;
use sqlgen_function_registry::FunctionRegistry;
use sqlgen_ir::{Dialect, Module, SqlFile};

/// Everything validation learned about one file
#[derive(Debug)]
pub struct FileValidation {
    /// Per-statement analyses, paired with the query label if one was given
    pub analyses: Vec<(Option<String>, StatementAnalysis)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileValidation {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Validates parsed files against a folded schema
pub struct Validator<'a> {
    schema: &'a Schema,
    registry: &'a FunctionRegistry,
    dialect: Dialect,
    modules: Vec<Module>,
}

impl<'a> Validator<'a> {
    pub fn new(
        schema: &'a Schema,
        registry: &'a FunctionRegistry,
        dialect: Dialect,
        modules: &[Module],
    ) -> Self {
        Self {
            schema,
            registry,
            dialect,
            modules: modules.to_vec(),
        }
    }

    pub fn validate_file(&self, file: &SqlFile, shapes: &mut ShapeCache) -> FileValidation {
        let mut analyses = Vec::with_capacity(file.statements.len());
        let mut diagnostics = Vec::new();

        let mut labels: Vec<&str> = Vec::new();
        for labeled in &file.statements {
            if let Some(label) = &labeled.label {
                if labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
                    diagnostics.push(Diagnostic::new(
                        labeled.statement.span(),
                        format!("duplicate query label: {label}"),
                    ));
                }
                labels.push(label);
            }
        }

        let mut analyzer = Analyzer::new(
            self.schema,
            self.registry,
            self.dialect,
            &self.modules,
            shapes,
        );
        for labeled in &file.statements {
            let analysis = analyzer.analyze_statement(&labeled.statement);
            analyses.push((labeled.label.clone(), analysis));
        }
        diagnostics.extend(analyzer.take_diagnostics());

        FileValidation {
            analyses,
            diagnostics,
        }
    }
}
