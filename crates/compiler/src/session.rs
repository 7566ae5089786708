// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Compilation sessions
//!
//! A [`Session`] is configured once for a dialect and module set; its grammar
//! is composed at construction and reused for every file. Analysis runs in
//! two passes: all schema statements are folded in file order first, then
//! every file's queries are validated against the final schema. Parse errors,
//! catalog errors and semantic diagnostics all land in the same per-file
//! diagnostic list, and generation is withheld whenever that list is
//! non-empty anywhere in the project.

use serde::Serialize;
use sqlgen_catalog::{Schema, SchemaBuilder};
use sqlgen_function_registry::FunctionRegistry;
use sqlgen_grammar::{parse, Grammar, ParseOutcome};
use sqlgen_ir::{Dialect, IntermediateType, Module};
use sqlgen_semantic::{Diagnostic, ShapeCache, Validator};
use tracing::debug;

/// One input file, by name
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A labeled statement with its inferred interface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedQuery {
    pub name: String,
    /// Result columns in order, with their inferred types
    pub result_columns: Vec<(String, IntermediateType)>,
    /// Bind parameters by 1-based index, unified across usage sites
    pub parameters: Vec<(u32, IntermediateType)>,
}

/// Everything analysis learned about one file
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub name: String,
    pub named_queries: Vec<NamedQuery>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileAnalysis {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The result of analyzing a whole project
#[derive(Debug)]
pub struct ProjectAnalysis {
    pub files: Vec<FileAnalysis>,
    /// Schema after folding every file in order
    pub schema: Schema,
}

impl ProjectAnalysis {
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(FileAnalysis::is_clean)
    }

    /// Queries ready for code generation. Withheld entirely while any file
    /// carries a diagnostic: generating from a half-broken project would
    /// silently drop interfaces.
    pub fn generated_queries(&self) -> Option<Vec<&NamedQuery>> {
        if !self.is_clean() {
            return None;
        }
        Some(
            self.files
                .iter()
                .flat_map(|f| f.named_queries.iter())
                .collect(),
        )
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|f| f.diagnostics.iter())
    }
}

/// A compilation session for one dialect and module configuration
pub struct Session {
    dialect: Dialect,
    modules: Vec<Module>,
    grammar: Grammar,
    registry: FunctionRegistry,
    shapes: ShapeCache,
}

impl Session {
    pub fn new(dialect: Dialect, modules: &[Module]) -> Self {
        Self {
            dialect,
            modules: modules.to_vec(),
            grammar: Grammar::compose(dialect),
            registry: FunctionRegistry::new(),
            shapes: ShapeCache::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Analyze a single file in isolation
    pub fn analyze_file(&mut self, name: &str, text: &str) -> FileAnalysis {
        let mut analysis = self.analyze(&[SourceFile::new(name, text)]);
        analysis
            .files
            .pop()
            .unwrap_or_else(|| FileAnalysis {
                name: name.to_string(),
                named_queries: Vec::new(),
                diagnostics: Vec::new(),
            })
    }

    /// Analyze a project: migrations and query files, oldest first
    pub fn analyze(&mut self, files: &[SourceFile]) -> ProjectAnalysis {
        // Reparsing invalidates every cached view shape
        self.shapes.bump_generation();

        // Pass 1: parse everything and fold the schema in file order
        let mut builder = SchemaBuilder::new();
        let mut parsed: Vec<(ParseOutcome, Vec<Diagnostic>)> = Vec::with_capacity(files.len());
        for file in files {
            debug!(file = %file.name, "parsing");
            let outcome = parse(&self.grammar, &file.text);
            let mut diagnostics: Vec<Diagnostic> = outcome
                .errors
                .iter()
                .map(|e| Diagnostic::new(e.span, e.message.clone()))
                .collect();
            let folded = builder.errors().len();
            builder.fold_file(&outcome.file);
            diagnostics.extend(
                builder.errors()[folded..]
                    .iter()
                    .map(|e| Diagnostic::new(e.span(), e.to_string())),
            );
            parsed.push((outcome, diagnostics));
        }
        let (schema, _) = builder.finish();

        // Pass 2: validate every file's statements against the final schema
        let validator = Validator::new(&schema, &self.registry, self.dialect, &self.modules);
        let mut analyses = Vec::with_capacity(files.len());
        for (file, (outcome, mut diagnostics)) in files.iter().zip(parsed) {
            let validation = validator.validate_file(&outcome.file, &mut self.shapes);
            diagnostics.extend(validation.diagnostics);
            let named_queries = validation
                .analyses
                .into_iter()
                .filter_map(|(label, analysis)| {
                    let name = label?;
                    Some(NamedQuery {
                        name,
                        result_columns: analysis
                            .result_columns
                            .into_iter()
                            .map(|c| (c.name, c.ty))
                            .collect(),
                        parameters: analysis.parameters,
                    })
                })
                .collect();
            debug!(file = %file.name, diagnostics = diagnostics.len(), "analyzed");
            analyses.push(FileAnalysis {
                name: file.name.clone(),
                named_queries,
                diagnostics,
            });
        }

        ProjectAnalysis {
            files: analyses,
            schema,
        }
    }
}
