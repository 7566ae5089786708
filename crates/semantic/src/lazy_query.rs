// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lazy result shapes
//!
//! The result shape of a view (or any named query element) is not computed
//! when its definition is folded; it is computed on first reference against
//! whatever schema exists at that point, then cached.
//!
//! The cache is keyed by element name and an analysis generation: the driver
//! bumps the generation whenever a file is reparsed, which invalidates every
//! cached shape without touching entries individually. An explicit
//! in-progress stack detects reference cycles during expansion.

use crate::error::SemanticError;
use serde::{Deserialize, Serialize};
use sqlgen_ir::IntermediateType;
use std::collections::HashMap;

/// One column of a computed result shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryColumn {
    pub name: String,
    pub ty: IntermediateType,
}

impl QueryColumn {
    pub fn new(name: impl Into<String>, ty: IntermediateType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Cache of computed result shapes, keyed by `(element, generation)`
#[derive(Debug, Default)]
pub struct ShapeCache {
    generation: u64,
    entries: HashMap<(String, u64), Vec<QueryColumn>>,
    in_progress: Vec<String>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate every cached shape; called by the driver on reparse
    pub fn bump_generation(&mut self) {
        self.generation += 1;
        // Stale generations can never be read again
        let generation = self.generation;
        self.entries.retain(|(_, g), _| *g == generation);
    }

    pub fn get(&self, element: &str) -> Option<&Vec<QueryColumn>> {
        self.entries.get(&(element.to_string(), self.generation))
    }

    pub fn insert(&mut self, element: &str, shape: Vec<QueryColumn>) {
        self.entries
            .insert((element.to_string(), self.generation), shape);
    }

    /// Mark `element` as being expanded. Re-entering an element already on
    /// the stack is a cycle; the error carries the cycle members in
    /// traversal order.
    pub fn enter(&mut self, element: &str) -> Result<(), SemanticError> {
        if let Some(pos) = self
            .in_progress
            .iter()
            .position(|e| e.eq_ignore_ascii_case(element))
        {
            let mut members: Vec<String> = self.in_progress[pos..].to_vec();
            members.push(element.to_string());
            return Err(SemanticError::CircularReference(members));
        }
        self.in_progress.push(element.to_string());
        Ok(())
    }

    pub fn leave(&mut self, element: &str) {
        if let Some(pos) = self
            .in_progress
            .iter()
            .rposition(|e| e.eq_ignore_ascii_case(element))
        {
            self.in_progress.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_invalidates_entries() {
        let mut cache = ShapeCache::new();
        cache.insert(
            "v",
            vec![QueryColumn::new("a", IntermediateType::integer())],
        );
        assert!(cache.get("v").is_some());
        cache.bump_generation();
        assert!(cache.get("v").is_none());
    }

    #[test]
    fn test_cycle_detection_reports_members() {
        let mut cache = ShapeCache::new();
        cache.enter("a").unwrap();
        cache.enter("b").unwrap();
        let err = cache.enter("a").unwrap_err();
        assert_eq!(
            err,
            SemanticError::CircularReference(vec!["a".into(), "b".into(), "a".into()])
        );
        // leaving unwinds so a later expansion is clean
        cache.leave("b");
        cache.leave("a");
        assert!(cache.enter("a").is_ok());
    }
}
