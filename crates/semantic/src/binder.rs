// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Bind parameter collection and unification
//!
//! Every placeholder usage site records the type its context back-inferred.
//! At the end of a statement the sites are unified per parameter index:
//! anonymous `?` each occupy the next free index, `?N`/`$N` pin an index,
//! and named parameters share the index of their first occurrence.
//!
//! Unification requires agreeing storage classes (sites that stayed at the
//! transient ARGUMENT placeholder do not vote); nullability is the OR over
//! all sites. A storage-class conflict is a diagnostic, not a panic.

use crate::error::{Diagnostic, DiagnosticSink};
use sqlgen_ir::{BindParameter, BindParameterKind, IntermediateType, Span, StorageClass};

/// One recorded placeholder usage
#[derive(Debug, Clone, PartialEq)]
pub struct BindSite {
    pub kind: BindParameterKind,
    pub span: Span,
    pub ty: IntermediateType,
    /// 1-based parameter index
    pub index: u32,
}

/// Collects placeholder sites over one statement
#[derive(Debug, Clone, Default)]
pub struct Binder {
    sites: Vec<BindSite>,
    highest: u32,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placeholder with the type its context inferred
    pub fn record(&mut self, bind: &BindParameter, ty: IntermediateType) {
        let index = match &bind.kind {
            BindParameterKind::Anonymous => {
                self.highest += 1;
                self.highest
            }
            BindParameterKind::Numbered(n) => {
                self.highest = self.highest.max(*n);
                *n
            }
            BindParameterKind::Named(name) => match self
                .sites
                .iter()
                .find(|s| matches!(&s.kind, BindParameterKind::Named(n) if n == name))
            {
                Some(site) => site.index,
                None => {
                    self.highest += 1;
                    self.highest
                }
            },
        };
        self.sites.push(BindSite {
            kind: bind.kind.clone(),
            span: bind.span,
            ty,
            index,
        });
    }

    pub fn sites(&self) -> &[BindSite] {
        &self.sites
    }

    /// Unify all sites into one type per index, reporting conflicts
    pub fn finish(self, sink: &mut dyn DiagnosticSink) -> Vec<(u32, IntermediateType)> {
        let mut indices: Vec<u32> = self.sites.iter().map(|s| s.index).collect();
        indices.sort_unstable();
        indices.dedup();

        let mut parameters = Vec::with_capacity(indices.len());
        for index in indices {
            let group: Vec<&BindSite> = self.sites.iter().filter(|s| s.index == index).collect();
            parameters.push((index, unify(&group, sink)));
        }
        parameters
    }
}

fn is_concrete(class: StorageClass) -> bool {
    matches!(
        class,
        StorageClass::Integer | StorageClass::Real | StorageClass::Text | StorageClass::Blob
    )
}

fn unify(group: &[&BindSite], sink: &mut dyn DiagnosticSink) -> IntermediateType {
    let mut resolved: Option<IntermediateType> = None;
    let mut nullable = false;
    for site in group {
        nullable |= site.ty.nullable;
        if !is_concrete(site.ty.storage_class) {
            continue;
        }
        match &resolved {
            None => resolved = Some(site.ty.clone()),
            Some(current) if current.storage_class == site.ty.storage_class => {}
            Some(current) => {
                sink.report(Diagnostic::new(
                    site.span,
                    format!(
                        "parameter used with conflicting types ({} vs {})",
                        current.storage_class, site.ty.storage_class
                    ),
                ));
            }
        }
    }
    match resolved {
        Some(ty) => ty.nullable(nullable),
        // No usage site constrained the parameter; default to nullable TEXT
        None => IntermediateType::text().nullable(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(kind: BindParameterKind, line: u32) -> BindParameter {
        BindParameter {
            kind,
            span: Span::new(line, 1),
        }
    }

    #[test]
    fn test_anonymous_parameters_take_sequential_indices() {
        let mut binder = Binder::new();
        binder.record(&bind(BindParameterKind::Anonymous, 1), IntermediateType::integer());
        binder.record(&bind(BindParameterKind::Anonymous, 2), IntermediateType::text());
        let mut sink = Vec::new();
        let params = binder.finish(&mut sink);
        assert!(sink.is_empty());
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].0, 1);
        assert_eq!(params[1].0, 2);
    }

    #[test]
    fn test_numbered_parameters_unify_across_sites() {
        let mut binder = Binder::new();
        binder.record(
            &bind(BindParameterKind::Numbered(1), 1),
            IntermediateType::integer(),
        );
        binder.record(
            &bind(BindParameterKind::Numbered(1), 2),
            IntermediateType::integer().nullable(true),
        );
        let mut sink = Vec::new();
        let params = binder.finish(&mut sink);
        assert!(sink.is_empty());
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].1.storage_class, StorageClass::Integer);
        assert!(params[0].1.nullable);
    }

    #[test]
    fn test_conflicting_storage_classes_are_a_diagnostic() {
        let mut binder = Binder::new();
        binder.record(
            &bind(BindParameterKind::Numbered(1), 1),
            IntermediateType::integer(),
        );
        binder.record(
            &bind(BindParameterKind::Numbered(1), 2),
            IntermediateType::text(),
        );
        let mut sink = Vec::new();
        binder.finish(&mut sink);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].message.contains("conflicting types"));
    }

    #[test]
    fn test_named_parameters_share_one_index() {
        let mut binder = Binder::new();
        binder.record(
            &bind(BindParameterKind::Named("uid".into()), 1),
            IntermediateType::integer(),
        );
        binder.record(&bind(BindParameterKind::Anonymous, 2), IntermediateType::text());
        binder.record(
            &bind(BindParameterKind::Named("uid".into()), 3),
            IntermediateType::integer(),
        );
        let mut sink = Vec::new();
        let params = binder.finish(&mut sink);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_unconstrained_parameter_defaults_to_nullable_text() {
        let mut binder = Binder::new();
        binder.record(
            &bind(BindParameterKind::Anonymous, 1),
            IntermediateType::argument(),
        );
        let mut sink = Vec::new();
        let params = binder.finish(&mut sink);
        assert_eq!(params[0].1.storage_class, StorageClass::Text);
        assert!(params[0].1.nullable);
    }
}
