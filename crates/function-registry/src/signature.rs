// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Function signatures and return-type rules

use sqlgen_ir::{HostType, IntermediateType, StorageClass};

/// How a function's return type derives from its call site
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnRule {
    /// The exact type, regardless of arguments (e.g. `COUNT` → non-null
    /// INTEGER)
    Fixed(IntermediateType),

    /// A fixed storage class; nullable when any argument is nullable
    /// (e.g. `LENGTH`, `UPPER`)
    FixedClass(StorageClass),

    /// The first argument's type, class and nullability both
    /// (e.g. `ABS`, `LIKELIHOOD`)
    Passthrough,

    /// The first argument's storage class, always nullable (aggregates over
    /// a possibly-empty set: `MIN`, `MAX`, `SUM`; also `NULLIF`)
    PassthroughNullable,

    /// The widest argument class; nullable when any argument is nullable
    /// (e.g. MySQL `IF`)
    Encapsulate,

    /// The widest argument class; non-null unless every argument is nullable
    /// (`COALESCE`, `IFNULL`)
    EncapsulateNotNull,
}

impl ReturnRule {
    /// Evaluate this rule against the resolved argument types
    pub fn apply(&self, args: &[IntermediateType]) -> IntermediateType {
        let any_nullable = args.iter().any(|a| a.nullable || a.unresolved);
        let all_nullable = !args.is_empty() && args.iter().all(|a| a.nullable || a.unresolved);
        match self {
            ReturnRule::Fixed(ty) => ty.clone(),
            ReturnRule::FixedClass(class) => {
                IntermediateType::new(*class).nullable(any_nullable)
            }
            ReturnRule::Passthrough => match args.first() {
                Some(arg) => arg.clone(),
                None => IntermediateType::null(),
            },
            ReturnRule::PassthroughNullable => match args.first() {
                Some(arg) => {
                    let mut ty = IntermediateType::new(arg.storage_class).nullable(true);
                    ty.host_type = arg.host_type;
                    ty
                }
                None => IntermediateType::null(),
            },
            ReturnRule::Encapsulate => IntermediateType::encapsulating(args),
            ReturnRule::EncapsulateNotNull => {
                let widest = IntermediateType::encapsulating(args);
                IntermediateType::new(widest.storage_class).nullable(all_nullable)
            }
        }
    }
}

/// Invocation category of a builtin function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
    Window,
}

/// One builtin function signature
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// Uppercase function name
    pub name: &'static str,
    pub rule: ReturnRule,
    pub kind: FunctionKind,
}

impl FunctionSignature {
    pub fn new(name: &'static str, rule: ReturnRule) -> Self {
        Self {
            name,
            rule,
            kind: FunctionKind::Scalar,
        }
    }

    pub fn aggregate(mut self) -> Self {
        self.kind = FunctionKind::Aggregate;
        self
    }

    pub fn window(mut self) -> Self {
        self.kind = FunctionKind::Window;
        self
    }
}

/// Shorthand constructors used by the builtin tables
pub(crate) fn fixed(name: &'static str, ty: IntermediateType) -> FunctionSignature {
    FunctionSignature::new(name, ReturnRule::Fixed(ty))
}

pub(crate) fn class_of(name: &'static str, class: StorageClass) -> FunctionSignature {
    FunctionSignature::new(name, ReturnRule::FixedClass(class))
}

pub(crate) fn boolean_host() -> IntermediateType {
    IntermediateType::integer().host(HostType::Boolean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ignores_arguments() {
        let rule = ReturnRule::Fixed(IntermediateType::integer());
        let ty = rule.apply(&[IntermediateType::text().nullable(true)]);
        assert_eq!(ty, IntermediateType::integer());
    }

    #[test]
    fn test_fixed_class_propagates_nullability() {
        let rule = ReturnRule::FixedClass(StorageClass::Integer);
        assert!(!rule.apply(&[IntermediateType::text()]).nullable);
        assert!(rule.apply(&[IntermediateType::text().nullable(true)]).nullable);
    }

    #[test]
    fn test_passthrough_nullable_forces_null() {
        let rule = ReturnRule::PassthroughNullable;
        let ty = rule.apply(&[IntermediateType::real()]);
        assert_eq!(ty.storage_class, StorageClass::Real);
        assert!(ty.nullable);
    }

    #[test]
    fn test_encapsulate_not_null_recovers_when_one_branch_non_null() {
        let rule = ReturnRule::EncapsulateNotNull;
        let ty = rule.apply(&[
            IntermediateType::text().nullable(true),
            IntermediateType::text(),
        ]);
        assert!(!ty.nullable);

        let ty = rule.apply(&[
            IntermediateType::text().nullable(true),
            IntermediateType::text().nullable(true),
        ]);
        assert!(ty.nullable);
    }

    #[test]
    fn test_encapsulate_widens() {
        let rule = ReturnRule::Encapsulate;
        let ty = rule.apply(&[IntermediateType::integer(), IntermediateType::real()]);
        assert_eq!(ty.storage_class, StorageClass::Real);
    }
}
