// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! ANSI base function definitions, inherited by every dialect

use crate::signature::{class_of, fixed, FunctionSignature, ReturnRule};
use sqlgen_ir::{IntermediateType, StorageClass};

/// Functions every dialect inherits
pub fn all_functions() -> Vec<FunctionSignature> {
    vec![
        // Aggregates
        fixed("COUNT", IntermediateType::integer()).aggregate(),
        FunctionSignature::new("SUM", ReturnRule::PassthroughNullable).aggregate(),
        fixed("AVG", IntermediateType::real().nullable(true)).aggregate(),
        FunctionSignature::new("MIN", ReturnRule::PassthroughNullable).aggregate(),
        FunctionSignature::new("MAX", ReturnRule::PassthroughNullable).aggregate(),
        // Scalars
        FunctionSignature::new("ABS", ReturnRule::Passthrough),
        class_of("ROUND", StorageClass::Real),
        class_of("LENGTH", StorageClass::Integer),
        class_of("UPPER", StorageClass::Text),
        class_of("LOWER", StorageClass::Text),
        class_of("TRIM", StorageClass::Text),
        class_of("LTRIM", StorageClass::Text),
        class_of("RTRIM", StorageClass::Text),
        class_of("SUBSTR", StorageClass::Text),
        class_of("SUBSTRING", StorageClass::Text),
        class_of("REPLACE", StorageClass::Text),
        FunctionSignature::new("COALESCE", ReturnRule::EncapsulateNotNull),
        FunctionSignature::new("NULLIF", ReturnRule::PassthroughNullable),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_names() {
        let funcs = all_functions();
        for (i, f) in funcs.iter().enumerate() {
            assert!(
                !funcs[i + 1..].iter().any(|g| g.name == f.name),
                "duplicate {}",
                f.name
            );
        }
    }
}
