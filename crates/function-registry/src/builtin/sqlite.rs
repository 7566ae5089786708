// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQLite builtin function definitions
//!
//! Split by the version layer that introduces them: the core table is keyed
//! under 3.18, window functions under 3.25.

use crate::signature::{boolean_host, class_of, fixed, FunctionSignature, ReturnRule};
use sqlgen_ir::{IntermediateType, StorageClass};

/// Core SQLite functions, available from 3.18
pub fn base_functions() -> Vec<FunctionSignature> {
    vec![
        FunctionSignature::new("IFNULL", ReturnRule::EncapsulateNotNull),
        FunctionSignature::new("MAX", ReturnRule::PassthroughNullable).aggregate(),
        FunctionSignature::new("MIN", ReturnRule::PassthroughNullable).aggregate(),
        fixed("TOTAL", IntermediateType::real()).aggregate(),
        fixed("GROUP_CONCAT", IntermediateType::text().nullable(true)).aggregate(),
        class_of("INSTR", StorageClass::Integer),
        class_of("HEX", StorageClass::Text),
        class_of("QUOTE", StorageClass::Text),
        class_of("UNICODE", StorageClass::Integer),
        class_of("CHAR", StorageClass::Text),
        class_of("GLOB", StorageClass::Integer),
        fixed("PRINTF", IntermediateType::text()),
        fixed("RANDOM", IntermediateType::integer()),
        fixed("RANDOMBLOB", IntermediateType::blob()),
        fixed("ZEROBLOB", IntermediateType::blob()),
        fixed("CHANGES", IntermediateType::integer()),
        fixed("TOTAL_CHANGES", IntermediateType::integer()),
        fixed("LAST_INSERT_ROWID", IntermediateType::integer()),
        fixed("TYPEOF", IntermediateType::text()),
        fixed("LIKELY", boolean_host()),
        fixed("UNLIKELY", boolean_host()),
        FunctionSignature::new("LIKELIHOOD", ReturnRule::Passthrough),
        // Date and time functions return NULL on malformed input
        fixed("DATE", IntermediateType::text().nullable(true)),
        fixed("TIME", IntermediateType::text().nullable(true)),
        fixed("DATETIME", IntermediateType::text().nullable(true)),
        fixed("JULIANDAY", IntermediateType::real().nullable(true)),
        fixed("STRFTIME", IntermediateType::text().nullable(true)),
    ]
}

/// Window functions, available from 3.25
pub fn window_functions() -> Vec<FunctionSignature> {
    vec![
        fixed("ROW_NUMBER", IntermediateType::integer()).window(),
        fixed("RANK", IntermediateType::integer()).window(),
        fixed("DENSE_RANK", IntermediateType::integer()).window(),
        fixed("NTILE", IntermediateType::integer()).window(),
        fixed("PERCENT_RANK", IntermediateType::real()).window(),
        fixed("CUME_DIST", IntermediateType::real()).window(),
        FunctionSignature::new("LAG", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("LEAD", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("FIRST_VALUE", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("LAST_VALUE", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("NTH_VALUE", ReturnRule::PassthroughNullable).window(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::HostType;

    #[test]
    fn test_group_concat_is_nullable_text() {
        let sig = base_functions()
            .into_iter()
            .find(|f| f.name == "GROUP_CONCAT")
            .unwrap();
        let ty = sig.rule.apply(&[IntermediateType::text()]);
        assert_eq!(ty.storage_class, StorageClass::Text);
        assert!(ty.nullable);
    }

    #[test]
    fn test_likely_carries_boolean_host_type() {
        let sig = base_functions()
            .into_iter()
            .find(|f| f.name == "LIKELY")
            .unwrap();
        let ty = sig.rule.apply(&[]);
        assert_eq!(ty.host_type, Some(HostType::Boolean));
    }
}
