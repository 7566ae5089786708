// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! MySQL builtin function definitions

use crate::signature::{class_of, fixed, FunctionSignature, ReturnRule};
use sqlgen_ir::{IntermediateType, StorageClass};

pub fn all_functions() -> Vec<FunctionSignature> {
    vec![
        FunctionSignature::new("IF", ReturnRule::Encapsulate),
        FunctionSignature::new("IFNULL", ReturnRule::EncapsulateNotNull),
        class_of("CONCAT", StorageClass::Text),
        class_of("CONCAT_WS", StorageClass::Text),
        class_of("CHAR_LENGTH", StorageClass::Integer),
        class_of("LPAD", StorageClass::Text),
        class_of("RPAD", StorageClass::Text),
        class_of("DATE_FORMAT", StorageClass::Text),
        class_of("DATEDIFF", StorageClass::Integer),
        fixed("NOW", IntermediateType::text()),
        fixed("CURDATE", IntermediateType::text()),
        fixed("CURTIME", IntermediateType::text()),
        fixed("UNIX_TIMESTAMP", IntermediateType::integer()),
        fixed("LAST_INSERT_ID", IntermediateType::integer()),
        // ON DUPLICATE KEY UPDATE: VALUES(col) carries col's type
        FunctionSignature::new("VALUES", ReturnRule::Passthrough),
        fixed("GROUP_CONCAT", IntermediateType::text().nullable(true)).aggregate(),
        // Window functions
        fixed("ROW_NUMBER", IntermediateType::integer()).window(),
        fixed("RANK", IntermediateType::integer()).window(),
        fixed("DENSE_RANK", IntermediateType::integer()).window(),
        fixed("NTILE", IntermediateType::integer()).window(),
        FunctionSignature::new("LAG", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("LEAD", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("FIRST_VALUE", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("LAST_VALUE", ReturnRule::PassthroughNullable).window(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_encapsulates_both_branches() {
        let sig = all_functions().into_iter().find(|f| f.name == "IF").unwrap();
        let ty = sig.rule.apply(&[
            IntermediateType::boolean(),
            IntermediateType::integer(),
            IntermediateType::real().nullable(true),
        ]);
        assert_eq!(ty.storage_class, StorageClass::Real);
        assert!(ty.nullable);
    }
}
