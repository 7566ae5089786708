// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! PostgreSQL builtin function definitions

use crate::signature::{class_of, fixed, FunctionSignature, ReturnRule};
use sqlgen_ir::{IntermediateType, StorageClass};

pub fn all_functions() -> Vec<FunctionSignature> {
    vec![
        class_of("CONCAT", StorageClass::Text),
        class_of("CHAR_LENGTH", StorageClass::Integer),
        class_of("POSITION", StorageClass::Integer),
        class_of("TO_CHAR", StorageClass::Text),
        class_of("SPLIT_PART", StorageClass::Text),
        fixed("NOW", IntermediateType::text()),
        fixed("STRING_AGG", IntermediateType::text().nullable(true)).aggregate(),
        fixed("BOOL_AND", IntermediateType::boolean().nullable(true)).aggregate(),
        fixed("BOOL_OR", IntermediateType::boolean().nullable(true)).aggregate(),
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
