// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! HSQL builtin function definitions

use crate::signature::{class_of, fixed, FunctionSignature, ReturnRule};
use sqlgen_ir::{IntermediateType, StorageClass};

pub fn all_functions() -> Vec<FunctionSignature> {
    vec![
        FunctionSignature::new("IFNULL", ReturnRule::EncapsulateNotNull),
        FunctionSignature::new("NVL", ReturnRule::EncapsulateNotNull),
        class_of("CONCAT", StorageClass::Text),
        class_of("CHAR_LENGTH", StorageClass::Integer),
        fixed("CURRENT_TIMESTAMP", IntermediateType::text()),
        // Window functions
        fixed("ROW_NUMBER", IntermediateType::integer()).window(),
        fixed("RANK", IntermediateType::integer()).window(),
        fixed("DENSE_RANK", IntermediateType::integer()).window(),
        FunctionSignature::new("LAG", ReturnRule::PassthroughNullable).window(),
        FunctionSignature::new("LEAD", ReturnRule::PassthroughNullable).window(),
    ]
}
