// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! JSON module function definitions
//!
//! Layered onto a dialect's lookup independent of ancestry. Path extraction
//! is always nullable (a path may not exist in the document); structural
//! constructors are not.

use crate::signature::{boolean_host, fixed, FunctionSignature};
use sqlgen_ir::IntermediateType;

pub fn all_functions() -> Vec<FunctionSignature> {
    vec![
        fixed("JSON_EXTRACT", IntermediateType::text().nullable(true)),
        fixed("JSON_TYPE", IntermediateType::text().nullable(true)),
        fixed("JSON_ARRAY_LENGTH", IntermediateType::integer()),
        fixed("JSON", IntermediateType::text()),
        fixed("JSON_QUOTE", IntermediateType::text()),
        fixed("JSON_ARRAY", IntermediateType::text()),
        fixed("JSON_OBJECT", IntermediateType::text()),
        fixed("JSON_VALID", boolean_host()),
        fixed("JSON_INSERT", IntermediateType::text().nullable(true)),
        fixed("JSON_REPLACE", IntermediateType::text().nullable(true)),
        fixed("JSON_SET", IntermediateType::text().nullable(true)),
        fixed("JSON_REMOVE", IntermediateType::text().nullable(true)),
        fixed("JSON_PATCH", IntermediateType::text().nullable(true)),
        fixed("JSON_GROUP_ARRAY", IntermediateType::text()).aggregate(),
        fixed("JSON_GROUP_OBJECT", IntermediateType::text()).aggregate(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::StorageClass;

    #[test]
    fn test_extraction_is_nullable_but_array_length_is_not() {
        let funcs = all_functions();
        let extract = funcs.iter().find(|f| f.name == "JSON_EXTRACT").unwrap();
        let length = funcs.iter().find(|f| f.name == "JSON_ARRAY_LENGTH").unwrap();
        let doc = IntermediateType::text();
        assert!(extract.rule.apply(std::slice::from_ref(&doc)).nullable);
        let ty = length.rule.apply(std::slice::from_ref(&doc));
        assert_eq!(ty.storage_class, StorageClass::Integer);
        assert!(!ty.nullable);
    }
}
