// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Function Registry
//!
//! Centralized signatures for builtin SQL functions across dialects.
//!
//! Each dialect layer contributes its own table; lookup walks the dialect's
//! parent chain so descendants inherit everything they do not override.
//! Optional modules (currently JSON) contribute tables layered independently
//! of dialect ancestry.
//!
//! A signature does not carry a concrete return type: it carries a
//! [`ReturnRule`] evaluated against the argument types at a call site, which
//! is what lets `MAX(price)` follow its column type while `COUNT(*)` stays a
//! non-null INTEGER.

pub mod builtin;
pub mod registry;
pub mod signature;

pub use registry::FunctionRegistry;
pub use signature::{FunctionKind, FunctionSignature, ReturnRule};
