// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builtin function tables, one module per dialect layer

pub mod ansi;
pub mod hsql;
pub mod json;
pub mod mysql;
pub mod postgresql;
pub mod sqlite;
