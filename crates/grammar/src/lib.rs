// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Grammar
//!
//! Dialect-composed SQL grammars and the parser that runs under them.
//!
//! A [`Grammar`] is a value, composed once per dialect by folding the
//! dialect's parent chain from the ANSI base outward: each layer adds or
//! replaces keywords, operators, placeholder styles and named grammar rules.
//! Two grammars for different dialects coexist without interference, and
//! [`parse`] borrows a grammar rather than consulting any global state.
//!
//! ```
//! use sqlgen_grammar::{parse, Grammar};
//! use sqlgen_ir::{Dialect, SqliteVersion};
//!
//! let grammar = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_38));
//! let outcome = parse(&grammar, "SELECT doc -> '$.name' FROM docs;");
//! assert!(outcome.errors.is_empty());
//! ```

mod compose;
mod error;
mod lexer;
mod parser;
mod token;

pub use compose::{Grammar, GrammarBuilder, OperatorDef, RuleDef, RuleId};
pub use error::{GrammarResult, ParseError};
pub use lexer::tokenize;
pub use parser::{parse, ParseOutcome};
pub use token::{PlaceholderStyle, Token, TokenKind};
