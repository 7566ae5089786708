// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Token model shared by the lexer and parser

use sqlgen_ir::Span;

/// Bind-parameter placeholder syntaxes
///
/// Which styles are legal is decided by the composed grammar, not the lexer:
/// the lexer recognizes every style and the parser rejects styles the active
/// dialect does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaceholderStyle {
    /// `?`
    Question,
    /// `?1`, `?2`, ...
    QuestionNumbered,
    /// `:name`
    ColonNamed,
    /// `$1`, `$2`, ...
    DollarNumbered,
    /// `@name`
    AtNamed,
}

/// Token kinds produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword; the parser decides which via the grammar's
    /// keyword set
    Word(String),
    /// Quoted identifier (`"x"`, `` `x` ``, `[x]`), unquoted payload
    QuotedIdent(String),
    /// Integer literal
    Integer(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal, payload without quotes
    String(String),
    /// Hex blob literal `x'...'`, payload without quotes
    Blob(String),
    /// A bind-parameter placeholder
    Placeholder {
        style: PlaceholderStyle,
        index: Option<u32>,
        name: Option<String>,
    },

    Comma,
    Dot,
    Semicolon,
    /// A label colon (`name:`); `:name` placeholders lex as [`TokenKind::Placeholder`]
    Colon,
    LParen,
    RParen,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `||`
    Concat,
    /// `->`
    Arrow,
    /// `->>`
    LongArrow,
    Tilde,

    Eof,
}

impl TokenKind {
    /// The operator sigil used to look this token up in the grammar's
    /// operator table; word operators (AND, OR, ...) resolve via their
    /// uppercased text.
    pub fn sigil(&self) -> Option<&str> {
        match self {
            TokenKind::Plus => Some("+"),
            TokenKind::Minus => Some("-"),
            TokenKind::Star => Some("*"),
            TokenKind::Slash => Some("/"),
            TokenKind::Percent => Some("%"),
            TokenKind::Eq => Some("="),
            TokenKind::NotEq => Some("<>"),
            TokenKind::Lt => Some("<"),
            TokenKind::LtEq => Some("<="),
            TokenKind::Gt => Some(">"),
            TokenKind::GtEq => Some(">="),
            TokenKind::Concat => Some("||"),
            TokenKind::Arrow => Some("->"),
            TokenKind::LongArrow => Some("->>"),
            _ => None,
        }
    }
}

/// A lexed token with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Uppercased text of a word token, for keyword comparison
    pub fn word_upper(&self) -> Option<String> {
        match &self.kind {
            TokenKind::Word(w) => Some(w.to_ascii_uppercase()),
            _ => None,
        }
    }
}
