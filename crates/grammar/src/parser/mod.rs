// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Parser
//!
//! Recursive-descent parser driven by a composed [`Grammar`]. The parser
//! holds the grammar by reference; nothing here is process-global, so
//! parsers for different dialects can run side by side.
//!
//! A parse error aborts only the statement it occurs in: the parser records
//! the error, skips to the next statement terminator and keeps going, so one
//! malformed statement does not hide diagnostics for the rest of the file.

mod ddl;
mod dml;
mod expr;
mod query;

use crate::compose::Grammar;
use crate::error::{GrammarResult, ParseError};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use sqlgen_ir::{LabeledStatement, Span, SqlFile, Statement};

/// Result of parsing one source file
#[derive(Debug)]
pub struct ParseOutcome {
    pub file: SqlFile,
    pub errors: Vec<ParseError>,
}

/// Parse `source` under `grammar`, recovering at statement boundaries
pub fn parse(grammar: &Grammar, source: &str) -> ParseOutcome {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(err) => {
            return ParseOutcome {
                file: SqlFile { statements: vec![] },
                errors: vec![err],
            };
        }
    };
    let mut parser = Parser {
        grammar,
        tokens,
        pos: 0,
    };
    parser.file()
}

pub(crate) struct Parser<'a> {
    grammar: &'a Grammar,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn file(&mut self) -> ParseOutcome {
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        loop {
            while self.at(&TokenKind::Semicolon) {
                self.bump();
            }
            if self.at(&TokenKind::Eof) {
                break;
            }
            let label = self.label();
            match self.statement() {
                Ok(statement) => {
                    statements.push(LabeledStatement { label, statement });
                    if !self.at(&TokenKind::Eof) && !self.at(&TokenKind::Semicolon) {
                        errors.push(self.unexpected("';'"));
                        self.recover();
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "statement failed to parse, recovering");
                    errors.push(err);
                    self.recover();
                }
            }
        }
        ParseOutcome {
            file: SqlFile { statements },
            errors,
        }
    }

    /// `name:` preceding a statement marks it as a named query
    fn label(&mut self) -> Option<String> {
        let name = match &self.peek().kind {
            TokenKind::Word(w) if !self.grammar.is_keyword(w) => w.clone(),
            TokenKind::QuotedIdent(w) => w.clone(),
            _ => return None,
        };
        if self.nth(1).kind == TokenKind::Colon {
            self.bump();
            self.bump();
            Some(name)
        } else {
            None
        }
    }

    fn statement(&mut self) -> GrammarResult<Statement> {
        match self.peek_word().as_deref() {
            Some("CREATE") => self.create_statement(),
            Some("ALTER") => self.alter_table().map(Statement::AlterTable),
            Some("DROP") => self.drop_statement().map(Statement::Drop),
            Some("SELECT") | Some("WITH") => self.select().map(Statement::Select),
            Some("INSERT") => self.insert().map(Statement::Insert),
            Some("UPDATE") => self.update().map(Statement::Update),
            Some("DELETE") => self.delete().map(Statement::Delete),
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// Skip to the next statement terminator after an error
    fn recover(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::Eof => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    // --- token cursor -----------------------------------------------------

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    pub(crate) fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn grammar(&self) -> &Grammar {
        self.grammar
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> GrammarResult<Token> {
        if self.at(&kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Uppercased text of the current token when it is a word
    pub(crate) fn peek_word(&self) -> Option<String> {
        self.peek().word_upper()
    }

    pub(crate) fn at_word(&self, kw: &str) -> bool {
        self.peek_word().as_deref() == Some(kw)
    }

    pub(crate) fn nth_word(&self, n: usize) -> Option<String> {
        self.nth(n).word_upper()
    }

    pub(crate) fn eat_word(&mut self, kw: &str) -> bool {
        if self.at_word(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_word(&mut self, kw: &str) -> GrammarResult<Span> {
        if self.at_word(kw) {
            Ok(self.bump().span)
        } else {
            Err(self.unexpected(kw))
        }
    }

    /// A plain identifier: a non-keyword word or any quoted identifier
    pub(crate) fn identifier(&mut self) -> GrammarResult<(String, Span)> {
        match &self.peek().kind {
            TokenKind::Word(w) if !self.grammar.is_keyword(w) => {
                let name = w.clone();
                let span = self.bump().span;
                Ok((name, span))
            }
            TokenKind::QuotedIdent(w) => {
                let name = w.clone();
                let span = self.bump().span;
                Ok((name, span))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// An identifier where keywords are acceptable (e.g. after a dot)
    pub(crate) fn identifier_any(&mut self) -> GrammarResult<(String, Span)> {
        match &self.peek().kind {
            TokenKind::Word(w) => {
                let name = w.clone();
                let span = self.bump().span;
                Ok((name, span))
            }
            TokenKind::QuotedIdent(w) => {
                let name = w.clone();
                let span = self.bump().span;
                Ok((name, span))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// An optional trailing alias: `[AS] name`
    pub(crate) fn alias(&mut self) -> GrammarResult<Option<String>> {
        if self.eat_word("AS") {
            let (name, _) = self.identifier()?;
            return Ok(Some(name));
        }
        match &self.peek().kind {
            TokenKind::Word(w) if !self.grammar.is_keyword(w) => {
                let name = w.clone();
                self.bump();
                Ok(Some(name))
            }
            TokenKind::QuotedIdent(w) => {
                let name = w.clone();
                self.bump();
                Ok(Some(name))
            }
            _ => Ok(None),
        }
    }

    /// Parenthesized comma-separated identifier list
    pub(crate) fn column_name_list(&mut self) -> GrammarResult<Vec<String>> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut names = Vec::new();
        loop {
            let (name, _) = self.identifier()?;
            names.push(name);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(names)
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let found = match &self.peek().kind {
            TokenKind::Word(w) => format!("'{w}'"),
            TokenKind::QuotedIdent(w) => format!("'{w}'"),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("{other:?}"),
        };
        ParseError::new(format!("expected {expected}, found {found}"), self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::{Dialect, SqliteVersion};

    fn sqlite() -> Grammar {
        Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_38))
    }

    #[test]
    fn test_parse_empty_file() {
        let outcome = parse(&sqlite(), "  -- just a comment\n");
        assert!(outcome.file.statements.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_label_attaches_to_statement() {
        let outcome = parse(&sqlite(), "selectAll:\nSELECT 1;");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.file.statements.len(), 1);
        assert_eq!(
            outcome.file.statements[0].label.as_deref(),
            Some("selectAll")
        );
    }

    #[test]
    fn test_error_recovery_continues_with_next_statement() {
        let outcome = parse(&sqlite(), "SELECT FROM WHERE;\nSELECT 1;");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.file.statements.len(), 1);
    }

    #[test]
    fn test_multiple_statements() {
        let outcome = parse(
            &sqlite(),
            "CREATE TABLE t(a INTEGER NOT NULL);\nSELECT a FROM t;",
        );
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(outcome.file.statements.len(), 2);
    }
}
