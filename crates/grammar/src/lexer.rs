// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Lexer
//!
//! Hand-written tokenizer for SQL source text. The lexer is dialect-agnostic:
//! it recognizes the union of all token shapes (every placeholder style, the
//! JSON path operators, every quoting convention) and leaves legality checks
//! to the parser, which consults the composed grammar.
//!
//! Line and column tracking is 1-based; `--` line comments and `/* */` block
//! comments are skipped.

use crate::error::ParseError;
use crate::token::{PlaceholderStyle, Token, TokenKind};
use sqlgen_ir::Span;

/// Tokenize `source` into a token stream terminated by [`TokenKind::Eof`]
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    source: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            source,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let _ = self.source;
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let span = self.span();
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, span));
                return Ok(tokens);
            };
            let kind = match c {
                c if c.is_ascii_alphabetic() || c == '_' => self.word(),
                c if c.is_ascii_digit() => self.number(span)?,
                '\'' => self.string(span)?,
                '"' => self.quoted_ident('"', '"', span)?,
                '`' => self.quoted_ident('`', '`', span)?,
                '[' => self.quoted_ident('[', ']', span)?,
                '?' => self.question(),
                ':' => self.colon(),
                '$' => self.dollar(span)?,
                '@' => self.at(span)?,
                ',' => self.punct(TokenKind::Comma),
                '.' => self.punct(TokenKind::Dot),
                ';' => self.punct(TokenKind::Semicolon),
                '(' => self.punct(TokenKind::LParen),
                ')' => self.punct(TokenKind::RParen),
                '+' => self.punct(TokenKind::Plus),
                '*' => self.punct(TokenKind::Star),
                '/' => self.punct(TokenKind::Slash),
                '%' => self.punct(TokenKind::Percent),
                '~' => self.punct(TokenKind::Tilde),
                '-' => self.minus(),
                '=' => {
                    self.advance();
                    // Accept both `=` and `==`
                    if self.peek() == Some('=') {
                        self.advance();
                    }
                    TokenKind::Eq
                }
                '<' => {
                    self.advance();
                    match self.peek() {
                        Some('=') => {
                            self.advance();
                            TokenKind::LtEq
                        }
                        Some('>') => {
                            self.advance();
                            TokenKind::NotEq
                        }
                        _ => TokenKind::Lt,
                    }
                }
                '>' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::GtEq
                    } else {
                        TokenKind::Gt
                    }
                }
                '!' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::NotEq
                    } else {
                        return Err(ParseError::new("unexpected character '!'", span));
                    }
                }
                '|' => {
                    self.advance();
                    if self.peek() == Some('|') {
                        self.advance();
                        TokenKind::Concat
                    } else {
                        return Err(ParseError::new("unexpected character '|'", span));
                    }
                }
                other => {
                    return Err(ParseError::new(
                        format!("unexpected character '{other}'"),
                        span,
                    ));
                }
            };
            tokens.push(Token::new(kind, span));
        }
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_at(1) == Some('-') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.span();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                            None => {
                                return Err(ParseError::new("unterminated block comment", start));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        // Blob literal: x'...'
        if (text == "x" || text == "X") && self.peek() == Some('\'') {
            self.advance();
            let mut payload = String::new();
            while let Some(c) = self.peek() {
                if c == '\'' {
                    self.advance();
                    return TokenKind::Blob(payload);
                }
                payload.push(c);
                self.advance();
            }
        }
        TokenKind::Word(text)
    }

    fn number(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        let mut text = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' && !is_float && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                is_float = true;
                text.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E') && !text.is_empty() && !is_float {
                // Exponent form makes it a float
                let next = self.peek_at(1);
                let digit_after_sign = matches!(next, Some('+') | Some('-'))
                    && self.peek_at(2).is_some_and(|d| d.is_ascii_digit());
                if next.is_some_and(|d| d.is_ascii_digit()) || digit_after_sign {
                    is_float = true;
                    text.push(c);
                    self.advance();
                    if let Some(sign @ ('+' | '-')) = self.peek() {
                        text.push(sign);
                        self.advance();
                    }
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| ParseError::new(format!("invalid numeric literal '{text}'"), span))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| ParseError::new(format!("invalid numeric literal '{text}'"), span))
        }
    }

    fn string(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        self.advance();
        let mut payload = String::new();
        loop {
            match self.peek() {
                Some('\'') if self.peek_at(1) == Some('\'') => {
                    // Escaped quote
                    payload.push('\'');
                    self.advance();
                    self.advance();
                }
                Some('\'') => {
                    self.advance();
                    return Ok(TokenKind::String(payload));
                }
                Some(c) => {
                    payload.push(c);
                    self.advance();
                }
                None => return Err(ParseError::new("unterminated string literal", span)),
            }
        }
    }

    fn quoted_ident(&mut self, open: char, close: char, span: Span) -> Result<TokenKind, ParseError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.advance();
        let mut payload = String::new();
        loop {
            match self.peek() {
                Some(c) if c == close => {
                    self.advance();
                    return Ok(TokenKind::QuotedIdent(payload));
                }
                Some(c) => {
                    payload.push(c);
                    self.advance();
                }
                None => return Err(ParseError::new("unterminated quoted identifier", span)),
            }
        }
    }

    fn question(&mut self) -> TokenKind {
        self.advance();
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            TokenKind::Placeholder {
                style: PlaceholderStyle::Question,
                index: None,
                name: None,
            }
        } else {
            TokenKind::Placeholder {
                style: PlaceholderStyle::QuestionNumbered,
                index: digits.parse().ok(),
                name: None,
            }
        }
    }

    fn colon(&mut self) -> TokenKind {
        self.advance();
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            let mut name = String::new();
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            TokenKind::Placeholder {
                style: PlaceholderStyle::ColonNamed,
                index: None,
                name: Some(name),
            }
        } else {
            TokenKind::Colon
        }
    }

    fn dollar(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        self.advance();
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(ParseError::new("expected digits after '$'", span));
        }
        Ok(TokenKind::Placeholder {
            style: PlaceholderStyle::DollarNumbered,
            index: digits.parse().ok(),
            name: None,
        })
    }

    fn at(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        self.advance();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(ParseError::new("expected name after '@'", span));
        }
        Ok(TokenKind::Placeholder {
            style: PlaceholderStyle::AtNamed,
            index: None,
            name: Some(name),
        })
    }

    fn minus(&mut self) -> TokenKind {
        self.advance();
        if self.peek() == Some('>') {
            self.advance();
            if self.peek() == Some('>') {
                self.advance();
                TokenKind::LongArrow
            } else {
                TokenKind::Arrow
            }
        } else {
            TokenKind::Minus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_select() {
        let toks = kinds("SELECT a FROM t;");
        assert_eq!(
            toks,
            vec![
                TokenKind::Word("SELECT".into()),
                TokenKind::Word("a".into()),
                TokenKind::Word("FROM".into()),
                TokenKind::Word("t".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_placeholders() {
        let toks = kinds("? ?2 :name $3 @val");
        assert_eq!(
            toks[0],
            TokenKind::Placeholder {
                style: PlaceholderStyle::Question,
                index: None,
                name: None
            }
        );
        assert_eq!(
            toks[1],
            TokenKind::Placeholder {
                style: PlaceholderStyle::QuestionNumbered,
                index: Some(2),
                name: None
            }
        );
        assert_eq!(
            toks[2],
            TokenKind::Placeholder {
                style: PlaceholderStyle::ColonNamed,
                index: None,
                name: Some("name".into())
            }
        );
        assert_eq!(
            toks[3],
            TokenKind::Placeholder {
                style: PlaceholderStyle::DollarNumbered,
                index: Some(3),
                name: None
            }
        );
        assert_eq!(
            toks[4],
            TokenKind::Placeholder {
                style: PlaceholderStyle::AtNamed,
                index: None,
                name: Some("val".into())
            }
        );
    }

    #[test]
    fn test_label_colon_vs_named_placeholder() {
        // `name:` is a label colon; `:name` is a placeholder
        let toks = kinds("selectAll:\nSELECT 1");
        assert_eq!(toks[0], TokenKind::Word("selectAll".into()));
        assert_eq!(toks[1], TokenKind::Colon);
    }

    #[test]
    fn test_json_operators() {
        let toks = kinds("doc -> '$.a' ->> '$.b'");
        assert!(toks.contains(&TokenKind::Arrow));
        assert!(toks.contains(&TokenKind::LongArrow));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42")[0], TokenKind::Integer(42));
        assert_eq!(kinds("3.25")[0], TokenKind::Float(3.25));
        assert_eq!(kinds("1e3")[0], TokenKind::Float(1000.0));
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(kinds("'it''s'")[0], TokenKind::String("it's".into()));
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(kinds("\"a b\"")[0], TokenKind::QuotedIdent("a b".into()));
        assert_eq!(kinds("`col`")[0], TokenKind::QuotedIdent("col".into()));
        assert_eq!(kinds("[col]")[0], TokenKind::QuotedIdent("col".into()));
    }

    #[test]
    fn test_comments_skipped() {
        let toks = kinds("SELECT -- trailing\n/* block */ 1");
        assert_eq!(toks.len(), 3);
    }

    #[test]
    fn test_blob_literal() {
        assert_eq!(kinds("x'53514C'")[0], TokenKind::Blob("53514C".into()));
    }

    #[test]
    fn test_line_column_tracking() {
        let toks = tokenize("SELECT\n  a").unwrap();
        assert_eq!(toks[1].span, Span::new(2, 3));
    }

    #[test]
    fn test_unterminated_string_errors() {
        assert!(tokenize("'oops").is_err());
    }
}
