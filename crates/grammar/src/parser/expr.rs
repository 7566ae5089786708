// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Expression parsing: Pratt loop over the grammar's composed operator
//! table, plus the fixed special forms (IS/IN/BETWEEN/CASE/CAST/EXISTS).
//!
//! Operators the active dialect did not install (e.g. `->` outside a
//! JSON-capable dialect) are simply absent from the table, so the Pratt loop
//! stops and the stray token surfaces as a parse error in the caller.

use super::Parser;
use crate::compose::RuleId;
use crate::error::GrammarResult;
use crate::token::{PlaceholderStyle, TokenKind};
use sqlgen_ir::{
    BinaryOp, BindParameter, BindParameterKind, CaseBranch, ColumnRef, Expr, FunctionCall,
    Literal, OrderingTerm, UnaryOp, WindowSpec,
};

/// Binding power of the comparison tier, used by the special forms
/// (IS, IN, BETWEEN, NOT LIKE) that sit alongside `=` and `LIKE`.
const CMP_BP: u8 = 3;

impl Parser<'_> {
    pub(crate) fn expr(&mut self) -> GrammarResult<Expr> {
        self.expr_bp(0)
    }

    fn expr_bp(&mut self, min_bp: u8) -> GrammarResult<Expr> {
        let mut lhs = self.prefix()?;
        loop {
            // Special forms at comparison precedence
            if CMP_BP >= min_bp {
                if self.at_word("IS") {
                    lhs = self.is_suffix(lhs)?;
                    continue;
                }
                if self.at_word("IN") {
                    lhs = self.in_suffix(lhs, false)?;
                    continue;
                }
                if self.at_word("BETWEEN") {
                    lhs = self.between_suffix(lhs, false)?;
                    continue;
                }
                if self.at_word("NOT") {
                    match self.nth_word(1).as_deref() {
                        Some("IN") => {
                            self.bump();
                            lhs = self.in_suffix(lhs, true)?;
                            continue;
                        }
                        Some("BETWEEN") => {
                            self.bump();
                            lhs = self.between_suffix(lhs, true)?;
                            continue;
                        }
                        Some("LIKE") => {
                            let span = self.bump().span;
                            self.bump();
                            let rhs = self.expr_bp(CMP_BP + 1)?;
                            lhs = Expr::BinaryOp {
                                left: Box::new(lhs),
                                op: BinaryOp::NotLike,
                                right: Box::new(rhs),
                                span,
                            };
                            continue;
                        }
                        _ => {}
                    }
                }
            }

            // Composed operator table
            let sigil = match &self.peek().kind {
                TokenKind::Word(w) => w.to_ascii_uppercase(),
                other => match other.sigil() {
                    Some(s) => s.to_string(),
                    None => break,
                },
            };
            let Some(def) = self.grammar().operator(&sigil).copied() else {
                break;
            };
            if def.precedence < min_bp {
                break;
            }
            let span = self.bump().span;
            let rhs = self.expr_bp(def.precedence + 1)?;
            lhs = Expr::BinaryOp {
                left: Box::new(lhs),
                op: def.op,
                right: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn prefix(&mut self) -> GrammarResult<Expr> {
        let span = self.span();
        match self.peek().kind.clone() {
            TokenKind::Integer(v) => {
                self.bump();
                Ok(Expr::Literal {
                    value: Literal::Integer(v),
                    span,
                })
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(Expr::Literal {
                    value: Literal::Float(v),
                    span,
                })
            }
            TokenKind::String(v) => {
                self.bump();
                Ok(Expr::Literal {
                    value: Literal::String(v),
                    span,
                })
            }
            TokenKind::Blob(v) => {
                self.bump();
                Ok(Expr::Literal {
                    value: Literal::Blob(v),
                    span,
                })
            }
            TokenKind::Placeholder { style, index, name } => {
                self.bump();
                self.placeholder(style, index, name, span)
            }
            TokenKind::Minus => {
                self.bump();
                let expr = self.expr_bp(9)?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::Plus => {
                self.bump();
                self.expr_bp(9)
            }
            TokenKind::Tilde => {
                self.bump();
                let expr = self.expr_bp(9)?;
                Ok(Expr::UnaryOp {
                    op: UnaryOp::BitNot,
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::LParen => {
                self.bump();
                if self.at_word("SELECT") || self.at_word("WITH") {
                    let query = self.select()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    Ok(Expr::Subquery {
                        query: Box::new(query),
                        span,
                    })
                } else {
                    let expr = self.expr()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    Ok(expr)
                }
            }
            TokenKind::Word(_) | TokenKind::QuotedIdent(_) => self.word_prefix(span),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn word_prefix(&mut self, span: sqlgen_ir::Span) -> GrammarResult<Expr> {
        match self.peek_word().as_deref() {
            Some("NULL") => {
                self.bump();
                return Ok(Expr::Literal {
                    value: Literal::Null,
                    span,
                });
            }
            Some("TRUE") => {
                self.bump();
                return Ok(Expr::Literal {
                    value: Literal::Boolean(true),
                    span,
                });
            }
            Some("FALSE") => {
                self.bump();
                return Ok(Expr::Literal {
                    value: Literal::Boolean(false),
                    span,
                });
            }
            Some("CURRENT_TIMESTAMP") | Some("CURRENT_DATE") | Some("CURRENT_TIME") => {
                self.bump();
                return Ok(Expr::Literal {
                    value: Literal::CurrentTimestamp,
                    span,
                });
            }
            Some("NOT") => {
                self.bump();
                if self.at_word("EXISTS") {
                    self.bump();
                    self.expect(TokenKind::LParen, "'('")?;
                    let query = self.select()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    return Ok(Expr::Exists {
                        query: Box::new(query),
                        negated: true,
                        span,
                    });
                }
                let expr = self.expr_bp(CMP_BP)?;
                return Ok(Expr::UnaryOp {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                    span,
                });
            }
            Some("EXISTS") => {
                self.bump();
                self.expect(TokenKind::LParen, "'('")?;
                let query = self.select()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(Expr::Exists {
                    query: Box::new(query),
                    negated: false,
                    span,
                });
            }
            Some("CASE") => return self.case_expr(span),
            Some("CAST") => {
                self.bump();
                self.expect(TokenKind::LParen, "'('")?;
                let expr = self.expr()?;
                self.expect_word("AS")?;
                let target_type = self.type_name()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(Expr::Cast {
                    expr: Box::new(expr),
                    target_type,
                    span,
                });
            }
            _ => {}
        }

        // Function call: any word directly followed by '('
        if matches!(self.peek().kind, TokenKind::Word(_)) && self.nth(1).kind == TokenKind::LParen
        {
            let (name, span) = self.identifier_any()?;
            return self.function_call(name, span);
        }

        // Column reference: [table.]column
        let (first, first_span) = self.identifier()?;
        if self.at(&TokenKind::Dot) {
            self.bump();
            let (column, _) = self.identifier_any()?;
            Ok(Expr::Column(ColumnRef {
                table: Some(first),
                column,
                span: first_span,
            }))
        } else {
            Ok(Expr::Column(ColumnRef {
                table: None,
                column: first,
                span: first_span,
            }))
        }
    }

    fn placeholder(
        &mut self,
        style: PlaceholderStyle,
        index: Option<u32>,
        name: Option<String>,
        span: sqlgen_ir::Span,
    ) -> GrammarResult<Expr> {
        if !self.grammar().allows_placeholder(style) {
            return Err(crate::error::ParseError::new(
                format!(
                    "bind-parameter style {style:?} is not supported by {}",
                    self.grammar().dialect()
                ),
                span,
            ));
        }
        let kind = match style {
            PlaceholderStyle::Question => BindParameterKind::Anonymous,
            PlaceholderStyle::QuestionNumbered | PlaceholderStyle::DollarNumbered => {
                BindParameterKind::Numbered(index.unwrap_or(0))
            }
            PlaceholderStyle::ColonNamed | PlaceholderStyle::AtNamed => {
                BindParameterKind::Named(name.unwrap_or_default())
            }
        };
        Ok(Expr::Bind(BindParameter { kind, span }))
    }

    fn function_call(&mut self, name: String, span: sqlgen_ir::Span) -> GrammarResult<Expr> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut wildcard = false;
        let mut distinct = false;
        let mut args = Vec::new();
        if self.at(&TokenKind::Star) {
            self.bump();
            wildcard = true;
        } else if !self.at(&TokenKind::RParen) {
            distinct = self.eat_word("DISTINCT");
            loop {
                args.push(self.expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;

        let over = if self.at_word("OVER") {
            if !self.grammar().supports(RuleId::WindowClause) {
                return Err(crate::error::ParseError::new(
                    format!(
                        "window functions are not supported by {}",
                        self.grammar().dialect()
                    ),
                    self.span(),
                ));
            }
            self.bump();
            Some(self.window_spec()?)
        } else {
            None
        };

        Ok(Expr::Function(FunctionCall {
            name,
            args,
            wildcard,
            distinct,
            over,
            span,
        }))
    }

    fn window_spec(&mut self) -> GrammarResult<WindowSpec> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut partition_by = Vec::new();
        let mut order_by = Vec::new();
        if self.eat_word("PARTITION") {
            self.expect_word("BY")?;
            loop {
                partition_by.push(self.expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        if self.eat_word("ORDER") {
            self.expect_word("BY")?;
            loop {
                order_by.push(self.ordering_term()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(WindowSpec {
            partition_by,
            order_by,
        })
    }

    pub(crate) fn ordering_term(&mut self) -> GrammarResult<OrderingTerm> {
        let expr = self.expr()?;
        let descending = if self.eat_word("DESC") {
            true
        } else {
            self.eat_word("ASC");
            false
        };
        let nulls_first = if self.at_word("NULLS") {
            if !self.grammar().supports(RuleId::NullsOrdering) {
                return Err(crate::error::ParseError::new(
                    format!(
                        "NULLS ordering is not supported by {}",
                        self.grammar().dialect()
                    ),
                    self.span(),
                ));
            }
            self.bump();
            if self.eat_word("FIRST") {
                Some(true)
            } else {
                self.expect_word("LAST")?;
                Some(false)
            }
        } else {
            None
        };
        Ok(OrderingTerm {
            expr,
            descending,
            nulls_first,
        })
    }

    fn case_expr(&mut self, span: sqlgen_ir::Span) -> GrammarResult<Expr> {
        self.bump();
        let operand = if self.at_word("WHEN") {
            None
        } else {
            Some(Box::new(self.expr()?))
        };
        let mut branches = Vec::new();
        while self.eat_word("WHEN") {
            let condition = self.expr()?;
            self.expect_word("THEN")?;
            let result = self.expr()?;
            branches.push(CaseBranch { condition, result });
        }
        if branches.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_branch = if self.eat_word("ELSE") {
            Some(Box::new(self.expr()?))
        } else {
            None
        };
        self.expect_word("END")?;
        Ok(Expr::Case {
            operand,
            branches,
            else_branch,
            span,
        })
    }

    fn is_suffix(&mut self, lhs: Expr) -> GrammarResult<Expr> {
        let span = self.bump().span;
        let negated = self.eat_word("NOT");
        if self.at_word("NULL") {
            self.bump();
            return Ok(Expr::IsNull {
                expr: Box::new(lhs),
                negated,
                span,
            });
        }
        let rhs = self.expr_bp(CMP_BP + 1)?;
        Ok(Expr::BinaryOp {
            left: Box::new(lhs),
            op: if negated { BinaryOp::IsNot } else { BinaryOp::Is },
            right: Box::new(rhs),
            span,
        })
    }

    fn in_suffix(&mut self, lhs: Expr, negated: bool) -> GrammarResult<Expr> {
        let span = self.bump().span;
        self.expect(TokenKind::LParen, "'('")?;
        if self.at_word("SELECT") || self.at_word("WITH") {
            let query = self.select()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(Expr::InSubquery {
                expr: Box::new(lhs),
                query: Box::new(query),
                negated,
                span,
            });
        }
        let mut list = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                list.push(self.expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::InList {
            expr: Box::new(lhs),
            list,
            negated,
            span,
        })
    }

    fn between_suffix(&mut self, lhs: Expr, negated: bool) -> GrammarResult<Expr> {
        let span = self.bump().span;
        let low = self.expr_bp(CMP_BP + 1)?;
        self.expect_word("AND")?;
        let high = self.expr_bp(CMP_BP + 1)?;
        Ok(Expr::Between {
            expr: Box::new(lhs),
            low: Box::new(low),
            high: Box::new(high),
            negated,
            span,
        })
    }

    /// A declared type name: leading word(s) plus an optional parenthesized
    /// size, e.g. `VARCHAR(100)` or `UNSIGNED BIG INT`
    pub(crate) fn type_name(&mut self) -> GrammarResult<String> {
        let (first, _) = self.identifier_any()?;
        let mut text = first;
        loop {
            let word = match &self.peek().kind {
                TokenKind::Word(w) if !self.grammar().is_keyword(w) => w.clone(),
                _ => break,
            };
            text.push(' ');
            text.push_str(&word);
            self.bump();
        }
        if self.eat(&TokenKind::LParen) {
            text.push('(');
            let mut first = true;
            loop {
                match self.peek().kind.clone() {
                    TokenKind::Integer(v) => {
                        if !first {
                            text.push_str(", ");
                        }
                        text.push_str(&v.to_string());
                        first = false;
                        self.bump();
                    }
                    TokenKind::Comma => {
                        self.bump();
                    }
                    _ => break,
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
            text.push(')');
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use crate::compose::Grammar;
    use crate::parser::parse;
    use sqlgen_ir::{BinaryOp, Dialect, Expr, SqliteVersion, Statement};

    fn parse_select_expr(grammar: &Grammar, sql: &str) -> Expr {
        let outcome = parse(grammar, sql);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        let Statement::Select(select) = &outcome.file.statements[0].statement else {
            panic!("expected select");
        };
        match &select.first_core().columns[0] {
            sqlgen_ir::ResultColumn::Expr { expr, .. } => expr.clone(),
            other => panic!("expected expression column, got {other:?}"),
        }
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let g = Grammar::compose(Dialect::Ansi);
        let expr = parse_select_expr(&g, "SELECT 1 + 2 * 3;");
        let Expr::BinaryOp { op, right, .. } = expr else {
            panic!()
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            *right,
            Expr::BinaryOp {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let g = Grammar::compose(Dialect::Ansi);
        let expr = parse_select_expr(&g, "SELECT a = 1 OR b = 2 AND c = 3;");
        let Expr::BinaryOp { op, .. } = expr else {
            panic!()
        };
        assert_eq!(op, BinaryOp::Or);
    }

    #[test]
    fn test_json_operator_parses_in_sqlite_3_38() {
        let g = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_38));
        let expr = parse_select_expr(&g, "SELECT doc -> '$.a' FROM t;");
        assert!(matches!(
            expr,
            Expr::BinaryOp {
                op: BinaryOp::JsonExtract,
                ..
            }
        ));
    }

    #[test]
    fn test_json_operator_rejected_in_sqlite_3_35() {
        let g = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_35));
        let outcome = parse(&g, "SELECT doc -> '$.a' FROM t;");
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn test_case_without_operand() {
        let g = Grammar::compose(Dialect::Ansi);
        let expr = parse_select_expr(&g, "SELECT CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END;");
        let Expr::Case {
            operand,
            branches,
            else_branch,
            ..
        } = expr
        else {
            panic!()
        };
        assert!(operand.is_none());
        assert_eq!(branches.len(), 1);
        assert!(else_branch.is_some());
    }

    #[test]
    fn test_between_and_in() {
        let g = Grammar::compose(Dialect::Ansi);
        assert!(matches!(
            parse_select_expr(&g, "SELECT a BETWEEN 1 AND 10;"),
            Expr::Between { negated: false, .. }
        ));
        assert!(matches!(
            parse_select_expr(&g, "SELECT a NOT IN (1, 2, 3);"),
            Expr::InList { negated: true, .. }
        ));
    }

    #[test]
    fn test_is_not_null() {
        let g = Grammar::compose(Dialect::Ansi);
        assert!(matches!(
            parse_select_expr(&g, "SELECT a IS NOT NULL;"),
            Expr::IsNull { negated: true, .. }
        ));
    }

    #[test]
    fn test_window_function_rejected_without_rule() {
        let g = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_24));
        let outcome = parse(&g, "SELECT row_number() OVER () FROM t;");
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn test_window_function_parses_in_sqlite_3_25() {
        let g = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_25));
        let expr = parse_select_expr(
            &g,
            "SELECT row_number() OVER (PARTITION BY dept ORDER BY total DESC) FROM t;",
        );
        let Expr::Function(call) = expr else { panic!() };
        assert!(call.is_window());
    }

    #[test]
    fn test_cast() {
        let g = Grammar::compose(Dialect::Ansi);
        let expr = parse_select_expr(&g, "SELECT CAST(a AS TEXT);");
        assert!(matches!(expr, Expr::Cast { .. }));
    }

    #[test]
    fn test_dollar_placeholder_only_in_postgres() {
        let pg = Grammar::compose(Dialect::PostgreSql);
        assert!(parse(&pg, "SELECT $1;").errors.is_empty());

        let sqlite = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_18));
        assert!(!parse(&sqlite, "SELECT $1;").errors.is_empty());
    }
}
