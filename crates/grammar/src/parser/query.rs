// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SELECT parsing: cores, joins, CTEs, compound operators, ORDER BY / LIMIT

use super::Parser;
use crate::compose::RuleId;
use crate::error::GrammarResult;
use crate::token::TokenKind;
use sqlgen_ir::{
    CommonTableExpression, CompoundOp, FromClause, Join, JoinConstraint, JoinKind, Limit,
    ResultColumn, Select, SelectBody, SelectCore, TableOrSubquery, With,
};

impl Parser<'_> {
    pub(crate) fn select(&mut self) -> GrammarResult<Select> {
        let span = self.span();
        let with = if self.at_word("WITH") {
            if !self.grammar().supports(RuleId::CteClause) {
                return Err(crate::error::ParseError::new(
                    format!("WITH clauses are not supported by {}", self.grammar().dialect()),
                    span,
                ));
            }
            Some(self.with_clause()?)
        } else {
            None
        };

        let mut body = SelectBody::Core(self.select_core()?);
        loop {
            let op = if self.at_word("UNION") {
                self.bump();
                if self.eat_word("ALL") {
                    CompoundOp::UnionAll
                } else {
                    CompoundOp::Union
                }
            } else if self.at_word("INTERSECT") {
                self.bump();
                CompoundOp::Intersect
            } else if self.at_word("EXCEPT") {
                self.bump();
                CompoundOp::Except
            } else {
                break;
            };
            let right = self.select_core()?;
            body = SelectBody::Compound {
                left: Box::new(body),
                op,
                right,
            };
        }

        let mut order_by = Vec::new();
        if self.eat_word("ORDER") {
            self.expect_word("BY")?;
            loop {
                order_by.push(self.ordering_term()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let limit = if self.at_word("LIMIT") {
            if !self.grammar().supports(RuleId::LimitClause) {
                return Err(crate::error::ParseError::new(
                    format!("LIMIT is not supported by {}", self.grammar().dialect()),
                    self.span(),
                ));
            }
            self.bump();
            let first = self.expr()?;
            if self.eat(&TokenKind::Comma) {
                // MySQL style: LIMIT offset, count
                let count = self.expr()?;
                Some(Limit {
                    limit: count,
                    offset: Some(first),
                })
            } else if self.eat_word("OFFSET") {
                let offset = self.expr()?;
                Some(Limit {
                    limit: first,
                    offset: Some(offset),
                })
            } else {
                Some(Limit {
                    limit: first,
                    offset: None,
                })
            }
        } else {
            None
        };

        Ok(Select {
            with,
            body,
            order_by,
            limit,
            span,
        })
    }

    fn with_clause(&mut self) -> GrammarResult<With> {
        self.expect_word("WITH")?;
        let recursive = self.eat_word("RECURSIVE");
        let mut ctes = Vec::new();
        loop {
            let span = self.span();
            let (name, _) = self.identifier()?;
            let columns = if self.at(&TokenKind::LParen) {
                Some(self.column_name_list()?)
            } else {
                None
            };
            self.expect_word("AS")?;
            self.expect(TokenKind::LParen, "'('")?;
            let query = self.select()?;
            self.expect(TokenKind::RParen, "')'")?;
            ctes.push(CommonTableExpression {
                name,
                columns,
                query,
                span,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(With { recursive, ctes })
    }

    fn select_core(&mut self) -> GrammarResult<SelectCore> {
        let span = self.span();
        self.expect_word("SELECT")?;
        let distinct = if self.eat_word("DISTINCT") {
            true
        } else {
            self.eat_word("ALL");
            false
        };

        let mut columns = Vec::new();
        loop {
            columns.push(self.result_column()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        let from = if self.eat_word("FROM") {
            Some(self.from_clause()?)
        } else {
            None
        };

        let where_clause = if self.eat_word("WHERE") {
            Some(self.expr()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.eat_word("GROUP") {
            self.expect_word("BY")?;
            loop {
                group_by.push(self.expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let having = if self.eat_word("HAVING") {
            Some(self.expr()?)
        } else {
            None
        };

        Ok(SelectCore {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            span,
        })
    }

    pub(crate) fn result_column(&mut self) -> GrammarResult<ResultColumn> {
        let span = self.span();
        if self.at(&TokenKind::Star) {
            self.bump();
            return Ok(ResultColumn::Wildcard(span));
        }
        // `table.*`
        if matches!(
            self.peek().kind,
            TokenKind::Word(_) | TokenKind::QuotedIdent(_)
        ) && self.nth(1).kind == TokenKind::Dot
            && self.nth(2).kind == TokenKind::Star
        {
            let (table, span) = self.identifier()?;
            self.bump();
            self.bump();
            return Ok(ResultColumn::TableWildcard { table, span });
        }
        let expr = self.expr()?;
        let alias = self.alias()?;
        Ok(ResultColumn::Expr { expr, alias })
    }

    pub(crate) fn from_clause(&mut self) -> GrammarResult<FromClause> {
        let first = self.table_or_subquery()?;
        let mut joins = Vec::new();
        loop {
            if self.eat(&TokenKind::Comma) {
                let table = self.table_or_subquery()?;
                joins.push(Join {
                    kind: JoinKind::Cross,
                    natural: false,
                    table,
                    constraint: None,
                });
                continue;
            }

            let natural = self.at_word("NATURAL");
            let lookahead = if natural { 1 } else { 0 };
            let kind = match self.nth_word(lookahead).as_deref() {
                Some("JOIN") | Some("INNER") => JoinKind::Inner,
                Some("LEFT") => JoinKind::Left,
                Some("RIGHT") => JoinKind::Right,
                Some("FULL") => JoinKind::Full,
                Some("CROSS") => JoinKind::Cross,
                _ => break,
            };
            if natural {
                self.bump();
            }
            // Consume the join kind words up to JOIN
            if !self.at_word("JOIN") {
                self.bump();
                self.eat_word("OUTER");
            }
            self.expect_word("JOIN")?;

            let table = self.table_or_subquery()?;
            let constraint = if self.eat_word("ON") {
                Some(JoinConstraint::On(self.expr()?))
            } else if self.eat_word("USING") {
                Some(JoinConstraint::Using(self.column_name_list()?))
            } else {
                None
            };
            joins.push(Join {
                kind,
                natural,
                table,
                constraint,
            });
        }
        Ok(FromClause { first, joins })
    }

    fn table_or_subquery(&mut self) -> GrammarResult<TableOrSubquery> {
        let span = self.span();
        if self.eat(&TokenKind::LParen) {
            let query = self.select()?;
            self.expect(TokenKind::RParen, "')'")?;
            let alias = self.alias()?;
            return Ok(TableOrSubquery::Subquery {
                query: Box::new(query),
                alias,
                span,
            });
        }
        let (name, span) = self.identifier()?;
        let alias = self.alias()?;
        Ok(TableOrSubquery::Table { name, alias, span })
    }
}

#[cfg(test)]
mod tests {
    use crate::compose::Grammar;
    use crate::parser::parse;
    use sqlgen_ir::{
        CompoundOp, Dialect, JoinConstraint, JoinKind, ResultColumn, Select, SelectBody,
        SqliteVersion, Statement,
    };

    fn parse_select(grammar: &Grammar, sql: &str) -> Select {
        let outcome = parse(grammar, sql);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        match &outcome.file.statements[0].statement {
            Statement::Select(s) => s.clone(),
            other => panic!("expected select, got {other:?}"),
        }
    }

    fn sqlite() -> Grammar {
        Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_38))
    }

    #[test]
    fn test_select_with_joins() {
        let select = parse_select(
            &sqlite(),
            "SELECT u.name, o.total FROM users u LEFT JOIN orders o ON o.user_id = u.id;",
        );
        let core = select.first_core();
        assert_eq!(core.columns.len(), 2);
        let from = core.from.as_ref().unwrap();
        assert_eq!(from.joins.len(), 1);
        assert_eq!(from.joins[0].kind, JoinKind::Left);
    }

    #[test]
    fn test_join_using() {
        let select = parse_select(&sqlite(), "SELECT * FROM a JOIN b USING (id);");
        let from = select.first_core().from.as_ref().unwrap();
        assert!(matches!(
            from.joins[0].constraint,
            Some(JoinConstraint::Using(ref cols)) if cols == &["id".to_string()]
        ));
    }

    #[test]
    fn test_natural_join() {
        let select = parse_select(&sqlite(), "SELECT * FROM a NATURAL JOIN b;");
        let from = select.first_core().from.as_ref().unwrap();
        assert!(from.joins[0].natural);
        assert_eq!(from.joins[0].kind, JoinKind::Inner);
    }

    #[test]
    fn test_table_wildcard() {
        let select = parse_select(&sqlite(), "SELECT t.* FROM t;");
        assert!(matches!(
            select.first_core().columns[0],
            ResultColumn::TableWildcard { ref table, .. } if table == "t"
        ));
    }

    #[test]
    fn test_compound_union() {
        let select = parse_select(&sqlite(), "SELECT a FROM t UNION SELECT b FROM t2;");
        assert!(matches!(
            select.body,
            SelectBody::Compound {
                op: CompoundOp::Union,
                ..
            }
        ));
        assert_eq!(select.cores().len(), 2);
    }

    #[test]
    fn test_cte() {
        let select = parse_select(
            &sqlite(),
            "WITH active AS (SELECT id FROM users WHERE active = 1) SELECT id FROM active;",
        );
        let with = select.with.as_ref().unwrap();
        assert!(!with.recursive);
        assert_eq!(with.ctes[0].name, "active");
    }

    #[test]
    fn test_recursive_cte() {
        let select = parse_select(
            &sqlite(),
            "WITH RECURSIVE cnt(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM cnt LIMIT 10) \
             SELECT x FROM cnt;",
        );
        let with = select.with.as_ref().unwrap();
        assert!(with.recursive);
        assert_eq!(with.ctes[0].columns.as_deref(), Some(&["x".to_string()][..]));
    }

    #[test]
    fn test_limit_offset_forms() {
        let select = parse_select(&sqlite(), "SELECT a FROM t LIMIT 10 OFFSET 5;");
        let limit = select.limit.as_ref().unwrap();
        assert!(limit.offset.is_some());

        let mysql = Grammar::compose(Dialect::MySql);
        let select = parse_select(&mysql, "SELECT a FROM t LIMIT 5, 10;");
        assert!(select.limit.as_ref().unwrap().offset.is_some());
    }

    #[test]
    fn test_subquery_in_from() {
        let select = parse_select(&sqlite(), "SELECT x FROM (SELECT a AS x FROM t) sub;");
        let from = select.first_core().from.as_ref().unwrap();
        assert!(matches!(
            from.first,
            sqlgen_ir::TableOrSubquery::Subquery { ref alias, .. } if alias.as_deref() == Some("sub")
        ));
    }

    #[test]
    fn test_group_by_having() {
        let select = parse_select(
            &sqlite(),
            "SELECT dept, COUNT(*) FROM emp GROUP BY dept HAVING COUNT(*) > 3;",
        );
        let core = select.first_core();
        assert_eq!(core.group_by.len(), 1);
        assert!(core.having.is_some());
    }
}
