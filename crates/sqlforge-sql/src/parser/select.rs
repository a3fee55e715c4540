//! SELECT, compound (UNION/INTERSECT/EXCEPT), and VALUES query parsing
//!
//! INTERSECT binds tighter than UNION and EXCEPT; set operations are
//! left-associative. ORDER BY / LIMIT written after a compound apply to the
//! whole result and are attached to the compound node, never to the last
//! operand.

use crate::error::{Error, Result};
use crate::expressions::{
    BinarySelectQuery, SelectQuery, SetOperator, SimpleSelectQuery, ValueExpr, ValuesQuery,
    WithClause,
};
use crate::tokens::TokenType;

use super::Parser;

impl Parser {
    /// Parse any query that produces rows, including a leading WITH clause.
    pub fn parse_select_query(&mut self) -> Result<SelectQuery> {
        let with = if self.check(TokenType::With) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        self.parse_query_body(with)
    }

    /// Parse a query body and attach an already-parsed WITH clause to it.
    pub(crate) fn parse_query_body(&mut self, with: Option<WithClause>) -> Result<SelectQuery> {
        let mut query = self.parse_query_term()?;

        // UNION / EXCEPT level (lower precedence than INTERSECT).
        while matches!(self.peek_type(), TokenType::Union | TokenType::Except) {
            let base = self.advance().token_type;
            let all = self.match_token(TokenType::All);
            self.match_token(TokenType::Distinct);
            let operator = match (base, all) {
                (TokenType::Union, false) => SetOperator::Union,
                (TokenType::Union, true) => SetOperator::UnionAll,
                (_, false) => SetOperator::Except,
                (_, true) => SetOperator::ExceptAll,
            };
            let right = self.parse_query_term()?;
            query = SelectQuery::Binary(Box::new(BinarySelectQuery {
                with: None,
                left: query,
                operator,
                right,
                order_by: None,
                limit: None,
                leading_comments: Vec::new(),
                trailing_comments: Vec::new(),
            }));
        }

        // Trailing ORDER BY / LIMIT bind to whatever query was built above.
        let order_by = if self.check(TokenType::Order) {
            Some(self.parse_order_by_clause()?)
        } else {
            None
        };
        let limit = self.parse_limit_clause()?;

        // Only overwrite what was actually parsed here: a parenthesized
        // operand may already carry its own WITH / ORDER BY / LIMIT.
        match &mut query {
            SelectQuery::Simple(q) => {
                if with.is_some() {
                    q.with = with;
                }
                if order_by.is_some() {
                    q.order_by = order_by;
                }
                if limit.is_some() {
                    q.limit = limit;
                }
            }
            SelectQuery::Binary(q) => {
                if with.is_some() {
                    q.with = with;
                }
                if order_by.is_some() {
                    q.order_by = order_by;
                }
                if limit.is_some() {
                    q.limit = limit;
                }
            }
            SelectQuery::Values(q) => {
                if order_by.is_some() || limit.is_some() {
                    return Err(Error::unsupported("ORDER BY/LIMIT after VALUES"));
                }
                if with.is_some() {
                    q.with = with;
                }
            }
        }
        Ok(query)
    }

    fn parse_query_term(&mut self) -> Result<SelectQuery> {
        let mut left = self.parse_query_primary()?;
        while self.check(TokenType::Intersect) {
            self.advance();
            let all = self.match_token(TokenType::All);
            self.match_token(TokenType::Distinct);
            let operator = if all {
                SetOperator::IntersectAll
            } else {
                SetOperator::Intersect
            };
            let right = self.parse_query_primary()?;
            left = SelectQuery::Binary(Box::new(BinarySelectQuery {
                with: None,
                left,
                operator,
                right,
                order_by: None,
                limit: None,
                leading_comments: Vec::new(),
                trailing_comments: Vec::new(),
            }));
        }
        Ok(left)
    }

    fn parse_query_primary(&mut self) -> Result<SelectQuery> {
        match self.peek_type() {
            TokenType::LParen => {
                self.advance();
                let query = self.parse_select_query()?;
                self.expect(TokenType::RParen, "')' closing query")?;
                Ok(query)
            }
            TokenType::Values => self.parse_values_query(),
            TokenType::Select => {
                let select = self.parse_simple_select_core()?;
                Ok(SelectQuery::Simple(Box::new(select)))
            }
            TokenType::Eof => {
                Err(self.error_here("unexpected end of input, expected a query"))
            }
            _ => Err(self.error_here(format!(
                "expected SELECT, VALUES, or '(', found '{}'",
                self.peek().text
            ))),
        }
    }

    /// Parse `SELECT ... [FROM] [WHERE] [GROUP BY] [HAVING] [WINDOW]`.
    /// ORDER BY / LIMIT are handled by [`parse_query_body`](Self::parse_query_body)
    /// so they attach correctly around set operations.
    fn parse_simple_select_core(&mut self) -> Result<SimpleSelectQuery> {
        let select = self.parse_select_clause()?;
        let mut query = SimpleSelectQuery::new(select);

        if self.check(TokenType::From) {
            query.from = Some(self.parse_from_clause()?);
        }
        if self.check(TokenType::Where) {
            query.where_clause = Some(self.parse_where_clause()?);
        }
        if self.check(TokenType::Group) {
            query.group_by = Some(self.parse_group_by_clause()?);
        }
        if self.check(TokenType::Having) {
            query.having = Some(self.parse_having_clause()?);
        }
        if self.check(TokenType::Window) {
            query.window = Some(self.parse_window_clause()?);
        }
        Ok(query)
    }

    /// Parse `VALUES (row), (row), ...`. `DEFAULT` is allowed as a row
    /// element (meaningful when the VALUES feeds an INSERT) and is retained
    /// as raw text.
    pub(crate) fn parse_values_query(&mut self) -> Result<SelectQuery> {
        self.expect(TokenType::Values, "VALUES")?;
        let mut rows = vec![self.parse_values_row()?];
        while self.match_token(TokenType::Comma) {
            rows.push(self.parse_values_row()?);
        }
        Ok(SelectQuery::Values(Box::new(ValuesQuery {
            with: None,
            rows,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    pub(crate) fn parse_values_row(&mut self) -> Result<Vec<ValueExpr>> {
        self.expect(TokenType::LParen, "'(' opening VALUES row")?;
        let mut row = vec![self.parse_values_element()?];
        while self.match_token(TokenType::Comma) {
            row.push(self.parse_values_element()?);
        }
        self.expect(TokenType::RParen, "')' closing VALUES row")?;
        Ok(row)
    }

    fn parse_values_element(&mut self) -> Result<ValueExpr> {
        if self.match_token(TokenType::Default) {
            return Ok(ValueExpr::Raw(crate::expressions::RawString::new("DEFAULT")));
        }
        self.parse_expression()
    }
}
