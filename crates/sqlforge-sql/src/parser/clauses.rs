//! Per-clause parsers
//!
//! Each parser consumes from its starting keyword through the clause's
//! terminator set (the next clause keyword at zero nesting depth, `)`, `;`,
//! or end of input) and leaves the cursor on the terminator. Nested clause
//! keywords are consumed by the recursive structure of the expression and
//! subquery parsers, so nesting depth alone decides which keyword terminates
//! the current clause.

use crate::error::Result;
use crate::expressions::{
    CommonTable, DistinctKind, FromClause, FunctionSource, GroupByClause, GroupingElement,
    HavingClause, JoinClause, JoinCondition, JoinType, LimitClause, NamedWindow, NullsOrder,
    OrderByClause, OrderByItem, ParenSource, ReturningClause, SelectClause, SelectItem,
    SortDirection, SourceExpr, SubquerySource, TableAlias, TableSource, WhereClause, WindowClause,
    WithClause,
};
use crate::tokens::TokenType;

use super::Parser;

impl Parser {
    /// Parse a WITH clause: `WITH [RECURSIVE] name [(cols)] AS
    /// [[NOT] MATERIALIZED] (query), ...`. Comments preceding the WITH
    /// keyword attach to the clause itself, not to the first CTE.
    pub fn parse_with_clause(&mut self) -> Result<WithClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::With, "WITH")?;
        let recursive = self.match_token(TokenType::Recursive);

        let mut tables = vec![self.parse_common_table()?];
        while self.match_token(TokenType::Comma) {
            tables.push(self.parse_common_table()?);
        }
        Ok(WithClause {
            recursive,
            tables,
            leading_comments,
        })
    }

    fn parse_common_table(&mut self) -> Result<CommonTable> {
        let leading_comments = self.take_leading_comments();
        let name = self.parse_identifier("CTE name")?;
        let column_aliases = if self.check(TokenType::LParen) {
            self.parse_identifier_list("CTE column alias")?
        } else {
            Vec::new()
        };
        self.expect(TokenType::As, "AS in CTE definition")?;

        let materialized = if self.match_token(TokenType::Materialized) {
            Some(true)
        } else if self.check(TokenType::Not)
            && self.peek_ahead_type(1) == TokenType::Materialized
        {
            self.advance();
            self.advance();
            Some(false)
        } else {
            None
        };

        self.expect(TokenType::LParen, "'(' opening CTE body")?;
        let query = self.parse_select_query()?;
        self.expect(TokenType::RParen, "')' closing CTE body")?;
        Ok(CommonTable {
            name,
            column_aliases,
            materialized,
            query,
            leading_comments,
        })
    }

    /// Parse `SELECT [DISTINCT [ON (...)]] item, ...`.
    pub fn parse_select_clause(&mut self) -> Result<SelectClause> {
        self.expect(TokenType::Select, "SELECT")?;
        // Comments directly after the SELECT keyword (hint position).
        let trailing_comments = self.take_last_trailing_comments();

        let distinct = if self.match_token(TokenType::Distinct) {
            if self.match_token(TokenType::On) {
                self.expect(TokenType::LParen, "'(' after DISTINCT ON")?;
                let mut exprs = vec![self.parse_expression()?];
                while self.match_token(TokenType::Comma) {
                    exprs.push(self.parse_expression()?);
                }
                self.expect(TokenType::RParen, "')' closing DISTINCT ON")?;
                Some(DistinctKind::DistinctOn(exprs))
            } else {
                Some(DistinctKind::Distinct)
            }
        } else {
            self.match_token(TokenType::All);
            None
        };

        let mut items = vec![self.parse_select_item()?];
        while self.match_token(TokenType::Comma) {
            items.push(self.parse_select_item()?);
        }
        Ok(SelectClause {
            distinct,
            items,
            trailing_comments,
        })
    }

    /// Parse one select-list item: `expr [[AS] alias]`.
    pub fn parse_select_item(&mut self) -> Result<SelectItem> {
        let leading_comments = self.take_leading_comments();
        let expr = self.parse_expression()?;
        let alias = if self.match_token(TokenType::As) {
            Some(self.parse_identifier("alias after AS")?)
        } else if matches!(
            self.peek_type(),
            TokenType::Identifier | TokenType::QuotedIdentifier
        ) {
            Some(self.parse_identifier("alias")?)
        } else {
            None
        };
        let trailing_comments = self.take_last_trailing_comments();
        Ok(SelectItem {
            expr,
            alias,
            leading_comments,
            trailing_comments,
        })
    }

    /// Parse `FROM source join*`.
    pub fn parse_from_clause(&mut self) -> Result<FromClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::From, "FROM")?;
        let source = self.parse_source()?;
        let joins = self.parse_joins()?;
        Ok(FromClause {
            source,
            joins,
            leading_comments,
        })
    }

    /// Parse one FROM-clause source: a table, a (possibly LATERAL)
    /// subquery, a set-returning function, or a parenthesized join tree.
    pub fn parse_source(&mut self) -> Result<SourceExpr> {
        let lateral = self.match_token(TokenType::Lateral);

        if self.check(TokenType::LParen) {
            if matches!(
                self.peek_ahead_type(1),
                TokenType::Select | TokenType::With | TokenType::Values
            ) {
                self.advance(); // (
                let query = self.parse_select_query()?;
                self.expect(TokenType::RParen, "')' closing subquery")?;
                let alias = self.parse_table_alias()?;
                return Ok(SourceExpr::Subquery(Box::new(SubquerySource {
                    lateral,
                    query,
                    alias,
                })));
            }
            if lateral {
                return Err(self.error_here("LATERAL must precede a subquery or function call"));
            }
            // Parenthesized join tree.
            self.advance(); // (
            let source = self.parse_source()?;
            let joins = self.parse_joins()?;
            self.expect(TokenType::RParen, "')' closing joined sources")?;
            return Ok(SourceExpr::Paren(Box::new(ParenSource { source, joins })));
        }

        let name = self.parse_qualified_name("table name")?;
        if self.check(TokenType::LParen) {
            let function = self.parse_function_call(name)?;
            let alias = self.parse_table_alias()?;
            return Ok(SourceExpr::Function(Box::new(FunctionSource {
                lateral,
                function,
                alias,
            })));
        }
        if lateral {
            return Err(self.error_here("LATERAL must precede a subquery or function call"));
        }
        let alias = self.parse_table_alias()?;
        Ok(SourceExpr::Table(TableSource { name, alias }))
    }

    fn parse_table_alias(&mut self) -> Result<Option<TableAlias>> {
        let name = if self.match_token(TokenType::As) {
            self.parse_identifier("alias after AS")?
        } else if matches!(
            self.peek_type(),
            TokenType::Identifier | TokenType::QuotedIdentifier
        ) {
            self.parse_identifier("alias")?
        } else {
            return Ok(None);
        };
        let columns = if self.check(TokenType::LParen) {
            self.parse_identifier_list("alias column")?
        } else {
            Vec::new()
        };
        Ok(Some(TableAlias { name, columns }))
    }

    /// Parse zero or more join steps. A trailing ON/USING condition always
    /// associates with the join parsed immediately before it.
    pub fn parse_joins(&mut self) -> Result<Vec<JoinClause>> {
        let mut joins = Vec::new();
        loop {
            match self.peek_type() {
                TokenType::Comma => {
                    let leading_comments = self.take_leading_comments();
                    self.advance();
                    let source = self.parse_source()?;
                    joins.push(JoinClause {
                        join_type: JoinType::Comma,
                        natural: false,
                        lateral: source_is_lateral(&source),
                        source,
                        condition: None,
                        leading_comments,
                    });
                }
                TokenType::Join
                | TokenType::Inner
                | TokenType::Left
                | TokenType::Right
                | TokenType::Full
                | TokenType::Cross
                | TokenType::Natural => {
                    let leading_comments = self.take_leading_comments();
                    let natural = self.match_token(TokenType::Natural);
                    let join_type = self.parse_join_type()?;
                    let source = self.parse_source()?;
                    let condition = self.parse_join_condition(join_type, natural)?;
                    joins.push(JoinClause {
                        join_type,
                        natural,
                        lateral: source_is_lateral(&source),
                        source,
                        condition,
                        leading_comments,
                    });
                }
                _ => break,
            }
        }
        Ok(joins)
    }

    fn parse_join_type(&mut self) -> Result<JoinType> {
        match self.peek_type() {
            TokenType::Join => {
                self.advance();
                Ok(JoinType::Inner)
            }
            TokenType::Inner => {
                self.advance();
                self.expect(TokenType::Join, "JOIN after INNER")?;
                Ok(JoinType::Inner)
            }
            TokenType::Left => {
                self.advance();
                self.match_token(TokenType::Outer);
                self.expect(TokenType::Join, "JOIN after LEFT")?;
                Ok(JoinType::Left)
            }
            TokenType::Right => {
                self.advance();
                self.match_token(TokenType::Outer);
                self.expect(TokenType::Join, "JOIN after RIGHT")?;
                Ok(JoinType::Right)
            }
            TokenType::Full => {
                self.advance();
                self.match_token(TokenType::Outer);
                self.expect(TokenType::Join, "JOIN after FULL")?;
                Ok(JoinType::Full)
            }
            TokenType::Cross => {
                self.advance();
                self.expect(TokenType::Join, "JOIN after CROSS")?;
                Ok(JoinType::Cross)
            }
            _ => Err(self.error_here("expected a join")),
        }
    }

    fn parse_join_condition(
        &mut self,
        join_type: JoinType,
        natural: bool,
    ) -> Result<Option<JoinCondition>> {
        if natural || join_type == JoinType::Cross {
            return Ok(None);
        }
        if self.match_token(TokenType::On) {
            let condition = self.parse_expression()?;
            return Ok(Some(JoinCondition::On(condition)));
        }
        if self.match_token(TokenType::Using) {
            let columns = self.parse_identifier_list("column in USING")?;
            return Ok(Some(JoinCondition::Using(columns)));
        }
        Ok(None)
    }

    pub fn parse_where_clause(&mut self) -> Result<WhereClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::Where, "WHERE")?;
        let condition = self.parse_expression()?;
        Ok(WhereClause {
            condition,
            leading_comments,
        })
    }

    /// Parse `GROUP BY element, ...` where an element is an expression,
    /// `ROLLUP (...)`, `CUBE (...)`, or `GROUPING SETS ((...), ...)`.
    pub fn parse_group_by_clause(&mut self) -> Result<GroupByClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::Group, "GROUP")?;
        self.expect(TokenType::By, "BY after GROUP")?;

        let mut items = vec![self.parse_grouping_element()?];
        while self.match_token(TokenType::Comma) {
            items.push(self.parse_grouping_element()?);
        }
        Ok(GroupByClause {
            items,
            leading_comments,
        })
    }

    fn parse_grouping_element(&mut self) -> Result<GroupingElement> {
        match self.peek_type() {
            TokenType::Rollup => {
                self.advance();
                Ok(GroupingElement::Rollup(self.parse_paren_expr_list()?))
            }
            TokenType::Cube => {
                self.advance();
                Ok(GroupingElement::Cube(self.parse_paren_expr_list()?))
            }
            TokenType::Grouping if self.peek_ahead_type(1) == TokenType::Sets => {
                self.advance();
                self.advance();
                self.expect(TokenType::LParen, "'(' after GROUPING SETS")?;
                let mut sets = vec![self.parse_paren_expr_list()?];
                while self.match_token(TokenType::Comma) {
                    sets.push(self.parse_paren_expr_list()?);
                }
                self.expect(TokenType::RParen, "')' closing GROUPING SETS")?;
                Ok(GroupingElement::GroupingSets(sets))
            }
            _ => Ok(GroupingElement::Expr(self.parse_expression()?)),
        }
    }

    fn parse_paren_expr_list(&mut self) -> Result<Vec<crate::expressions::ValueExpr>> {
        self.expect(TokenType::LParen, "'('")?;
        let mut exprs = Vec::new();
        if !self.check(TokenType::RParen) {
            exprs.push(self.parse_expression()?);
            while self.match_token(TokenType::Comma) {
                exprs.push(self.parse_expression()?);
            }
        }
        self.expect(TokenType::RParen, "')'")?;
        Ok(exprs)
    }

    pub fn parse_having_clause(&mut self) -> Result<HavingClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::Having, "HAVING")?;
        let condition = self.parse_expression()?;
        Ok(HavingClause {
            condition,
            leading_comments,
        })
    }

    /// Parse `WINDOW name AS (spec), ...`.
    pub fn parse_window_clause(&mut self) -> Result<WindowClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::Window, "WINDOW")?;

        let mut windows = vec![self.parse_named_window()?];
        while self.match_token(TokenType::Comma) {
            windows.push(self.parse_named_window()?);
        }
        Ok(WindowClause {
            windows,
            leading_comments,
        })
    }

    fn parse_named_window(&mut self) -> Result<NamedWindow> {
        let name = self.parse_identifier("window name")?;
        self.expect(TokenType::As, "AS in window definition")?;
        self.expect(TokenType::LParen, "'(' opening window specification")?;
        let spec = self.parse_window_spec()?;
        self.expect(TokenType::RParen, "')' closing window specification")?;
        Ok(NamedWindow { name, spec })
    }

    /// Parse `ORDER BY expr [ASC|DESC] [NULLS FIRST|LAST], ...`.
    pub fn parse_order_by_clause(&mut self) -> Result<OrderByClause> {
        let leading_comments = self.take_leading_comments();
        self.expect(TokenType::Order, "ORDER")?;
        self.expect(TokenType::By, "BY after ORDER")?;

        let mut items = vec![self.parse_order_by_item()?];
        while self.match_token(TokenType::Comma) {
            items.push(self.parse_order_by_item()?);
        }
        Ok(OrderByClause {
            items,
            leading_comments,
        })
    }

    fn parse_order_by_item(&mut self) -> Result<OrderByItem> {
        let expr = self.parse_expression()?;
        let direction = if self.match_token(TokenType::Asc) {
            Some(SortDirection::Asc)
        } else if self.match_token(TokenType::Desc) {
            Some(SortDirection::Desc)
        } else {
            None
        };
        let nulls = if self.match_token(TokenType::Nulls) {
            if self.match_token(TokenType::First) {
                Some(NullsOrder::First)
            } else {
                self.expect(TokenType::Last, "FIRST or LAST after NULLS")?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        Ok(OrderByItem {
            expr,
            direction,
            nulls,
        })
    }

    /// Parse `LIMIT n|ALL` and `OFFSET m [ROW|ROWS]` in either order.
    /// Returns `None` when neither keyword is present.
    pub fn parse_limit_clause(&mut self) -> Result<Option<LimitClause>> {
        let mut clause = LimitClause {
            count: None,
            offset: None,
            leading_comments: Vec::new(),
        };
        let mut present = false;

        loop {
            if self.check(TokenType::Limit) {
                if !present {
                    clause.leading_comments = self.take_leading_comments();
                }
                self.advance();
                present = true;
                if !self.match_token(TokenType::All) {
                    clause.count = Some(self.parse_expression()?);
                }
            } else if self.check(TokenType::Offset) {
                if !present {
                    clause.leading_comments = self.take_leading_comments();
                }
                self.advance();
                present = true;
                clause.offset = Some(self.parse_expression()?);
                if !self.match_token(TokenType::Rows) {
                    self.match_token(TokenType::Row);
                }
            } else {
                break;
            }
        }

        Ok(if present { Some(clause) } else { None })
    }

    /// Parse `RETURNING item, ...` (shared by INSERT/UPDATE/DELETE).
    pub fn parse_returning_clause(&mut self) -> Result<ReturningClause> {
        self.expect(TokenType::Returning, "RETURNING")?;
        let mut items = vec![self.parse_select_item()?];
        while self.match_token(TokenType::Comma) {
            items.push(self.parse_select_item()?);
        }
        Ok(ReturningClause { items })
    }
}

fn source_is_lateral(source: &SourceExpr) -> bool {
    match source {
        SourceExpr::Subquery(s) => s.lateral,
        SourceExpr::Function(f) => f.lateral,
        _ => false,
    }
}
