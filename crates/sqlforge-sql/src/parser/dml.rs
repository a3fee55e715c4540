//! INSERT, UPDATE, DELETE, and MERGE parsing
//!
//! All four accept a leading WITH clause (passed in by the dispatcher) and a
//! trailing RETURNING clause. MERGE preserves the source order of its WHEN
//! clauses: action evaluation order is semantically significant and must
//! survive round-trips.

use crate::error::Result;
use crate::expressions::{
    DeleteQuery, FromClause, InsertQuery, InsertSource, MergeAction, MergeInsertValues,
    MergeQuery, MergeWhenClause, SetClause, SetItem, SetValue, Statement, TableAlias, TableSource,
    UpdateClause, UpdateQuery, WithClause,
};
use crate::tokens::TokenType;

use super::Parser;

impl Parser {
    /// Parse `INSERT INTO target [(cols)] VALUES ... | SELECT ... | DEFAULT
    /// VALUES [RETURNING ...]`.
    pub fn parse_insert(&mut self, with: Option<WithClause>) -> Result<Statement> {
        self.expect(TokenType::Insert, "INSERT")?;
        self.expect(TokenType::Into, "INTO after INSERT")?;
        let target = self.parse_qualified_name("target table")?;

        let columns = if self.check(TokenType::LParen) {
            self.parse_identifier_list("target column")?
        } else {
            Vec::new()
        };

        let source = match self.peek_type() {
            TokenType::Default => {
                self.advance();
                self.expect(TokenType::Values, "VALUES after DEFAULT")?;
                InsertSource::DefaultValues
            }
            TokenType::Select | TokenType::Values | TokenType::With | TokenType::LParen => {
                InsertSource::Query(self.parse_select_query()?)
            }
            _ => {
                return Err(self.error_here(format!(
                    "expected VALUES, SELECT, or DEFAULT VALUES, found '{}'",
                    self.peek().text
                )))
            }
        };

        let returning = if self.check(TokenType::Returning) {
            Some(self.parse_returning_clause()?)
        } else {
            None
        };

        Ok(Statement::Insert(Box::new(InsertQuery {
            with,
            target,
            columns,
            source,
            returning,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    /// Parse `UPDATE target SET assignments [FROM ...] [WHERE ...]
    /// [RETURNING ...]`.
    pub fn parse_update(&mut self, with: Option<WithClause>) -> Result<Statement> {
        self.expect(TokenType::Update, "UPDATE")?;
        let source = self.parse_update_target()?;
        self.expect(TokenType::Set, "SET after UPDATE target")?;
        let set = self.parse_set_clause()?;

        let from = if self.check(TokenType::From) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let where_clause = if self.check(TokenType::Where) {
            Some(self.parse_where_clause()?)
        } else {
            None
        };
        let returning = if self.check(TokenType::Returning) {
            Some(self.parse_returning_clause()?)
        } else {
            None
        };

        Ok(Statement::Update(Box::new(UpdateQuery {
            with,
            update: UpdateClause { source },
            set,
            from,
            where_clause,
            returning,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    /// Parse `DELETE FROM target [USING sources] [WHERE ...] [RETURNING ...]`.
    pub fn parse_delete(&mut self, with: Option<WithClause>) -> Result<Statement> {
        self.expect(TokenType::Delete, "DELETE")?;
        self.expect(TokenType::From, "FROM after DELETE")?;
        let target = self.parse_update_target()?;

        let using = if self.match_token(TokenType::Using) {
            let source = self.parse_source()?;
            let joins = self.parse_joins()?;
            Some(FromClause {
                source,
                joins,
                leading_comments: Vec::new(),
            })
        } else {
            None
        };
        let where_clause = if self.check(TokenType::Where) {
            Some(self.parse_where_clause()?)
        } else {
            None
        };
        let returning = if self.check(TokenType::Returning) {
            Some(self.parse_returning_clause()?)
        } else {
            None
        };

        Ok(Statement::Delete(Box::new(DeleteQuery {
            with,
            target,
            using,
            where_clause,
            returning,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    /// Parse `MERGE INTO target USING source ON condition WHEN ... THEN ...`.
    pub fn parse_merge(&mut self, with: Option<WithClause>) -> Result<Statement> {
        self.expect(TokenType::Merge, "MERGE")?;
        self.expect(TokenType::Into, "INTO after MERGE")?;
        let target = self.parse_update_target()?;
        self.expect(TokenType::Using, "USING after MERGE target")?;
        let source = self.parse_source()?;
        self.expect(TokenType::On, "ON after MERGE source")?;
        let on = self.parse_expression()?;

        let mut when_clauses = Vec::new();
        while self.check(TokenType::When) {
            when_clauses.push(self.parse_merge_when()?);
        }
        if when_clauses.is_empty() {
            return Err(self.error_here("MERGE requires at least one WHEN clause"));
        }

        Ok(Statement::Merge(Box::new(MergeQuery {
            with,
            target,
            source,
            on,
            when_clauses,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    fn parse_merge_when(&mut self) -> Result<MergeWhenClause> {
        self.expect(TokenType::When, "WHEN")?;
        let matched = if self.match_token(TokenType::Not) {
            self.expect(TokenType::Matched, "MATCHED after NOT")?;
            false
        } else {
            self.expect(TokenType::Matched, "MATCHED")?;
            true
        };

        // `BY SOURCE` / `BY TARGET` qualifiers on NOT MATCHED.
        let mut by_source = false;
        if !matched && self.match_token(TokenType::By) {
            if self.match_soft_keyword("SOURCE") {
                by_source = true;
            } else if !self.match_soft_keyword("TARGET") {
                return Err(self.error_here("expected SOURCE or TARGET after BY"));
            }
        }

        let condition = if self.match_token(TokenType::And) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenType::Then, "THEN in WHEN clause")?;

        let action = match self.peek_type() {
            TokenType::Update => {
                self.advance();
                self.expect(TokenType::Set, "SET after UPDATE")?;
                MergeAction::Update {
                    set: self.parse_set_clause()?,
                }
            }
            TokenType::Insert => {
                self.advance();
                let columns = if self.check(TokenType::LParen) {
                    self.parse_identifier_list("target column")?
                } else {
                    Vec::new()
                };
                let values = if self.match_token(TokenType::Default) {
                    self.expect(TokenType::Values, "VALUES after DEFAULT")?;
                    MergeInsertValues::DefaultValues
                } else {
                    self.expect(TokenType::Values, "VALUES in MERGE INSERT")?;
                    MergeInsertValues::Values(self.parse_values_row()?)
                };
                MergeAction::Insert { columns, values }
            }
            TokenType::Delete => {
                self.advance();
                MergeAction::Delete
            }
            TokenType::Do => {
                self.advance();
                self.expect(TokenType::Nothing, "NOTHING after DO")?;
                MergeAction::DoNothing
            }
            _ => {
                return Err(self.error_here(format!(
                    "expected UPDATE, INSERT, DELETE, or DO NOTHING, found '{}'",
                    self.peek().text
                )))
            }
        };

        Ok(MergeWhenClause {
            matched,
            by_source,
            condition,
            action,
        })
    }

    /// Parse a plain `name [AS alias]` target (UPDATE/DELETE/MERGE).
    fn parse_update_target(&mut self) -> Result<TableSource> {
        let name = self.parse_qualified_name("table name")?;
        let alias = if self.match_token(TokenType::As) {
            Some(TableAlias {
                name: self.parse_identifier("alias after AS")?,
                columns: Vec::new(),
            })
        } else if matches!(
            self.peek_type(),
            TokenType::Identifier | TokenType::QuotedIdentifier
        ) {
            Some(TableAlias {
                name: self.parse_identifier("alias")?,
                columns: Vec::new(),
            })
        } else {
            None
        };
        Ok(TableSource { name, alias })
    }

    /// Parse `column = expr|DEFAULT, ...`.
    fn parse_set_clause(&mut self) -> Result<SetClause> {
        let mut items = vec![self.parse_set_item()?];
        while self.match_token(TokenType::Comma) {
            items.push(self.parse_set_item()?);
        }
        Ok(SetClause { items })
    }

    fn parse_set_item(&mut self) -> Result<SetItem> {
        let column = self.parse_identifier("column name in SET")?;
        self.expect(TokenType::Eq, "'=' in SET assignment")?;
        let value = if self.match_token(TokenType::Default) {
            SetValue::Default
        } else {
            SetValue::Expr(self.parse_expression()?)
        };
        Ok(SetItem { column, value })
    }
}
