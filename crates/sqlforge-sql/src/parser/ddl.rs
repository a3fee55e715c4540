//! DDL statement parsing
//!
//! CREATE TABLE switches between the classic column/constraint-list grammar
//! and `CREATE TABLE ... AS SELECT` based on the token that follows the
//! table name. ALTER TABLE is supported for DROP CONSTRAINT; other ALTER
//! actions surface as unsupported-construct errors rather than misparses.

use crate::error::{Error, Result};
use crate::expressions::{
    CheckpointStatement, ClusterStatement, ColumnConstraint, ColumnConstraintKind,
    ColumnDefinition, CreateIndexStatement, CreateTableQuery, DropBehavior,
    DropConstraintStatement, DropIndexStatement, ForeignKeyReference, IndexColumn, NullsOrder,
    ReferentialAction, ReindexStatement, ReindexTarget, SortDirection, Statement,
    TableConstraint, TableConstraintKind,
};
use crate::tokens::TokenType;

use super::Parser;

impl Parser {
    /// Parse `CREATE [TEMPORARY] TABLE [IF NOT EXISTS] name (...)` or
    /// `CREATE TABLE name AS query`.
    pub fn parse_create_table(&mut self) -> Result<Statement> {
        self.expect(TokenType::Create, "CREATE")?;
        let temporary = self.match_token(TokenType::Temporary);
        self.expect(TokenType::Table, "TABLE")?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name("table name")?;

        let mut query = CreateTableQuery {
            temporary,
            if_not_exists,
            name,
            columns: Vec::new(),
            constraints: Vec::new(),
            as_select: None,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        };

        match self.peek_type() {
            TokenType::LParen => {
                self.advance();
                loop {
                    if self.is_table_constraint_start() {
                        query.constraints.push(self.parse_table_constraint()?);
                    } else {
                        query.columns.push(self.parse_column_definition()?);
                    }
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }
                self.expect(TokenType::RParen, "')' closing column list")?;
            }
            TokenType::As => {
                self.advance();
                query.as_select = Some(self.parse_select_query()?);
            }
            _ => {
                return Err(self.error_here(format!(
                    "expected '(' or AS after table name, found '{}'",
                    self.peek().text
                )))
            }
        }
        Ok(Statement::CreateTable(Box::new(query)))
    }

    fn is_table_constraint_start(&self) -> bool {
        matches!(
            self.peek_type(),
            TokenType::Constraint
                | TokenType::Primary
                | TokenType::Foreign
                | TokenType::Check
        ) || (self.peek_type() == TokenType::Unique
            && self.peek_ahead_type(1) == TokenType::LParen)
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition> {
        let name = self.parse_identifier("column name")?;
        let data_type = self.parse_type_name()?;
        let mut constraints = Vec::new();
        while let Some(constraint) = self.parse_column_constraint()? {
            constraints.push(constraint);
        }
        Ok(ColumnDefinition {
            name,
            data_type,
            constraints,
        })
    }

    fn parse_column_constraint(&mut self) -> Result<Option<ColumnConstraint>> {
        let name = if self.match_token(TokenType::Constraint) {
            Some(self.parse_identifier("constraint name")?)
        } else {
            None
        };

        let kind = match self.peek_type() {
            TokenType::Not => {
                if self.peek_ahead_type(1) != TokenType::Null {
                    return Err(self.error_here("expected NULL after NOT"));
                }
                self.advance();
                self.advance();
                ColumnConstraintKind::NotNull
            }
            TokenType::Null => {
                self.advance();
                ColumnConstraintKind::Null
            }
            TokenType::Primary => {
                self.advance();
                self.expect(TokenType::Key, "KEY after PRIMARY")?;
                ColumnConstraintKind::PrimaryKey
            }
            TokenType::Unique => {
                self.advance();
                ColumnConstraintKind::Unique
            }
            TokenType::Default => {
                self.advance();
                ColumnConstraintKind::Default(self.parse_expression()?)
            }
            TokenType::Check => {
                self.advance();
                self.expect(TokenType::LParen, "'(' after CHECK")?;
                let condition = self.parse_expression()?;
                self.expect(TokenType::RParen, "')' closing CHECK")?;
                ColumnConstraintKind::Check(condition)
            }
            TokenType::References => {
                self.advance();
                ColumnConstraintKind::References(self.parse_foreign_key_reference()?)
            }
            _ => {
                if name.is_some() {
                    return Err(self.error_here("expected constraint after CONSTRAINT name"));
                }
                return Ok(None);
            }
        };
        Ok(Some(ColumnConstraint { name, kind }))
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint> {
        let name = if self.match_token(TokenType::Constraint) {
            Some(self.parse_identifier("constraint name")?)
        } else {
            None
        };

        let kind = match self.peek_type() {
            TokenType::Primary => {
                self.advance();
                self.expect(TokenType::Key, "KEY after PRIMARY")?;
                TableConstraintKind::PrimaryKey(self.parse_identifier_list("key column")?)
            }
            TokenType::Unique => {
                self.advance();
                TableConstraintKind::Unique(self.parse_identifier_list("unique column")?)
            }
            TokenType::Check => {
                self.advance();
                self.expect(TokenType::LParen, "'(' after CHECK")?;
                let condition = self.parse_expression()?;
                self.expect(TokenType::RParen, "')' closing CHECK")?;
                TableConstraintKind::Check(condition)
            }
            TokenType::Foreign => {
                self.advance();
                self.expect(TokenType::Key, "KEY after FOREIGN")?;
                let columns = self.parse_identifier_list("key column")?;
                self.expect(TokenType::References, "REFERENCES in foreign key")?;
                let reference = self.parse_foreign_key_reference()?;
                TableConstraintKind::ForeignKey { columns, reference }
            }
            _ => {
                return Err(self.error_here(format!(
                    "expected table constraint, found '{}'",
                    self.peek().text
                )))
            }
        };
        Ok(TableConstraint { name, kind })
    }

    fn parse_foreign_key_reference(&mut self) -> Result<ForeignKeyReference> {
        let table = self.parse_qualified_name("referenced table")?;
        let columns = if self.check(TokenType::LParen) {
            self.parse_identifier_list("referenced column")?
        } else {
            Vec::new()
        };

        let mut reference = ForeignKeyReference {
            table,
            columns,
            on_delete: None,
            on_update: None,
        };
        while self.check(TokenType::On) {
            self.advance();
            if self.match_token(TokenType::Delete) {
                reference.on_delete = Some(self.parse_referential_action()?);
            } else {
                self.expect(TokenType::Update, "DELETE or UPDATE after ON")?;
                reference.on_update = Some(self.parse_referential_action()?);
            }
        }
        Ok(reference)
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction> {
        match self.peek_type() {
            TokenType::Cascade => {
                self.advance();
                Ok(ReferentialAction::Cascade)
            }
            TokenType::Restrict => {
                self.advance();
                Ok(ReferentialAction::Restrict)
            }
            TokenType::No => {
                self.advance();
                self.expect(TokenType::Action, "ACTION after NO")?;
                Ok(ReferentialAction::NoAction)
            }
            TokenType::Set => {
                self.advance();
                if self.match_token(TokenType::Null) {
                    Ok(ReferentialAction::SetNull)
                } else {
                    self.expect(TokenType::Default, "NULL or DEFAULT after SET")?;
                    Ok(ReferentialAction::SetDefault)
                }
            }
            _ => Err(self.error_here(format!(
                "expected referential action, found '{}'",
                self.peek().text
            ))),
        }
    }

    /// Parse `CREATE [UNIQUE] INDEX [CONCURRENTLY] [IF NOT EXISTS] [name]
    /// ON table [USING method] (columns) [WHERE predicate]`.
    pub fn parse_create_index(&mut self) -> Result<Statement> {
        self.expect(TokenType::Create, "CREATE")?;
        let unique = self.match_token(TokenType::Unique);
        self.expect(TokenType::Index, "INDEX")?;
        let concurrently = self.match_token(TokenType::Concurrently);
        let if_not_exists = self.parse_if_not_exists()?;

        let name = if matches!(
            self.peek_type(),
            TokenType::Identifier | TokenType::QuotedIdentifier
        ) {
            Some(self.parse_identifier("index name")?)
        } else {
            None
        };
        self.expect(TokenType::On, "ON in CREATE INDEX")?;
        let table = self.parse_qualified_name("table name")?;

        let method = if self.match_token(TokenType::Using) {
            Some(self.parse_identifier("index method")?)
        } else {
            None
        };

        self.expect(TokenType::LParen, "'(' opening index column list")?;
        let mut columns = vec![self.parse_index_column()?];
        while self.match_token(TokenType::Comma) {
            columns.push(self.parse_index_column()?);
        }
        self.expect(TokenType::RParen, "')' closing index column list")?;

        let where_clause = if self.check(TokenType::Where) {
            Some(self.parse_where_clause()?)
        } else {
            None
        };

        Ok(Statement::CreateIndex(Box::new(CreateIndexStatement {
            unique,
            concurrently,
            if_not_exists,
            name,
            table,
            method,
            columns,
            where_clause,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    fn parse_index_column(&mut self) -> Result<IndexColumn> {
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
        Ok(IndexColumn {
            expr,
            direction,
            nulls,
        })
    }

    /// Parse `DROP INDEX [CONCURRENTLY] [IF EXISTS] name, ...
    /// [CASCADE|RESTRICT]`.
    pub fn parse_drop_index(&mut self) -> Result<Statement> {
        self.expect(TokenType::Drop, "DROP")?;
        self.expect(TokenType::Index, "INDEX")?;
        let concurrently = self.match_token(TokenType::Concurrently);
        let if_exists = self.parse_if_exists()?;

        let mut names = vec![self.parse_qualified_name("index name")?];
        while self.match_token(TokenType::Comma) {
            names.push(self.parse_qualified_name("index name")?);
        }
        let behavior = self.parse_drop_behavior();

        Ok(Statement::DropIndex(Box::new(DropIndexStatement {
            concurrently,
            if_exists,
            names,
            behavior,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    /// Parse `ALTER TABLE name DROP CONSTRAINT [IF EXISTS] name
    /// [CASCADE|RESTRICT]`. Other ALTER TABLE actions are unsupported.
    pub fn parse_alter_table(&mut self) -> Result<Statement> {
        self.expect(TokenType::Alter, "ALTER")?;
        self.expect(TokenType::Table, "TABLE after ALTER")?;
        let table = self.parse_qualified_name("table name")?;

        if !self.check(TokenType::Drop) {
            return Err(Error::unsupported(format!(
                "ALTER TABLE {}",
                self.peek().text.to_uppercase()
            )));
        }
        self.advance(); // DROP
        if !self.check(TokenType::Constraint) {
            return Err(Error::unsupported(format!(
                "ALTER TABLE DROP {}",
                self.peek().text.to_uppercase()
            )));
        }
        self.advance(); // CONSTRAINT
        let if_exists = self.parse_if_exists()?;
        let name = self.parse_identifier("constraint name")?;
        let behavior = self.parse_drop_behavior();

        Ok(Statement::DropConstraint(Box::new(
            DropConstraintStatement {
                table,
                if_exists,
                name,
                behavior,
                leading_comments: Vec::new(),
                trailing_comments: Vec::new(),
            },
        )))
    }

    /// Parse `CLUSTER [table [USING index]]`.
    pub fn parse_cluster(&mut self) -> Result<Statement> {
        self.expect(TokenType::Cluster, "CLUSTER")?;
        let mut statement = ClusterStatement {
            table: None,
            index: None,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        };
        if matches!(
            self.peek_type(),
            TokenType::Identifier | TokenType::QuotedIdentifier
        ) {
            statement.table = Some(self.parse_qualified_name("table name")?);
            if self.match_token(TokenType::Using) {
                statement.index = Some(self.parse_identifier("index name")?);
            }
        }
        Ok(Statement::Cluster(Box::new(statement)))
    }

    pub fn parse_checkpoint(&mut self) -> Result<Statement> {
        self.expect(TokenType::Checkpoint, "CHECKPOINT")?;
        Ok(Statement::Checkpoint(CheckpointStatement::default()))
    }

    /// Parse `REINDEX [CONCURRENTLY] INDEX|TABLE|SCHEMA|DATABASE name`.
    pub fn parse_reindex(&mut self) -> Result<Statement> {
        self.expect(TokenType::Reindex, "REINDEX")?;
        let concurrently = self.match_token(TokenType::Concurrently);
        let target = match self.peek_type() {
            TokenType::Index => ReindexTarget::Index,
            TokenType::Table => ReindexTarget::Table,
            TokenType::Schema => ReindexTarget::Schema,
            TokenType::Database => ReindexTarget::Database,
            _ => {
                return Err(self.error_here(format!(
                    "expected INDEX, TABLE, SCHEMA, or DATABASE, found '{}'",
                    self.peek().text
                )))
            }
        };
        self.advance();
        let name = self.parse_qualified_name("reindex target name")?;

        Ok(Statement::Reindex(Box::new(ReindexStatement {
            concurrently,
            target,
            name,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        })))
    }

    // -- shared helpers -----------------------------------------------------

    fn parse_if_not_exists(&mut self) -> Result<bool> {
        if self.check(TokenType::If) {
            self.advance();
            self.expect(TokenType::Not, "NOT after IF")?;
            self.expect(TokenType::Exists, "EXISTS after IF NOT")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool> {
        if self.check(TokenType::If) {
            self.advance();
            self.expect(TokenType::Exists, "EXISTS after IF")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_drop_behavior(&mut self) -> Option<DropBehavior> {
        if self.match_token(TokenType::Cascade) {
            Some(DropBehavior::Cascade)
        } else if self.match_token(TokenType::Restrict) {
            Some(DropBehavior::Restrict)
        } else {
            None
        }
    }
}
