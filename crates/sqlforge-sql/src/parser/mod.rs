//! SQL parsers
//!
//! The [`Parser`] owns the token vector and a cursor position. Every
//! `parse_*` method consumes tokens from the current position and leaves the
//! cursor on the first token it does not claim, so statement parsers can be
//! embedded inside one another (CTE bodies, `INSERT ... SELECT`, scalar
//! subqueries) without re-tokenizing. The advanced cursor is observable via
//! [`Parser::index`].
//!
//! Submodules:
//! - `expressions` -- precedence-climbing value-expression parser
//! - `clauses` -- per-clause parsers (SELECT list, FROM/JOIN, WITH, ...)
//! - `select` -- simple/compound/VALUES queries
//! - `dml` -- INSERT, UPDATE, DELETE, MERGE
//! - `ddl` -- CREATE TABLE, index DDL, CLUSTER, CHECKPOINT, REINDEX

mod clauses;
mod ddl;
mod dml;
mod expressions;
mod select;

use crate::error::{Error, Result};
use crate::expressions::{Identifier, QualifiedName, Statement};
use crate::tokens::{tokenize, Token, TokenType};

/// Outcome of a best-effort multi-statement parse.
///
/// `statements` holds every segment that parsed; `errors` holds one entry per
/// failing segment, each carrying the segment's absolute source position.
#[derive(Debug)]
pub struct ParseReport {
    pub statements: Vec<Statement>,
    pub errors: Vec<Error>,
}

impl ParseReport {
    /// Whether every segment parsed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Recursive-descent SQL parser over a token vector.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
}

impl Parser {
    /// Create a parser over an already-tokenized stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Tokenize `sql` and create a parser over it.
    pub fn from_sql(sql: &str) -> Result<Self> {
        Ok(Self::new(tokenize(sql)?))
    }

    /// Parse exactly one statement. A trailing semicolon is allowed; any
    /// other trailing token is an error.
    pub fn parse_sql(sql: &str) -> Result<Statement> {
        let mut parser = Self::from_sql(sql)?;
        let statement = parser.parse_statement()?;
        while parser.match_token(TokenType::Semicolon) {}
        if !parser.at_end() {
            return Err(parser.error_here(format!(
                "unexpected token '{}' after statement",
                parser.peek().text
            )));
        }
        Ok(statement)
    }

    /// Parse a sequence of semicolon-separated statements, failing fast on
    /// the first error. A semicolon inside a string literal or nested
    /// parentheses never splits a statement.
    pub fn parse_many(sql: &str) -> Result<Vec<Statement>> {
        let mut parser = Self::from_sql(sql)?;
        let mut statements = Vec::new();
        loop {
            while parser.match_token(TokenType::Semicolon) {}
            if parser.at_end() {
                break;
            }
            statements.push(parser.parse_statement()?);
            if !parser.at_end() && !parser.check(TokenType::Semicolon) {
                return Err(parser.error_here(format!(
                    "unexpected token '{}' after statement",
                    parser.peek().text
                )));
            }
        }
        Ok(statements)
    }

    /// Best-effort variant of [`parse_many`](Self::parse_many): collects the
    /// result or error of every segment instead of aborting. After a failing
    /// segment the parser resynchronizes at the next top-level semicolon.
    pub fn parse_report(sql: &str) -> ParseReport {
        let mut report = ParseReport {
            statements: Vec::new(),
            errors: Vec::new(),
        };
        let mut parser = match Self::from_sql(sql) {
            Ok(parser) => parser,
            Err(err) => {
                report.errors.push(err);
                return report;
            }
        };
        loop {
            while parser.match_token(TokenType::Semicolon) {}
            if parser.at_end() {
                break;
            }
            match parser.parse_statement() {
                Ok(statement) => {
                    if parser.at_end() || parser.check(TokenType::Semicolon) {
                        report.statements.push(statement);
                    } else {
                        report.errors.push(parser.error_here(format!(
                            "unexpected token '{}' after statement",
                            parser.peek().text
                        )));
                        parser.synchronize();
                    }
                }
                Err(err) => {
                    report.errors.push(err);
                    parser.synchronize();
                }
            }
        }
        report
    }

    /// Skip ahead to the next top-level semicolon (or end of input).
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.peek_type() {
                TokenType::LParen => depth += 1,
                TokenType::RParen => depth = depth.saturating_sub(1),
                TokenType::Semicolon if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Dispatch on the leading keyword and parse one statement.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let leading = if self.check(TokenType::With) {
            // Header comments before WITH belong to the with clause.
            Vec::new()
        } else {
            self.take_leading_comments()
        };

        let mut statement = self.dispatch_statement()?;

        let trailing = self.take_last_trailing_comments();
        attach_statement_comments(&mut statement, leading, trailing);
        Ok(statement)
    }

    fn dispatch_statement(&mut self) -> Result<Statement> {
        match self.peek_type() {
            TokenType::With => {
                let with = self.parse_with_clause()?;
                match self.peek_type() {
                    TokenType::Select | TokenType::LParen | TokenType::Values => {
                        let query = self.parse_query_body(Some(with))?;
                        Ok(Statement::Select(Box::new(query)))
                    }
                    TokenType::Insert => self.parse_insert(Some(with)),
                    TokenType::Update => self.parse_update(Some(with)),
                    TokenType::Delete => self.parse_delete(Some(with)),
                    TokenType::Merge => self.parse_merge(Some(with)),
                    _ => Err(self.error_here(format!(
                        "expected SELECT, INSERT, UPDATE, DELETE, or MERGE after WITH, found '{}'",
                        self.peek().text
                    ))),
                }
            }
            TokenType::Select | TokenType::LParen | TokenType::Values => {
                let query = self.parse_select_query()?;
                Ok(Statement::Select(Box::new(query)))
            }
            TokenType::Insert => self.parse_insert(None),
            TokenType::Update => self.parse_update(None),
            TokenType::Delete => self.parse_delete(None),
            TokenType::Merge => self.parse_merge(None),
            TokenType::Create => self.dispatch_create(),
            TokenType::Drop => self.dispatch_drop(),
            TokenType::Alter => self.parse_alter_table(),
            TokenType::Cluster => self.parse_cluster(),
            TokenType::Checkpoint => self.parse_checkpoint(),
            TokenType::Reindex => self.parse_reindex(),
            TokenType::Eof => Err(self.error_here("unexpected end of input, expected a statement")),
            _ => Err(self.error_here(format!(
                "unrecognized statement keyword '{}'",
                self.peek().text
            ))),
        }
    }

    fn dispatch_create(&mut self) -> Result<Statement> {
        // Look past CREATE without consuming it.
        match self.peek_ahead_type(1) {
            TokenType::Table | TokenType::Temporary => self.parse_create_table(),
            TokenType::Unique | TokenType::Index => self.parse_create_index(),
            _ => Err(Error::unsupported(format!(
                "CREATE {}",
                self.peek_ahead(1).text.to_uppercase()
            ))),
        }
    }

    fn dispatch_drop(&mut self) -> Result<Statement> {
        match self.peek_ahead_type(1) {
            TokenType::Index => self.parse_drop_index(),
            _ => Err(Error::unsupported(format!(
                "DROP {}",
                self.peek_ahead(1).text.to_uppercase()
            ))),
        }
    }

    // -- cursor helpers -----------------------------------------------------

    /// The cursor position (index of the next unconsumed token).
    pub fn index(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_type(&self) -> TokenType {
        self.peek().token_type
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn peek_ahead_type(&self, n: usize) -> TokenType {
        self.peek_ahead(n).token_type
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek_type() == TokenType::Eof
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.token_type != TokenType::Eof {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, token_type: TokenType) -> bool {
        self.peek_type() == token_type
    }

    pub(crate) fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, token_type: TokenType, what: &str) -> Result<Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else if self.at_end() {
            Err(self.error_here(format!("unexpected end of input, expected {}", what)))
        } else {
            Err(self.error_here(format!(
                "expected {}, found '{}'",
                what,
                self.peek().text
            )))
        }
    }

    /// Consume an identifier-valued token matching `keyword`
    /// case-insensitively (for unreserved words like `ZONE` or `SOURCE`).
    pub(crate) fn match_soft_keyword(&mut self, keyword: &str) -> bool {
        if self.check(TokenType::Identifier) && self.peek().text.eq_ignore_ascii_case(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> Error {
        let span = self.peek().span;
        Error::parse(message, span.line, span.column)
    }

    // -- comment helpers ----------------------------------------------------

    /// Take the leading comments of the next token (so they are attached to
    /// exactly one AST node).
    pub(crate) fn take_leading_comments(&mut self) -> Vec<String> {
        let idx = self.pos.min(self.tokens.len() - 1);
        std::mem::take(&mut self.tokens[idx].comments)
    }

    /// Take the trailing comments of the most recently consumed token.
    pub(crate) fn take_last_trailing_comments(&mut self) -> Vec<String> {
        if self.pos == 0 {
            return Vec::new();
        }
        std::mem::take(&mut self.tokens[self.pos - 1].trailing_comments)
    }

    // -- name helpers -------------------------------------------------------

    pub(crate) fn parse_identifier(&mut self, what: &str) -> Result<Identifier> {
        match self.peek_type() {
            TokenType::Identifier => Ok(Identifier::new(self.advance().text)),
            TokenType::QuotedIdentifier => Ok(Identifier::quoted(self.advance().text)),
            _ if self.at_end() => {
                Err(self.error_here(format!("unexpected end of input, expected {}", what)))
            }
            _ => Err(self.error_here(format!(
                "expected {}, found '{}'",
                what,
                self.peek().text
            ))),
        }
    }

    pub(crate) fn parse_qualified_name(&mut self, what: &str) -> Result<QualifiedName> {
        let mut parts = vec![self.parse_identifier(what)?];
        while self.check(TokenType::Dot)
            && matches!(
                self.peek_ahead_type(1),
                TokenType::Identifier | TokenType::QuotedIdentifier
            )
        {
            self.advance(); // .
            parts.push(self.parse_identifier(what)?);
        }
        Ok(QualifiedName::new(parts))
    }

    /// Parse a parenthesized, comma-separated identifier list.
    pub(crate) fn parse_identifier_list(&mut self, what: &str) -> Result<Vec<Identifier>> {
        self.expect(TokenType::LParen, "'('")?;
        let mut names = vec![self.parse_identifier(what)?];
        while self.match_token(TokenType::Comma) {
            names.push(self.parse_identifier(what)?);
        }
        self.expect(TokenType::RParen, "')'")?;
        Ok(names)
    }
}

/// Move statement-level comments onto the parsed node.
fn attach_statement_comments(statement: &mut Statement, leading: Vec<String>, trailing: Vec<String>) {
    use crate::expressions::SelectQuery;

    let (lead, trail): (&mut Vec<String>, &mut Vec<String>) = match statement {
        Statement::Select(query) => match query.as_mut() {
            SelectQuery::Simple(q) => (&mut q.leading_comments, &mut q.trailing_comments),
            SelectQuery::Binary(q) => (&mut q.leading_comments, &mut q.trailing_comments),
            SelectQuery::Values(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        },
        Statement::Insert(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::Update(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::Delete(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::Merge(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::CreateTable(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::CreateIndex(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::DropIndex(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::DropConstraint(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::Cluster(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::Checkpoint(q) => (&mut q.leading_comments, &mut q.trailing_comments),
        Statement::Reindex(q) => (&mut q.leading_comments, &mut q.trailing_comments),
    };
    lead.extend(leading);
    trail.extend(trailing);
}
