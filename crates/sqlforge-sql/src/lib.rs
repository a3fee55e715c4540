//! sqlforge-sql - SQL parsing, AST modeling, and formatting toolkit
//!
//! This library turns raw SQL text into a typed, mutable abstract syntax
//! tree, lets callers analyze and rewrite that tree, and serializes it back
//! to SQL text under configurable formatting rules.
//!
//! # Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Tokenizer** - Converts the SQL string to a token stream, attaching
//!    comments to neighboring tokens so their placement survives round-trips
//! 2. **Parser** - Builds the AST from tokens (recursive descent with
//!    precedence climbing for expressions)
//! 3. **Generator** - Converts the AST back to SQL text, optionally
//!    extracting bound-parameter placeholders
//!
//! Analysis passes ([`traversal`], [`cursor`]) consume the tree through the
//! same per-variant dispatch the generator uses, so the compiler flags every
//! consumer when a node kind is added.
//!
//! # Example
//!
//! ```
//! use sqlforge_sql::{parse, Generator};
//!
//! let ast = parse("select id, name from users where active = true").unwrap();
//! assert_eq!(
//!     Generator::sql(&ast).unwrap(),
//!     "SELECT id, name FROM users WHERE active = TRUE"
//! );
//! ```

pub mod cursor;
pub mod error;
pub mod expressions;
pub mod generator;
pub mod helper;
pub mod parser;
pub mod tokens;
pub mod traversal;
pub mod visitor;

pub use cursor::{scope_at, CursorScope};
pub use error::{Error, Result};
pub use expressions::{SelectQuery, SourceExpr, Statement, ValueExpr};
pub use generator::{
    CommaStyle, CteStyle, FormatResult, Generator, GeneratorConfig, IdentifierQuoting,
    KeywordCase, ParameterStyle, Params,
};
pub use helper::{csv, is_safe_identifier};
pub use parser::{ParseReport, Parser};
pub use tokens::{token_at_offset, tokenize, Span, Token, TokenType, Tokenizer, TokenizerConfig};
pub use traversal::{
    bfs, cte_dependencies, collect_columns, collect_parameters, collect_tables,
    contains_aggregate, contains_subquery, dfs, is_aggregate, is_column, is_function, is_literal,
    is_parameter, is_subquery, is_window_function, BfsIter, DfsIter, NodeRef,
};
pub use visitor::SqlVisitor;

/// Parse a single SQL statement.
///
/// A trailing semicolon is allowed; anything further is an error. See
/// [`Parser::parse_sql`].
pub fn parse(sql: &str) -> Result<Statement> {
    Parser::parse_sql(sql)
}

/// Parse a sequence of semicolon-separated statements, failing fast on the
/// first error. See [`Parser::parse_many`].
///
/// ```
/// use sqlforge_sql::parse_many;
///
/// let statements = parse_many("SELECT 1; SELECT 2;").unwrap();
/// assert_eq!(statements.len(), 2);
/// ```
pub fn parse_many(sql: &str) -> Result<Vec<Statement>> {
    Parser::parse_many(sql)
}
