//! AST node types for SQL statements, clauses, and expressions
//!
//! The AST is organized as closed sum types per node family:
//!
//! - [`Statement`] -- one variant per statement kind (SELECT, INSERT, DDL, ...)
//! - [`SelectQuery`] -- simple, compound (UNION/INTERSECT/EXCEPT), and VALUES
//! - [`ValueExpr`] -- scalar/boolean expressions
//! - [`SourceExpr`] -- FROM-clause sources (tables, subqueries, functions)
//!
//! plus one struct per clause. The enum discriminant is the node's kind tag:
//! transformers dispatch with `match`, and the compiler flags every visitor
//! that misses a variant when a new one is added.
//!
//! Nodes where comment placement is meaningful carry `leading_comments` /
//! `trailing_comments` lists (comments written before / after the node, in
//! original order). The generator re-emits them adjacent to the node so that
//! comment placement survives parse -> transform -> format round-trips.
//!
//! Ownership is strictly tree-shaped. A query can embed another query as a
//! value (scalar subquery, CTE body, INSERT source) but never itself; CTE
//! references from FROM clauses are name-based lookups, and the
//! [`CommonTable`] object is owned exactly once by its [`WithClause`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "bindings")]
use ts_rs::TS;

fn is_false(v: &bool) -> bool {
    !*v
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// A SQL identifier (table name, column name, alias, ...).
///
/// The `quoted` flag records whether the identifier was delimited in the
/// source; the generator uses it to decide whether to emit quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct Identifier {
    /// The identifier text, without quoting characters.
    pub name: String,
    /// Whether the identifier was quoted in the source SQL.
    #[serde(default, skip_serializing_if = "is_false")]
    pub quoted: bool,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: false,
        }
    }

    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.name.replace('"', "\"\""))
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A possibly-qualified name (`a`, `a.b`, `a.b.c`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct QualifiedName {
    pub parts: Vec<Identifier>,
}

impl QualifiedName {
    pub fn new(parts: Vec<Identifier>) -> Self {
        Self { parts }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self {
            parts: vec![Identifier::new(name)],
        }
    }

    /// The last (least-qualified) part of the name.
    pub fn base(&self) -> &Identifier {
        self.parts.last().expect("qualified name has no parts")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Value expressions
// ---------------------------------------------------------------------------

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum LiteralValue {
    /// Numeric literal, kept as written (`42`, `1.5`, `1e-3`).
    Number(String),
    /// String literal content (unescaped).
    String(String),
    Boolean(bool),
    Null,
}

/// A literal qualified by a type keyword: `DATE '2024-01-01'`,
/// `INTERVAL '1 day'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct TypedLiteral {
    /// The type keyword as written (`DATE`, `INTERVAL`, ...).
    pub type_name: String,
    /// The literal content (unescaped, without quotes).
    pub value: String,
}

/// Opaque SQL text retained verbatim.
///
/// Used for dialect constructs the parser recognizes lexically but does not
/// model (bit/hex/dollar-quoted strings, exotic literal forms). Forward
/// compatibility policy: retain, never reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct RawString {
    pub text: String,
}

impl RawString {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A bound-parameter placeholder: `?`, `$1`, or `:name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct Parameter {
    /// Name for `:name` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ordinal for `$n` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
}

/// A column reference, possibly qualified (`col`, `t.col`, `s.t.col`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ColumnReference {
    pub name: QualifiedName,
}

/// A wildcard: `*` or `t.*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct StarExpr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<QualifiedName>,
}

/// Binary operators, including keyword operators and opaque dialect
/// operators retained as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Concat,
    Is,
    IsNot,
    IsDistinctFrom,
    IsNotDistinctFrom,
    /// Any operator the parser does not model, kept verbatim (`->`, `@>`,
    /// `&&`, vendor extensions).
    Raw(String),
}

impl BinaryOperator {
    /// Canonical SQL text of the operator. Keyword operators are uppercase.
    pub fn as_str(&self) -> &str {
        match self {
            BinaryOperator::Or => "OR",
            BinaryOperator::And => "AND",
            BinaryOperator::Eq => "=",
            BinaryOperator::Neq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Gte => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Exp => "^",
            BinaryOperator::Concat => "||",
            BinaryOperator::Is => "IS",
            BinaryOperator::IsNot => "IS NOT",
            BinaryOperator::IsDistinctFrom => "IS DISTINCT FROM",
            BinaryOperator::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
            BinaryOperator::Raw(text) => text,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `left operator right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct BinaryExpression {
    pub left: ValueExpr,
    pub operator: BinaryOperator,
    pub right: ValueExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
    BitwiseNot,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "NOT",
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::BitwiseNot => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: ValueExpr,
}

/// A function call, windowed when `over` is present.
///
/// Window function detection is syntactic: a call followed by `OVER` parses
/// into the same node with the window attached, so transformers distinguish
/// plain calls from window functions by checking `over`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct FunctionCall {
    pub name: QualifiedName,
    pub args: Vec<ValueExpr>,
    /// `COUNT(DISTINCT x)`
    #[serde(default, skip_serializing_if = "is_false")]
    pub distinct: bool,
    /// `COUNT(*)`
    #[serde(default, skip_serializing_if = "is_false")]
    pub wildcard: bool,
    /// In-call ordering: `STRING_AGG(x, ',' ORDER BY y)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<OverClause>,
}

impl FunctionCall {
    pub fn new(name: QualifiedName, args: Vec<ValueExpr>) -> Self {
        Self {
            name,
            args,
            distinct: false,
            wildcard: false,
            order_by: None,
            over: None,
        }
    }

    /// Whether this call carries a window specification.
    pub fn is_window_function(&self) -> bool {
        self.over.is_some()
    }
}

/// The `OVER` part of a window function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum OverClause {
    /// `OVER w` -- reference to a named window.
    WindowName(Identifier),
    /// `OVER (...)` -- inline specification.
    Spec(WindowSpec),
}

/// A window specification: `[base] [PARTITION BY ...] [ORDER BY ...] [frame]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct WindowSpec {
    /// Existing window this spec refines (`OVER (w ORDER BY x)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_window: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_by: Vec<ValueExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<WindowFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(ValueExpr),
    Following(ValueExpr),
}

/// `ROWS|RANGE|GROUPS [BETWEEN start AND end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct WindowFrame {
    pub unit: FrameUnit,
    pub start: FrameBound,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<FrameBound>,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CaseExpression {
    /// Present for the simple form (`CASE x WHEN 1 THEN ...`), absent for
    /// the searched form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<ValueExpr>,
    pub branches: Vec<CaseBranch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_result: Option<ValueExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CaseBranch {
    pub condition: ValueExpr,
    pub result: ValueExpr,
}

/// A type name with optional modifiers and array suffix
/// (`varchar(20)`, `numeric(10, 2)`, `timestamp with time zone`, `int[]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct TypeName {
    /// The type name as written, multi-word names joined by single spaces.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ValueExpr>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub array: bool,
}

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            array: false,
        }
    }
}

/// `CAST(x AS type)` or `x::type` (the `postfix` flag preserves which form
/// was written).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CastExpression {
    pub operand: ValueExpr,
    pub target_type: TypeName,
    #[serde(default, skip_serializing_if = "is_false")]
    pub postfix: bool,
}

/// `EXTRACT(field FROM source)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ExtractExpression {
    pub field: String,
    pub source: ValueExpr,
}

/// `operand [NOT] BETWEEN low AND high`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct BetweenExpression {
    pub operand: ValueExpr,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negated: bool,
    pub low: ValueExpr,
    pub high: ValueExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum InList {
    Values(Vec<ValueExpr>),
    Subquery(Box<SelectQuery>),
}

/// `operand [NOT] IN (...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct InExpression {
    pub operand: ValueExpr,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negated: bool,
    pub list: InList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum LikeOperator {
    Like,
    ILike,
    SimilarTo,
}

impl LikeOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeOperator::Like => "LIKE",
            LikeOperator::ILike => "ILIKE",
            LikeOperator::SimilarTo => "SIMILAR TO",
        }
    }
}

/// `operand [NOT] LIKE|ILIKE|SIMILAR TO pattern [ESCAPE e]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct LikeExpression {
    pub operand: ValueExpr,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negated: bool,
    pub operator: LikeOperator,
    pub pattern: ValueExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<ValueExpr>,
}

/// `[NOT] EXISTS (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ExistsExpression {
    #[serde(default, skip_serializing_if = "is_false")]
    pub negated: bool,
    pub query: SelectQuery,
}

/// A value expression -- anything that can appear where SQL expects a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum ValueExpr {
    Literal(LiteralValue),
    TypedLiteral(TypedLiteral),
    Column(ColumnReference),
    Star(StarExpr),
    Parameter(Parameter),
    Binary(Box<BinaryExpression>),
    Unary(Box<UnaryExpression>),
    Function(Box<FunctionCall>),
    Case(Box<CaseExpression>),
    Cast(Box<CastExpression>),
    Extract(Box<ExtractExpression>),
    Between(Box<BetweenExpression>),
    In(Box<InExpression>),
    Like(Box<LikeExpression>),
    Exists(Box<ExistsExpression>),
    /// A scalar subquery used as a value.
    Subquery(Box<SelectQuery>),
    /// A parenthesized expression, preserved for round-trip fidelity.
    Paren(Box<ValueExpr>),
    /// A row-value list: `(a, b, c)`.
    Tuple(Vec<ValueExpr>),
    /// `ARRAY[...]`
    Array(Vec<ValueExpr>),
    /// Opaque text retained verbatim.
    Raw(RawString),
}

impl ValueExpr {
    /// Convenience constructor for an unqualified column reference.
    pub fn column(name: impl Into<String>) -> Self {
        ValueExpr::Column(ColumnReference {
            name: QualifiedName::single(name),
        })
    }

    pub fn number(value: impl ToString) -> Self {
        ValueExpr::Literal(LiteralValue::Number(value.to_string()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ValueExpr::Literal(LiteralValue::String(value.into()))
    }

    pub fn null() -> Self {
        ValueExpr::Literal(LiteralValue::Null)
    }

    pub fn star() -> Self {
        ValueExpr::Star(StarExpr { qualifier: None })
    }

    pub fn binary(left: ValueExpr, operator: BinaryOperator, right: ValueExpr) -> Self {
        ValueExpr::Binary(Box::new(BinaryExpression {
            left,
            operator,
            right,
        }))
    }

    /// The kind tag of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            ValueExpr::Literal(_) => "Literal",
            ValueExpr::TypedLiteral(_) => "TypedLiteral",
            ValueExpr::Column(_) => "ColumnReference",
            ValueExpr::Star(_) => "Star",
            ValueExpr::Parameter(_) => "Parameter",
            ValueExpr::Binary(_) => "BinaryExpression",
            ValueExpr::Unary(_) => "UnaryExpression",
            ValueExpr::Function(_) => "FunctionCall",
            ValueExpr::Case(_) => "CaseExpression",
            ValueExpr::Cast(_) => "CastExpression",
            ValueExpr::Extract(_) => "ExtractExpression",
            ValueExpr::Between(_) => "BetweenExpression",
            ValueExpr::In(_) => "InExpression",
            ValueExpr::Like(_) => "LikeExpression",
            ValueExpr::Exists(_) => "ExistsExpression",
            ValueExpr::Subquery(_) => "ScalarSubquery",
            ValueExpr::Paren(_) => "ParenExpression",
            ValueExpr::Tuple(_) => "TupleExpression",
            ValueExpr::Array(_) => "ArrayExpression",
            ValueExpr::Raw(_) => "RawString",
        }
    }
}

// ---------------------------------------------------------------------------
// Source expressions
// ---------------------------------------------------------------------------

/// `AS alias [(col, ...)]` on a FROM-clause source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct TableAlias {
    pub name: Identifier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Identifier>,
}

impl TableAlias {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Identifier::new(name),
            columns: Vec::new(),
        }
    }
}

/// A table (or CTE, resolved by name) reference in FROM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct TableSource {
    pub name: QualifiedName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<TableAlias>,
}

impl TableSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::single(name),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(TableAlias::new(alias));
        self
    }
}

/// A subquery in FROM, optionally `LATERAL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct SubquerySource {
    #[serde(default, skip_serializing_if = "is_false")]
    pub lateral: bool,
    pub query: SelectQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<TableAlias>,
}

/// A set-returning function in FROM (`generate_series(...)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct FunctionSource {
    #[serde(default, skip_serializing_if = "is_false")]
    pub lateral: bool,
    pub function: FunctionCall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<TableAlias>,
}

/// A parenthesized join tree: `(a JOIN b ON ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ParenSource {
    pub source: SourceExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinClause>,
}

/// A FROM-clause source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum SourceExpr {
    Table(TableSource),
    Subquery(Box<SubquerySource>),
    Function(Box<FunctionSource>),
    Paren(Box<ParenSource>),
}

impl SourceExpr {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceExpr::Table(_) => "TableSource",
            SourceExpr::Subquery(_) => "SubquerySource",
            SourceExpr::Function(_) => "FunctionSource",
            SourceExpr::Paren(_) => "ParenSource",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    /// Comma-separated FROM item (`FROM a, b`).
    Comma,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum JoinCondition {
    On(ValueExpr),
    Using(Vec<Identifier>),
}

/// One join step. The condition always belongs to the join that immediately
/// precedes it in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct JoinClause {
    pub join_type: JoinType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub natural: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub lateral: bool,
    pub source: SourceExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<JoinCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// A WITH clause. Header comments written before `WITH` attach here, not to
/// the first CTE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct WithClause {
    #[serde(default, skip_serializing_if = "is_false")]
    pub recursive: bool,
    pub tables: Vec<CommonTable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

/// One `name [(cols)] AS [[NOT] MATERIALIZED] (query)` entry of a WITH
/// clause. Owned exactly once here; FROM-clause references are by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CommonTable {
    pub name: Identifier,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_aliases: Vec<Identifier>,
    /// `Some(true)` for `MATERIALIZED`, `Some(false)` for `NOT MATERIALIZED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materialized: Option<bool>,
    pub query: SelectQuery,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum DistinctKind {
    Distinct,
    DistinctOn(Vec<ValueExpr>),
}

/// One select-list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct SelectItem {
    pub expr: ValueExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

impl SelectItem {
    pub fn new(expr: ValueExpr) -> Self {
        Self {
            expr,
            alias: None,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(Identifier::new(alias));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct SelectClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct: Option<DistinctKind>,
    pub items: Vec<SelectItem>,
    /// Comments written directly after the SELECT keyword (hint position).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

impl SelectClause {
    pub fn new(items: Vec<SelectItem>) -> Self {
        Self {
            distinct: None,
            items,
            trailing_comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct FromClause {
    pub source: SourceExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct WhereClause {
    pub condition: ValueExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum GroupingElement {
    Expr(ValueExpr),
    Rollup(Vec<ValueExpr>),
    Cube(Vec<ValueExpr>),
    GroupingSets(Vec<Vec<ValueExpr>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct GroupByClause {
    pub items: Vec<GroupingElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct HavingClause {
    pub condition: ValueExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

/// `WINDOW name AS (spec)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct NamedWindow {
    pub name: Identifier,
    pub spec: WindowSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct WindowClause {
    pub windows: Vec<NamedWindow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct OrderByItem {
    pub expr: ValueExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct OrderByClause {
    pub items: Vec<OrderByItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

/// `LIMIT n [OFFSET m]` (either part may appear alone, in either order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct LimitClause {
    /// `None` means `LIMIT ALL` or an OFFSET-only clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<ValueExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<ValueExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ReturningClause {
    pub items: Vec<SelectItem>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A plain SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct SimpleSelectQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub select: SelectClause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<FromClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<HavingClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

impl SimpleSelectQuery {
    pub fn new(select: SelectClause) -> Self {
        Self {
            with: None,
            select,
            from: None,
            where_clause: None,
            group_by: None,
            having: None,
            window: None,
            order_by: None,
            limit: None,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

impl SetOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperator::Union => "UNION",
            SetOperator::UnionAll => "UNION ALL",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::IntersectAll => "INTERSECT ALL",
            SetOperator::Except => "EXCEPT",
            SetOperator::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// A compound query: `left UNION|INTERSECT|EXCEPT [ALL] right`.
///
/// ORDER BY / LIMIT written after the compound apply to the whole result and
/// live here, not on either operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct BinarySelectQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub left: SelectQuery,
    pub operator: SetOperator,
    pub right: SelectQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

/// A standalone `VALUES (...), (...)` query (also the row source of
/// `INSERT ... VALUES`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ValuesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub rows: Vec<Vec<ValueExpr>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

/// Any query that produces rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum SelectQuery {
    Simple(Box<SimpleSelectQuery>),
    Binary(Box<BinarySelectQuery>),
    Values(Box<ValuesQuery>),
}

impl SelectQuery {
    pub fn kind(&self) -> &'static str {
        match self {
            SelectQuery::Simple(_) => "SimpleSelectQuery",
            SelectQuery::Binary(_) => "BinarySelectQuery",
            SelectQuery::Values(_) => "ValuesQuery",
        }
    }

    /// The WITH clause of this query, if any.
    pub fn with_clause(&self) -> Option<&WithClause> {
        match self {
            SelectQuery::Simple(q) => q.with.as_ref(),
            SelectQuery::Binary(q) => q.with.as_ref(),
            SelectQuery::Values(q) => q.with.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// DML statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum InsertSource {
    /// `INSERT ... SELECT` or `INSERT ... VALUES` (a [`ValuesQuery`]).
    Query(SelectQuery),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct InsertQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub target: QualifiedName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Identifier>,
    pub source: InsertSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returning: Option<ReturningClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum SetValue {
    Expr(ValueExpr),
    Default,
}

/// One `column = value` assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct SetItem {
    pub column: Identifier,
    pub value: SetValue,
}

/// The SET assignment list of UPDATE / MERGE update actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct SetClause {
    pub items: Vec<SetItem>,
}

/// The UPDATE target (`UPDATE source SET ...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct UpdateClause {
    pub source: TableSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct UpdateQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub update: UpdateClause,
    pub set: SetClause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<FromClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returning: Option<ReturningClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct DeleteQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub target: TableSource,
    /// `USING` sources (additional tables joined for the predicate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using: Option<FromClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returning: Option<ReturningClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum MergeInsertValues {
    Values(Vec<ValueExpr>),
    DefaultValues,
}

/// The action of one WHEN clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum MergeAction {
    Update { set: SetClause },
    Insert {
        columns: Vec<Identifier>,
        values: MergeInsertValues,
    },
    Delete,
    DoNothing,
}

/// `WHEN [NOT] MATCHED [BY SOURCE] [AND condition] THEN action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct MergeWhenClause {
    pub matched: bool,
    /// `WHEN NOT MATCHED BY SOURCE`
    #[serde(default, skip_serializing_if = "is_false")]
    pub by_source: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ValueExpr>,
    pub action: MergeAction,
}

/// A MERGE statement. `when_clauses` preserves source order -- action
/// evaluation order is semantically significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct MergeQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithClause>,
    pub target: TableSource,
    pub source: SourceExpr,
    pub on: ValueExpr,
    pub when_clauses: Vec<MergeWhenClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

// ---------------------------------------------------------------------------
// DDL statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

/// `REFERENCES table [(cols)] [ON DELETE ...] [ON UPDATE ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ForeignKeyReference {
    pub table: QualifiedName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum ColumnConstraintKind {
    NotNull,
    Null,
    PrimaryKey,
    Unique,
    Default(ValueExpr),
    Check(ValueExpr),
    References(ForeignKeyReference),
}

/// `[CONSTRAINT name] <kind>` on a column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ColumnConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Identifier>,
    pub kind: ColumnConstraintKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum TableConstraintKind {
    PrimaryKey(Vec<Identifier>),
    Unique(Vec<Identifier>),
    Check(ValueExpr),
    ForeignKey {
        columns: Vec<Identifier>,
        reference: ForeignKeyReference,
    },
}

/// `[CONSTRAINT name] <kind>` at table level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct TableConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Identifier>,
    pub kind: TableConstraintKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ColumnDefinition {
    pub name: Identifier,
    pub data_type: TypeName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ColumnConstraint>,
}

/// `CREATE TABLE`, classic or `AS SELECT`. Exactly one of
/// `columns`/`constraints` and `as_select` is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CreateTableQuery {
    #[serde(default, skip_serializing_if = "is_false")]
    pub temporary: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub if_not_exists: bool,
    pub name: QualifiedName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<TableConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_select: Option<SelectQuery>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

/// One indexed column or expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct IndexColumn {
    pub expr: ValueExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CreateIndexStatement {
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub concurrently: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub if_not_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Identifier>,
    pub table: QualifiedName,
    /// `USING btree|gin|...`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Identifier>,
    pub columns: Vec<IndexColumn>,
    /// Partial index predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum DropBehavior {
    Cascade,
    Restrict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct DropIndexStatement {
    #[serde(default, skip_serializing_if = "is_false")]
    pub concurrently: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub if_exists: bool,
    pub names: Vec<QualifiedName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<DropBehavior>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

/// `ALTER TABLE t DROP CONSTRAINT [IF EXISTS] name [CASCADE|RESTRICT]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct DropConstraintStatement {
    pub table: QualifiedName,
    #[serde(default, skip_serializing_if = "is_false")]
    pub if_exists: bool,
    pub name: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<DropBehavior>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

/// `CLUSTER [table [USING index]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ClusterStatement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<QualifiedName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct CheckpointStatement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum ReindexTarget {
    Index,
    Table,
    Schema,
    Database,
}

impl ReindexTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReindexTarget::Index => "INDEX",
            ReindexTarget::Table => "TABLE",
            ReindexTarget::Schema => "SCHEMA",
            ReindexTarget::Database => "DATABASE",
        }
    }
}

/// `REINDEX [CONCURRENTLY] INDEX|TABLE|SCHEMA|DATABASE name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct ReindexStatement {
    #[serde(default, skip_serializing_if = "is_false")]
    pub concurrently: bool,
    pub target: ReindexTarget,
    pub name: QualifiedName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// Any parseable SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum Statement {
    Select(Box<SelectQuery>),
    Insert(Box<InsertQuery>),
    Update(Box<UpdateQuery>),
    Delete(Box<DeleteQuery>),
    Merge(Box<MergeQuery>),
    CreateTable(Box<CreateTableQuery>),
    CreateIndex(Box<CreateIndexStatement>),
    DropIndex(Box<DropIndexStatement>),
    DropConstraint(Box<DropConstraintStatement>),
    Cluster(Box<ClusterStatement>),
    Checkpoint(CheckpointStatement),
    Reindex(Box<ReindexStatement>),
}

impl Statement {
    /// The kind tag of this statement.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(q) => q.kind(),
            Statement::Insert(_) => "InsertQuery",
            Statement::Update(_) => "UpdateQuery",
            Statement::Delete(_) => "DeleteQuery",
            Statement::Merge(_) => "MergeQuery",
            Statement::CreateTable(_) => "CreateTableQuery",
            Statement::CreateIndex(_) => "CreateIndexStatement",
            Statement::DropIndex(_) => "DropIndexStatement",
            Statement::DropConstraint(_) => "DropConstraintStatement",
            Statement::Cluster(_) => "ClusterStatement",
            Statement::Checkpoint(_) => "CheckpointStatement",
            Statement::Reindex(_) => "ReindexStatement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn ast_survives_a_serde_round_trip() {
        let statement = Parser::parse_sql(
            "WITH a AS (SELECT 1) SELECT x, count(*) FROM a WHERE x BETWEEN $1 AND $2",
        )
        .expect("parse failed");
        let json = serde_json::to_string(&statement).expect("serialize failed");
        let back: Statement = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(statement, back);
    }

    #[test]
    fn empty_optional_fields_are_omitted_from_json() {
        let statement = Parser::parse_sql("SELECT 1").expect("parse failed");
        let json = serde_json::to_string(&statement).expect("serialize failed");
        assert!(!json.contains("with"), "unexpected field in: {}", json);
        assert!(!json.contains("leading_comments"), "unexpected field in: {}", json);
    }

    #[test]
    fn kind_tags_name_the_variant() {
        let cases = [
            ("SELECT 1", "SimpleSelectQuery"),
            ("SELECT 1 UNION SELECT 2", "BinarySelectQuery"),
            ("INSERT INTO t DEFAULT VALUES", "InsertQuery"),
            ("CHECKPOINT", "CheckpointStatement"),
        ];
        for (sql, kind) in cases {
            let statement = Parser::parse_sql(sql).expect("parse failed");
            assert_eq!(statement.kind(), kind, "for {:?}", sql);
        }
    }
}
