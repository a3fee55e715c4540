//! SQL generation from the AST
//!
//! The [`Generator`] renders a parsed (or programmatically built) statement
//! back to SQL text under a [`GeneratorConfig`]: keyword casing, identifier
//! quoting, comma placement, CTE layout, indentation, and bound-parameter
//! placeholder style. [`Generator::format`] additionally extracts the
//! parameter placeholders encountered during rendering into a positional or
//! named collection ([`Params`]).
//!
//! Positioned comments are re-emitted adjacent to their owning node, leading
//! comments first, in original relative order.
//!
//! Rendering inserts parentheses from operator precedence when a
//! programmatically built tree needs them; parenthesized expressions that
//! came from source text are explicit [`ValueExpr::Paren`] nodes and render
//! as written.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expressions::*;
use crate::helper::is_safe_identifier;
use crate::visitor::SqlVisitor;

/// Keyword rendering case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCase {
    #[default]
    Upper,
    Lower,
}

/// Identifier quoting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierQuoting {
    /// Quote exactly the identifiers that were quoted in the source.
    #[default]
    Preserve,
    /// Quote every identifier.
    Always,
    /// Quote only identifiers that need it (non-lowercase, special
    /// characters, or empty).
    Minimal,
}

/// Comma placement in multi-line lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommaStyle {
    #[default]
    Trailing,
    Leading,
}

/// CTE layout in pretty mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CteStyle {
    /// All CTEs on the WITH line.
    Inline,
    /// One CTE per line.
    #[default]
    PerLine,
}

/// Bound-parameter placeholder rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStyle {
    /// Re-emit each placeholder as it was written.
    #[default]
    Preserve,
    /// `$1`, `$2`, ... (explicit ordinals are kept; anonymous placeholders
    /// are numbered by occurrence).
    Dollar,
    /// `?`
    Question,
    /// `:name` (anonymous placeholders get synthesized names).
    Named,
}

/// Formatting options, consumed as a configuration object.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    pub keyword_case: KeywordCase,
    pub identifier_quoting: IdentifierQuoting,
    pub comma_style: CommaStyle,
    pub cte_style: CteStyle,
    pub parameter_style: ParameterStyle,
    /// Spaces per indent level in pretty mode.
    pub indent_width: usize,
    /// Multi-line output with one clause per line.
    pub pretty: bool,
}

impl GeneratorConfig {
    pub fn pretty() -> Self {
        Self {
            indent_width: 2,
            pretty: true,
            ..Self::default()
        }
    }
}

/// Parameters extracted while rendering, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Params {
    /// One entry per placeholder occurrence: the name, the explicit
    /// ordinal, or the occurrence number for anonymous placeholders.
    Positional(Vec<String>),
    /// Unique parameter names in first-encounter order.
    Named(Vec<String>),
}

/// The rendered SQL plus its extracted parameter collection.
#[derive(Debug, Clone)]
pub struct FormatResult {
    pub sql: String,
    pub params: Params,
}

/// Renders AST nodes to SQL text.
pub struct Generator {
    config: GeneratorConfig,
    sql: String,
    depth: usize,
    params: Vec<String>,
}

// Expression precedence mirror of the parser's table, used to decide where
// rendering must parenthesize.
const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_NOT: u8 = 3;
const PREC_IS: u8 = 4;
const PREC_CMP: u8 = 5;
const PREC_BETWEEN: u8 = 6;
const PREC_OTHER: u8 = 7;
const PREC_ADD: u8 = 8;
const PREC_MUL: u8 = 9;
const PREC_EXP: u8 = 10;
const PREC_UNARY: u8 = 11;
const PREC_ATOM: u8 = u8::MAX;

fn binary_precedence(op: &BinaryOperator) -> u8 {
    match op {
        BinaryOperator::Or => PREC_OR,
        BinaryOperator::And => PREC_AND,
        BinaryOperator::Eq
        | BinaryOperator::Neq
        | BinaryOperator::Lt
        | BinaryOperator::Lte
        | BinaryOperator::Gt
        | BinaryOperator::Gte => PREC_CMP,
        BinaryOperator::Is
        | BinaryOperator::IsNot
        | BinaryOperator::IsDistinctFrom
        | BinaryOperator::IsNotDistinctFrom => PREC_IS,
        BinaryOperator::Add | BinaryOperator::Sub => PREC_ADD,
        BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => PREC_MUL,
        BinaryOperator::Exp => PREC_EXP,
        BinaryOperator::Concat | BinaryOperator::Raw(_) => PREC_OTHER,
    }
}

fn set_operator_precedence(op: SetOperator) -> u8 {
    match op {
        SetOperator::Intersect | SetOperator::IntersectAll => 2,
        SetOperator::Union
        | SetOperator::UnionAll
        | SetOperator::Except
        | SetOperator::ExceptAll => 1,
    }
}

fn expr_precedence(expr: &ValueExpr) -> u8 {
    match expr {
        ValueExpr::Binary(b) => binary_precedence(&b.operator),
        ValueExpr::Unary(u) => match u.operator {
            UnaryOperator::Not => PREC_NOT,
            _ => PREC_UNARY,
        },
        ValueExpr::Between(_) | ValueExpr::In(_) | ValueExpr::Like(_) => PREC_BETWEEN,
        _ => PREC_ATOM,
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            sql: String::new(),
            depth: 0,
            params: Vec::new(),
        }
    }

    /// Render a statement with the default configuration.
    pub fn sql(statement: &Statement) -> Result<String> {
        Generator::default().generate(statement)
    }

    /// Render a statement to text only.
    pub fn generate(&mut self, statement: &Statement) -> Result<String> {
        Ok(self.format(statement)?.sql)
    }

    /// Render a statement and extract its bound parameters.
    pub fn format(&mut self, statement: &Statement) -> Result<FormatResult> {
        self.sql.clear();
        self.depth = 0;
        self.params.clear();

        self.visit_statement(statement)?;

        let params = match self.config.parameter_style {
            ParameterStyle::Named => {
                let mut names: Vec<String> = Vec::new();
                for identity in &self.params {
                    if !names.contains(identity) {
                        names.push(identity.clone());
                    }
                }
                Params::Named(names)
            }
            _ => Params::Positional(self.params.clone()),
        };
        Ok(FormatResult {
            sql: std::mem::take(&mut self.sql),
            params,
        })
    }

    // -- low-level emitters -------------------------------------------------

    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn kw(&mut self, keyword: &str) {
        match self.config.keyword_case {
            KeywordCase::Upper => self.sql.push_str(keyword),
            KeywordCase::Lower => self.sql.push_str(&keyword.to_lowercase()),
        }
    }

    fn space(&mut self) {
        self.sql.push(' ');
    }

    fn indent(&mut self) {
        let width = self.config.indent_width.max(1) * self.depth;
        for _ in 0..width {
            self.sql.push(' ');
        }
    }

    /// Separator before a clause keyword: newline in pretty mode, a single
    /// space otherwise.
    fn clause_sep(&mut self) {
        if self.config.pretty {
            self.sql.push('\n');
            self.indent();
        } else {
            self.space();
        }
    }

    /// Separator between list items, honoring the comma style.
    fn list_sep(&mut self) {
        if self.config.pretty {
            match self.config.comma_style {
                CommaStyle::Trailing => {
                    self.sql.push(',');
                    self.sql.push('\n');
                    self.indent();
                }
                CommaStyle::Leading => {
                    self.sql.push('\n');
                    self.indent();
                    self.sql.push_str(", ");
                }
            }
        } else {
            self.sql.push_str(", ");
        }
    }

    fn leading_comments(&mut self, comments: &[String]) {
        for comment in comments {
            self.push("/* ");
            self.push(comment);
            self.push(" */ ");
        }
    }

    fn trailing_comments(&mut self, comments: &[String]) {
        for comment in comments {
            self.push(" /* ");
            self.push(comment);
            self.push(" */");
        }
    }

    fn identifier(&mut self, identifier: &Identifier) {
        let quote = match self.config.identifier_quoting {
            IdentifierQuoting::Preserve => identifier.quoted,
            IdentifierQuoting::Always => true,
            IdentifierQuoting::Minimal => !is_safe_identifier(&identifier.name),
        };
        if quote {
            self.sql.push('"');
            self.sql.push_str(&identifier.name.replace('"', "\"\""));
            self.sql.push('"');
        } else {
            self.sql.push_str(&identifier.name);
        }
    }

    fn qualified_name(&mut self, name: &QualifiedName) {
        for (i, part) in name.parts.iter().enumerate() {
            if i > 0 {
                self.sql.push('.');
            }
            self.identifier(part);
        }
    }

    fn string_literal(&mut self, value: &str) {
        self.sql.push('\'');
        self.sql.push_str(&value.replace('\'', "''"));
        self.sql.push('\'');
    }

    // -- statements ---------------------------------------------------------

    fn fmt_statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Select(query) => self.fmt_query(query),
            Statement::Insert(insert) => self.fmt_insert(insert),
            Statement::Update(update) => self.fmt_update(update),
            Statement::Delete(delete) => self.fmt_delete(delete),
            Statement::Merge(merge) => self.fmt_merge(merge),
            Statement::CreateTable(create) => self.fmt_create_table(create),
            Statement::CreateIndex(create) => self.fmt_create_index(create),
            Statement::DropIndex(drop) => self.fmt_drop_index(drop),
            Statement::DropConstraint(drop) => self.fmt_drop_constraint(drop),
            Statement::Cluster(cluster) => self.fmt_cluster(cluster),
            Statement::Checkpoint(checkpoint) => self.fmt_checkpoint(checkpoint),
            Statement::Reindex(reindex) => self.fmt_reindex(reindex),
        }
    }

    fn fmt_query(&mut self, query: &SelectQuery) -> Result<()> {
        match query {
            SelectQuery::Simple(q) => self.fmt_simple_select(q),
            SelectQuery::Binary(q) => self.fmt_binary_select(q),
            SelectQuery::Values(q) => self.fmt_values(q),
        }
    }

    fn fmt_simple_select(&mut self, query: &SimpleSelectQuery) -> Result<()> {
        self.leading_comments(&query.leading_comments);
        if let Some(with) = &query.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }
        self.fmt_select_clause(&query.select)?;

        if let Some(from) = &query.from {
            self.clause_sep();
            self.fmt_from(from)?;
        }
        if let Some(where_clause) = &query.where_clause {
            self.clause_sep();
            self.fmt_where(where_clause)?;
        }
        if let Some(group_by) = &query.group_by {
            self.clause_sep();
            self.fmt_group_by(group_by)?;
        }
        if let Some(having) = &query.having {
            self.clause_sep();
            self.fmt_having(having)?;
        }
        if let Some(window) = &query.window {
            self.clause_sep();
            self.fmt_window_clause(window)?;
        }
        if let Some(order_by) = &query.order_by {
            self.clause_sep();
            self.fmt_order_by(order_by)?;
        }
        if let Some(limit) = &query.limit {
            self.clause_sep();
            self.fmt_limit(limit)?;
        }
        self.trailing_comments(&query.trailing_comments);
        Ok(())
    }

    fn fmt_binary_select(&mut self, query: &BinarySelectQuery) -> Result<()> {
        self.leading_comments(&query.leading_comments);
        if let Some(with) = &query.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }

        let prec = set_operator_precedence(query.operator);
        self.fmt_compound_operand(&query.left, prec, false)?;
        self.clause_sep();
        self.kw(query.operator.as_str());
        self.clause_sep();
        self.fmt_compound_operand(&query.right, prec, true)?;

        if let Some(order_by) = &query.order_by {
            self.clause_sep();
            self.fmt_order_by(order_by)?;
        }
        if let Some(limit) = &query.limit {
            self.clause_sep();
            self.fmt_limit(limit)?;
        }
        self.trailing_comments(&query.trailing_comments);
        Ok(())
    }

    fn fmt_compound_operand(
        &mut self,
        operand: &SelectQuery,
        parent_prec: u8,
        is_right: bool,
    ) -> Result<()> {
        let parens = match operand {
            SelectQuery::Binary(inner) => {
                let inner_prec = set_operator_precedence(inner.operator);
                inner_prec < parent_prec
                    || (inner_prec == parent_prec && is_right)
                    || inner.order_by.is_some()
                    || inner.limit.is_some()
            }
            SelectQuery::Simple(inner) => {
                inner.order_by.is_some() || inner.limit.is_some() || inner.with.is_some()
            }
            SelectQuery::Values(_) => false,
        };
        if parens {
            self.push("(");
            self.fmt_query(operand)?;
            self.push(")");
        } else {
            self.fmt_query(operand)?;
        }
        Ok(())
    }

    fn fmt_values(&mut self, query: &ValuesQuery) -> Result<()> {
        self.leading_comments(&query.leading_comments);
        if let Some(with) = &query.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }
        self.kw("VALUES");
        self.space();
        for (i, row) in query.rows.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push("(");
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    self.push(", ");
                }
                self.fmt_value(value)?;
            }
            self.push(")");
        }
        self.trailing_comments(&query.trailing_comments);
        Ok(())
    }

    // -- clauses ------------------------------------------------------------

    fn fmt_with(&mut self, with: &WithClause) -> Result<()> {
        self.leading_comments(&with.leading_comments);
        self.kw("WITH");
        if with.recursive {
            self.space();
            self.kw("RECURSIVE");
        }

        let per_line = self.config.pretty && self.config.cte_style == CteStyle::PerLine;
        for (i, table) in with.tables.iter().enumerate() {
            if i > 0 {
                self.sql.push(',');
            }
            if per_line {
                self.sql.push('\n');
                self.depth += 1;
                self.indent();
                self.depth -= 1;
            } else {
                self.space();
            }
            self.fmt_common_table(table)?;
        }
        Ok(())
    }

    fn fmt_common_table(&mut self, table: &CommonTable) -> Result<()> {
        self.leading_comments(&table.leading_comments);
        self.identifier(&table.name);
        if !table.column_aliases.is_empty() {
            self.push("(");
            for (i, column) in table.column_aliases.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.identifier(column);
            }
            self.push(")");
        }
        self.space();
        self.kw("AS");
        self.space();
        match table.materialized {
            Some(true) => {
                self.kw("MATERIALIZED");
                self.space();
            }
            Some(false) => {
                self.kw("NOT MATERIALIZED");
                self.space();
            }
            None => {}
        }
        self.push("(");
        self.fmt_nested_query(&table.query)?;
        self.push(")");
        Ok(())
    }

    /// Render a subordinate query compactly (subqueries and CTE bodies stay
    /// on one line even in pretty mode).
    fn fmt_nested_query(&mut self, query: &SelectQuery) -> Result<()> {
        let saved_pretty = self.config.pretty;
        self.config.pretty = false;
        let result = self.fmt_query(query);
        self.config.pretty = saved_pretty;
        result
    }

    fn fmt_select_clause(&mut self, select: &SelectClause) -> Result<()> {
        self.kw("SELECT");
        self.trailing_comments(&select.trailing_comments);
        match &select.distinct {
            Some(DistinctKind::Distinct) => {
                self.space();
                self.kw("DISTINCT");
            }
            Some(DistinctKind::DistinctOn(exprs)) => {
                self.space();
                self.kw("DISTINCT ON");
                self.push(" (");
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.fmt_value(expr)?;
                }
                self.push(")");
            }
            None => {}
        }

        if self.config.pretty {
            self.sql.push('\n');
            self.depth += 1;
            self.indent();
            for (i, item) in select.items.iter().enumerate() {
                if i > 0 {
                    self.list_sep();
                }
                self.fmt_select_item(item)?;
            }
            self.depth -= 1;
        } else {
            self.space();
            for (i, item) in select.items.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.fmt_select_item(item)?;
            }
        }
        Ok(())
    }

    fn fmt_select_item(&mut self, item: &SelectItem) -> Result<()> {
        self.leading_comments(&item.leading_comments);
        self.fmt_value(&item.expr)?;
        if let Some(alias) = &item.alias {
            self.space();
            self.kw("AS");
            self.space();
            self.identifier(alias);
        }
        self.trailing_comments(&item.trailing_comments);
        Ok(())
    }

    fn fmt_from(&mut self, from: &FromClause) -> Result<()> {
        self.leading_comments(&from.leading_comments);
        self.kw("FROM");
        self.space();
        self.fmt_source(&from.source)?;
        for join in &from.joins {
            self.fmt_join(join)?;
        }
        Ok(())
    }

    fn fmt_source(&mut self, source: &SourceExpr) -> Result<()> {
        match source {
            SourceExpr::Table(table) => {
                self.qualified_name(&table.name);
                self.fmt_table_alias(&table.alias)?;
            }
            SourceExpr::Subquery(subquery) => {
                if subquery.lateral {
                    self.kw("LATERAL");
                    self.space();
                }
                self.push("(");
                self.fmt_nested_query(&subquery.query)?;
                self.push(")");
                self.fmt_table_alias(&subquery.alias)?;
            }
            SourceExpr::Function(function) => {
                if function.lateral {
                    self.kw("LATERAL");
                    self.space();
                }
                self.fmt_function_call(&function.function)?;
                self.fmt_table_alias(&function.alias)?;
            }
            SourceExpr::Paren(paren) => {
                self.push("(");
                self.fmt_source(&paren.source)?;
                for join in &paren.joins {
                    self.fmt_join(join)?;
                }
                self.push(")");
            }
        }
        Ok(())
    }

    fn fmt_table_alias(&mut self, alias: &Option<TableAlias>) -> Result<()> {
        if let Some(alias) = alias {
            self.space();
            self.kw("AS");
            self.space();
            self.identifier(&alias.name);
            if !alias.columns.is_empty() {
                self.push("(");
                for (i, column) in alias.columns.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.identifier(column);
                }
                self.push(")");
            }
        }
        Ok(())
    }

    fn fmt_join(&mut self, join: &JoinClause) -> Result<()> {
        if join.join_type == JoinType::Comma {
            self.push(", ");
            self.fmt_source(&join.source)?;
            return Ok(());
        }

        self.clause_sep();
        self.leading_comments(&join.leading_comments);
        if join.natural {
            self.kw("NATURAL");
            self.space();
        }
        match join.join_type {
            JoinType::Inner => self.kw("JOIN"),
            JoinType::Left => self.kw("LEFT JOIN"),
            JoinType::Right => self.kw("RIGHT JOIN"),
            JoinType::Full => self.kw("FULL JOIN"),
            JoinType::Cross => self.kw("CROSS JOIN"),
            JoinType::Comma => unreachable!("handled above"),
        }
        self.space();
        self.fmt_source(&join.source)?;
        match &join.condition {
            Some(JoinCondition::On(condition)) => {
                self.space();
                self.kw("ON");
                self.space();
                self.fmt_value(condition)?;
            }
            Some(JoinCondition::Using(columns)) => {
                self.space();
                self.kw("USING");
                self.push(" (");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.identifier(column);
                }
                self.push(")");
            }
            None => {}
        }
        Ok(())
    }

    fn fmt_where(&mut self, where_clause: &WhereClause) -> Result<()> {
        self.leading_comments(&where_clause.leading_comments);
        self.kw("WHERE");
        self.space();
        self.fmt_value(&where_clause.condition)
    }

    fn fmt_group_by(&mut self, group_by: &GroupByClause) -> Result<()> {
        self.leading_comments(&group_by.leading_comments);
        self.kw("GROUP BY");
        self.space();
        for (i, item) in group_by.items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match item {
                GroupingElement::Expr(expr) => self.fmt_value(expr)?,
                GroupingElement::Rollup(exprs) => {
                    self.kw("ROLLUP");
                    self.fmt_paren_values(exprs)?;
                }
                GroupingElement::Cube(exprs) => {
                    self.kw("CUBE");
                    self.fmt_paren_values(exprs)?;
                }
                GroupingElement::GroupingSets(sets) => {
                    self.kw("GROUPING SETS");
                    self.push(" (");
                    for (j, set) in sets.iter().enumerate() {
                        if j > 0 {
                            self.push(", ");
                        }
                        self.fmt_paren_values(set)?;
                    }
                    self.push(")");
                }
            }
        }
        Ok(())
    }

    fn fmt_paren_values(&mut self, exprs: &[ValueExpr]) -> Result<()> {
        self.push("(");
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.fmt_value(expr)?;
        }
        self.push(")");
        Ok(())
    }

    fn fmt_having(&mut self, having: &HavingClause) -> Result<()> {
        self.leading_comments(&having.leading_comments);
        self.kw("HAVING");
        self.space();
        self.fmt_value(&having.condition)
    }

    fn fmt_window_clause(&mut self, window: &WindowClause) -> Result<()> {
        self.leading_comments(&window.leading_comments);
        self.kw("WINDOW");
        self.space();
        for (i, named) in window.windows.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.identifier(&named.name);
            self.space();
            self.kw("AS");
            self.push(" (");
            self.fmt_window_spec(&named.spec)?;
            self.push(")");
        }
        Ok(())
    }

    fn fmt_order_by(&mut self, order_by: &OrderByClause) -> Result<()> {
        self.leading_comments(&order_by.leading_comments);
        self.kw("ORDER BY");
        self.space();
        for (i, item) in order_by.items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.fmt_value(&item.expr)?;
            match item.direction {
                Some(SortDirection::Asc) => {
                    self.space();
                    self.kw("ASC");
                }
                Some(SortDirection::Desc) => {
                    self.space();
                    self.kw("DESC");
                }
                None => {}
            }
            match item.nulls {
                Some(NullsOrder::First) => {
                    self.space();
                    self.kw("NULLS FIRST");
                }
                Some(NullsOrder::Last) => {
                    self.space();
                    self.kw("NULLS LAST");
                }
                None => {}
            }
        }
        Ok(())
    }

    fn fmt_limit(&mut self, limit: &LimitClause) -> Result<()> {
        self.leading_comments(&limit.leading_comments);
        let mut first = true;
        if let Some(count) = &limit.count {
            self.kw("LIMIT");
            self.space();
            self.fmt_value(count)?;
            first = false;
        } else if limit.offset.is_none() {
            self.kw("LIMIT ALL");
            first = false;
        }
        if let Some(offset) = &limit.offset {
            if !first {
                self.clause_sep();
            }
            self.kw("OFFSET");
            self.space();
            self.fmt_value(offset)?;
        }
        Ok(())
    }

    fn fmt_returning(&mut self, returning: &ReturningClause) -> Result<()> {
        self.kw("RETURNING");
        self.space();
        for (i, item) in returning.items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.fmt_select_item(item)?;
        }
        Ok(())
    }

    // -- DML ----------------------------------------------------------------

    fn fmt_insert(&mut self, insert: &InsertQuery) -> Result<()> {
        self.leading_comments(&insert.leading_comments);
        if let Some(with) = &insert.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }
        self.kw("INSERT INTO");
        self.space();
        self.qualified_name(&insert.target);
        if !insert.columns.is_empty() {
            self.push(" (");
            for (i, column) in insert.columns.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.identifier(column);
            }
            self.push(")");
        }
        self.clause_sep();
        match &insert.source {
            InsertSource::Query(query) => self.fmt_nested_query(query)?,
            InsertSource::DefaultValues => self.kw("DEFAULT VALUES"),
        }
        if let Some(returning) = &insert.returning {
            self.clause_sep();
            self.fmt_returning(returning)?;
        }
        self.trailing_comments(&insert.trailing_comments);
        Ok(())
    }

    fn fmt_update(&mut self, update: &UpdateQuery) -> Result<()> {
        self.leading_comments(&update.leading_comments);
        if let Some(with) = &update.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }
        self.kw("UPDATE");
        self.space();
        self.qualified_name(&update.update.source.name);
        self.fmt_table_alias(&update.update.source.alias)?;
        self.clause_sep();
        self.kw("SET");
        self.space();
        self.fmt_set_items(&update.set)?;
        if let Some(from) = &update.from {
            self.clause_sep();
            self.fmt_from(from)?;
        }
        if let Some(where_clause) = &update.where_clause {
            self.clause_sep();
            self.fmt_where(where_clause)?;
        }
        if let Some(returning) = &update.returning {
            self.clause_sep();
            self.fmt_returning(returning)?;
        }
        self.trailing_comments(&update.trailing_comments);
        Ok(())
    }

    fn fmt_set_items(&mut self, set: &SetClause) -> Result<()> {
        for (i, item) in set.items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.identifier(&item.column);
            self.push(" = ");
            match &item.value {
                SetValue::Expr(expr) => self.fmt_value(expr)?,
                SetValue::Default => self.kw("DEFAULT"),
            }
        }
        Ok(())
    }

    fn fmt_delete(&mut self, delete: &DeleteQuery) -> Result<()> {
        self.leading_comments(&delete.leading_comments);
        if let Some(with) = &delete.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }
        self.kw("DELETE FROM");
        self.space();
        self.qualified_name(&delete.target.name);
        self.fmt_table_alias(&delete.target.alias)?;
        if let Some(using) = &delete.using {
            self.clause_sep();
            self.kw("USING");
            self.space();
            self.fmt_source(&using.source)?;
            for join in &using.joins {
                self.fmt_join(join)?;
            }
        }
        if let Some(where_clause) = &delete.where_clause {
            self.clause_sep();
            self.fmt_where(where_clause)?;
        }
        if let Some(returning) = &delete.returning {
            self.clause_sep();
            self.fmt_returning(returning)?;
        }
        self.trailing_comments(&delete.trailing_comments);
        Ok(())
    }

    fn fmt_merge(&mut self, merge: &MergeQuery) -> Result<()> {
        self.leading_comments(&merge.leading_comments);
        if let Some(with) = &merge.with {
            self.fmt_with(with)?;
            self.clause_sep();
        }
        self.kw("MERGE INTO");
        self.space();
        self.qualified_name(&merge.target.name);
        self.fmt_table_alias(&merge.target.alias)?;
        self.clause_sep();
        self.kw("USING");
        self.space();
        self.fmt_source(&merge.source)?;
        self.clause_sep();
        self.kw("ON");
        self.space();
        self.fmt_value(&merge.on)?;

        for when in &merge.when_clauses {
            self.clause_sep();
            self.fmt_merge_when(when)?;
        }
        self.trailing_comments(&merge.trailing_comments);
        Ok(())
    }

    fn fmt_merge_when(&mut self, when: &MergeWhenClause) -> Result<()> {
        self.kw("WHEN");
        self.space();
        if !when.matched {
            self.kw("NOT");
            self.space();
        }
        self.kw("MATCHED");
        if when.by_source {
            self.space();
            self.kw("BY SOURCE");
        }
        if let Some(condition) = &when.condition {
            self.space();
            self.kw("AND");
            self.space();
            self.fmt_value(condition)?;
        }
        self.space();
        self.kw("THEN");
        self.space();
        match &when.action {
            MergeAction::Update { set } => {
                self.kw("UPDATE SET");
                self.space();
                self.fmt_set_items(set)?;
            }
            MergeAction::Insert { columns, values } => {
                self.kw("INSERT");
                if !columns.is_empty() {
                    self.push(" (");
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.identifier(column);
                    }
                    self.push(")");
                }
                self.space();
                match values {
                    MergeInsertValues::Values(row) => {
                        self.kw("VALUES");
                        self.push(" (");
                        for (i, value) in row.iter().enumerate() {
                            if i > 0 {
                                self.push(", ");
                            }
                            self.fmt_value(value)?;
                        }
                        self.push(")");
                    }
                    MergeInsertValues::DefaultValues => self.kw("DEFAULT VALUES"),
                }
            }
            MergeAction::Delete => self.kw("DELETE"),
            MergeAction::DoNothing => self.kw("DO NOTHING"),
        }
        Ok(())
    }

    // -- DDL ----------------------------------------------------------------

    fn fmt_create_table(&mut self, create: &CreateTableQuery) -> Result<()> {
        self.leading_comments(&create.leading_comments);
        self.kw("CREATE");
        self.space();
        if create.temporary {
            self.kw("TEMPORARY");
            self.space();
        }
        self.kw("TABLE");
        self.space();
        if create.if_not_exists {
            self.kw("IF NOT EXISTS");
            self.space();
        }
        self.qualified_name(&create.name);

        if let Some(as_select) = &create.as_select {
            self.space();
            self.kw("AS");
            self.space();
            self.fmt_nested_query(as_select)?;
        } else {
            self.push(" (");
            let mut first = true;
            for column in &create.columns {
                if !first {
                    self.push(", ");
                }
                first = false;
                self.fmt_column_definition(column)?;
            }
            for constraint in &create.constraints {
                if !first {
                    self.push(", ");
                }
                first = false;
                self.fmt_table_constraint(constraint)?;
            }
            self.push(")");
        }
        self.trailing_comments(&create.trailing_comments);
        Ok(())
    }

    fn fmt_column_definition(&mut self, column: &ColumnDefinition) -> Result<()> {
        self.identifier(&column.name);
        self.space();
        self.fmt_type_name(&column.data_type)?;
        for constraint in &column.constraints {
            self.space();
            if let Some(name) = &constraint.name {
                self.kw("CONSTRAINT");
                self.space();
                self.identifier(name);
                self.space();
            }
            match &constraint.kind {
                ColumnConstraintKind::NotNull => self.kw("NOT NULL"),
                ColumnConstraintKind::Null => self.kw("NULL"),
                ColumnConstraintKind::PrimaryKey => self.kw("PRIMARY KEY"),
                ColumnConstraintKind::Unique => self.kw("UNIQUE"),
                ColumnConstraintKind::Default(expr) => {
                    self.kw("DEFAULT");
                    self.space();
                    self.fmt_value(expr)?;
                }
                ColumnConstraintKind::Check(expr) => {
                    self.kw("CHECK");
                    self.push(" (");
                    self.fmt_value(expr)?;
                    self.push(")");
                }
                ColumnConstraintKind::References(reference) => {
                    self.kw("REFERENCES");
                    self.space();
                    self.fmt_foreign_key_reference(reference)?;
                }
            }
        }
        Ok(())
    }

    fn fmt_table_constraint(&mut self, constraint: &TableConstraint) -> Result<()> {
        if let Some(name) = &constraint.name {
            self.kw("CONSTRAINT");
            self.space();
            self.identifier(name);
            self.space();
        }
        match &constraint.kind {
            TableConstraintKind::PrimaryKey(columns) => {
                self.kw("PRIMARY KEY");
                self.fmt_paren_identifiers(columns);
            }
            TableConstraintKind::Unique(columns) => {
                self.kw("UNIQUE");
                self.fmt_paren_identifiers(columns);
            }
            TableConstraintKind::Check(expr) => {
                self.kw("CHECK");
                self.push(" (");
                self.fmt_value(expr)?;
                self.push(")");
            }
            TableConstraintKind::ForeignKey { columns, reference } => {
                self.kw("FOREIGN KEY");
                self.fmt_paren_identifiers(columns);
                self.space();
                self.kw("REFERENCES");
                self.space();
                self.fmt_foreign_key_reference(reference)?;
            }
        }
        Ok(())
    }

    fn fmt_paren_identifiers(&mut self, columns: &[Identifier]) {
        self.push(" (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.identifier(column);
        }
        self.push(")");
    }

    fn fmt_foreign_key_reference(&mut self, reference: &ForeignKeyReference) -> Result<()> {
        self.qualified_name(&reference.table);
        if !reference.columns.is_empty() {
            self.fmt_paren_identifiers(&reference.columns);
        }
        if let Some(action) = reference.on_delete {
            self.space();
            self.kw("ON DELETE");
            self.space();
            self.fmt_referential_action(action);
        }
        if let Some(action) = reference.on_update {
            self.space();
            self.kw("ON UPDATE");
            self.space();
            self.fmt_referential_action(action);
        }
        Ok(())
    }

    fn fmt_referential_action(&mut self, action: ReferentialAction) {
        match action {
            ReferentialAction::NoAction => self.kw("NO ACTION"),
            ReferentialAction::Restrict => self.kw("RESTRICT"),
            ReferentialAction::Cascade => self.kw("CASCADE"),
            ReferentialAction::SetNull => self.kw("SET NULL"),
            ReferentialAction::SetDefault => self.kw("SET DEFAULT"),
        }
    }

    fn fmt_create_index(&mut self, create: &CreateIndexStatement) -> Result<()> {
        self.leading_comments(&create.leading_comments);
        self.kw("CREATE");
        self.space();
        if create.unique {
            self.kw("UNIQUE");
            self.space();
        }
        self.kw("INDEX");
        self.space();
        if create.concurrently {
            self.kw("CONCURRENTLY");
            self.space();
        }
        if create.if_not_exists {
            self.kw("IF NOT EXISTS");
            self.space();
        }
        if let Some(name) = &create.name {
            self.identifier(name);
            self.space();
        }
        self.kw("ON");
        self.space();
        self.qualified_name(&create.table);
        if let Some(method) = &create.method {
            self.space();
            self.kw("USING");
            self.space();
            self.identifier(method);
        }
        self.push(" (");
        for (i, column) in create.columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.fmt_value(&column.expr)?;
            match column.direction {
                Some(SortDirection::Asc) => {
                    self.space();
                    self.kw("ASC");
                }
                Some(SortDirection::Desc) => {
                    self.space();
                    self.kw("DESC");
                }
                None => {}
            }
            match column.nulls {
                Some(NullsOrder::First) => {
                    self.space();
                    self.kw("NULLS FIRST");
                }
                Some(NullsOrder::Last) => {
                    self.space();
                    self.kw("NULLS LAST");
                }
                None => {}
            }
        }
        self.push(")");
        if let Some(where_clause) = &create.where_clause {
            self.space();
            self.fmt_where(where_clause)?;
        }
        self.trailing_comments(&create.trailing_comments);
        Ok(())
    }

    fn fmt_drop_index(&mut self, drop: &DropIndexStatement) -> Result<()> {
        self.leading_comments(&drop.leading_comments);
        self.kw("DROP INDEX");
        self.space();
        if drop.concurrently {
            self.kw("CONCURRENTLY");
            self.space();
        }
        if drop.if_exists {
            self.kw("IF EXISTS");
            self.space();
        }
        for (i, name) in drop.names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.qualified_name(name);
        }
        self.fmt_drop_behavior(drop.behavior);
        self.trailing_comments(&drop.trailing_comments);
        Ok(())
    }

    fn fmt_drop_behavior(&mut self, behavior: Option<DropBehavior>) {
        match behavior {
            Some(DropBehavior::Cascade) => {
                self.space();
                self.kw("CASCADE");
            }
            Some(DropBehavior::Restrict) => {
                self.space();
                self.kw("RESTRICT");
            }
            None => {}
        }
    }

    fn fmt_drop_constraint(&mut self, drop: &DropConstraintStatement) -> Result<()> {
        self.leading_comments(&drop.leading_comments);
        self.kw("ALTER TABLE");
        self.space();
        self.qualified_name(&drop.table);
        self.space();
        self.kw("DROP CONSTRAINT");
        self.space();
        if drop.if_exists {
            self.kw("IF EXISTS");
            self.space();
        }
        self.identifier(&drop.name);
        self.fmt_drop_behavior(drop.behavior);
        self.trailing_comments(&drop.trailing_comments);
        Ok(())
    }

    fn fmt_cluster(&mut self, cluster: &ClusterStatement) -> Result<()> {
        self.leading_comments(&cluster.leading_comments);
        self.kw("CLUSTER");
        if let Some(table) = &cluster.table {
            self.space();
            self.qualified_name(table);
            if let Some(index) = &cluster.index {
                self.space();
                self.kw("USING");
                self.space();
                self.identifier(index);
            }
        }
        self.trailing_comments(&cluster.trailing_comments);
        Ok(())
    }

    fn fmt_checkpoint(&mut self, checkpoint: &CheckpointStatement) -> Result<()> {
        self.leading_comments(&checkpoint.leading_comments);
        self.kw("CHECKPOINT");
        self.trailing_comments(&checkpoint.trailing_comments);
        Ok(())
    }

    fn fmt_reindex(&mut self, reindex: &ReindexStatement) -> Result<()> {
        self.leading_comments(&reindex.leading_comments);
        self.kw("REINDEX");
        self.space();
        if reindex.concurrently {
            self.kw("CONCURRENTLY");
            self.space();
        }
        self.kw(reindex.target.as_str());
        self.space();
        self.qualified_name(&reindex.name);
        self.trailing_comments(&reindex.trailing_comments);
        Ok(())
    }

    // -- value expressions --------------------------------------------------

    fn fmt_value(&mut self, expr: &ValueExpr) -> Result<()> {
        match expr {
            ValueExpr::Literal(literal) => self.fmt_literal(literal),
            ValueExpr::TypedLiteral(literal) => {
                self.kw(&literal.type_name.to_uppercase());
                self.space();
                self.string_literal(&literal.value);
                Ok(())
            }
            ValueExpr::Column(column) => {
                self.qualified_name(&column.name);
                Ok(())
            }
            ValueExpr::Star(star) => {
                if let Some(qualifier) = &star.qualifier {
                    self.qualified_name(qualifier);
                    self.sql.push('.');
                }
                self.sql.push('*');
                Ok(())
            }
            ValueExpr::Parameter(parameter) => {
                self.fmt_parameter(parameter);
                Ok(())
            }
            ValueExpr::Binary(binary) => self.fmt_binary(binary),
            ValueExpr::Unary(unary) => self.fmt_unary(unary),
            ValueExpr::Function(call) => self.fmt_function_call(call),
            ValueExpr::Case(case) => self.fmt_case(case),
            ValueExpr::Cast(cast) => self.fmt_cast(cast),
            ValueExpr::Extract(extract) => {
                self.kw("EXTRACT");
                self.push("(");
                self.kw(&extract.field.to_uppercase());
                self.space();
                self.kw("FROM");
                self.space();
                self.fmt_value(&extract.source)?;
                self.push(")");
                Ok(())
            }
            ValueExpr::Between(between) => {
                self.fmt_operand(&between.operand, PREC_BETWEEN)?;
                if between.negated {
                    self.space();
                    self.kw("NOT");
                }
                self.space();
                self.kw("BETWEEN");
                self.space();
                self.fmt_operand(&between.low, PREC_BETWEEN + 1)?;
                self.space();
                self.kw("AND");
                self.space();
                self.fmt_operand(&between.high, PREC_BETWEEN + 1)
            }
            ValueExpr::In(in_expr) => {
                self.fmt_operand(&in_expr.operand, PREC_BETWEEN)?;
                if in_expr.negated {
                    self.space();
                    self.kw("NOT");
                }
                self.space();
                self.kw("IN");
                self.push(" (");
                match &in_expr.list {
                    InList::Values(values) => {
                        for (i, value) in values.iter().enumerate() {
                            if i > 0 {
                                self.push(", ");
                            }
                            self.fmt_value(value)?;
                        }
                    }
                    InList::Subquery(query) => self.fmt_nested_query(query)?,
                }
                self.push(")");
                Ok(())
            }
            ValueExpr::Like(like) => {
                self.fmt_operand(&like.operand, PREC_BETWEEN)?;
                if like.negated {
                    self.space();
                    self.kw("NOT");
                }
                self.space();
                self.kw(like.operator.as_str());
                self.space();
                self.fmt_operand(&like.pattern, PREC_BETWEEN + 1)?;
                if let Some(escape) = &like.escape {
                    self.space();
                    self.kw("ESCAPE");
                    self.space();
                    self.fmt_value(escape)?;
                }
                Ok(())
            }
            ValueExpr::Exists(exists) => {
                if exists.negated {
                    self.kw("NOT");
                    self.space();
                }
                self.kw("EXISTS");
                self.push(" (");
                self.fmt_nested_query(&exists.query)?;
                self.push(")");
                Ok(())
            }
            ValueExpr::Subquery(query) => {
                self.push("(");
                self.fmt_nested_query(query)?;
                self.push(")");
                Ok(())
            }
            ValueExpr::Paren(inner) => {
                self.push("(");
                self.fmt_value(inner)?;
                self.push(")");
                Ok(())
            }
            ValueExpr::Tuple(items) => {
                self.push("(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.fmt_value(item)?;
                }
                self.push(")");
                Ok(())
            }
            ValueExpr::Array(items) => {
                self.kw("ARRAY");
                self.push("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.fmt_value(item)?;
                }
                self.push("]");
                Ok(())
            }
            ValueExpr::Raw(raw) => {
                self.push(&raw.text);
                Ok(())
            }
        }
    }

    fn fmt_literal(&mut self, literal: &LiteralValue) -> Result<()> {
        match literal {
            LiteralValue::Number(text) => self.push(text),
            LiteralValue::String(text) => self.string_literal(text),
            LiteralValue::Boolean(true) => self.kw("TRUE"),
            LiteralValue::Boolean(false) => self.kw("FALSE"),
            LiteralValue::Null => self.kw("NULL"),
        }
        Ok(())
    }

    fn fmt_parameter(&mut self, parameter: &Parameter) {
        let occurrence = self.params.len() + 1;
        let identity = if let Some(name) = &parameter.name {
            name.clone()
        } else if let Some(ordinal) = parameter.ordinal {
            ordinal.to_string()
        } else {
            occurrence.to_string()
        };
        self.params.push(identity.clone());

        match self.config.parameter_style {
            ParameterStyle::Preserve => {
                if let Some(name) = &parameter.name {
                    self.sql.push(':');
                    self.sql.push_str(name);
                } else if let Some(ordinal) = parameter.ordinal {
                    self.sql.push('$');
                    self.sql.push_str(&ordinal.to_string());
                } else {
                    self.sql.push('?');
                }
            }
            ParameterStyle::Dollar => {
                self.sql.push('$');
                if let Some(ordinal) = parameter.ordinal {
                    self.sql.push_str(&ordinal.to_string());
                } else {
                    self.sql.push_str(&occurrence.to_string());
                }
            }
            ParameterStyle::Question => self.sql.push('?'),
            ParameterStyle::Named => {
                self.sql.push(':');
                if let Some(name) = &parameter.name {
                    self.sql.push_str(name);
                } else {
                    self.sql.push('p');
                    self.sql.push_str(&identity);
                }
            }
        }
    }

    /// Render an operand, parenthesizing when its precedence is lower than
    /// the context requires.
    fn fmt_operand(&mut self, operand: &ValueExpr, min_prec: u8) -> Result<()> {
        if expr_precedence(operand) < min_prec {
            self.push("(");
            self.fmt_value(operand)?;
            self.push(")");
            Ok(())
        } else {
            self.fmt_value(operand)
        }
    }

    fn fmt_binary(&mut self, binary: &BinaryExpression) -> Result<()> {
        let prec = binary_precedence(&binary.operator);
        self.fmt_operand(&binary.left, prec)?;
        self.space();
        match &binary.operator {
            BinaryOperator::Or
            | BinaryOperator::And
            | BinaryOperator::Is
            | BinaryOperator::IsNot
            | BinaryOperator::IsDistinctFrom
            | BinaryOperator::IsNotDistinctFrom => self.kw(binary.operator.as_str()),
            op => self.push(op.as_str()),
        }
        self.space();
        // Left-associative rendering: an equal-precedence tree on the right
        // needs parentheses to survive a reparse. `^` is right-associative,
        // so there the equal-precedence right operand stays bare.
        let right_min = if binary.operator == BinaryOperator::Exp {
            prec
        } else {
            prec + 1
        };
        self.fmt_operand(&binary.right, right_min)
    }

    fn fmt_unary(&mut self, unary: &UnaryExpression) -> Result<()> {
        match unary.operator {
            UnaryOperator::Not => {
                self.kw("NOT");
                self.space();
                self.fmt_operand(&unary.operand, PREC_NOT)
            }
            UnaryOperator::Minus => {
                self.push("-");
                self.fmt_operand(&unary.operand, PREC_UNARY)
            }
            UnaryOperator::Plus => {
                self.push("+");
                self.fmt_operand(&unary.operand, PREC_UNARY)
            }
            UnaryOperator::BitwiseNot => {
                self.push("~");
                self.fmt_operand(&unary.operand, PREC_UNARY)
            }
        }
    }

    fn fmt_function_call(&mut self, call: &FunctionCall) -> Result<()> {
        self.qualified_name(&call.name);
        self.push("(");
        if call.wildcard {
            self.sql.push('*');
        } else {
            if call.distinct {
                self.kw("DISTINCT");
                self.space();
            }
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.fmt_value(arg)?;
            }
            if let Some(order_by) = &call.order_by {
                self.space();
                self.fmt_order_by(order_by)?;
            }
        }
        self.push(")");

        if let Some(over) = &call.over {
            self.space();
            self.kw("OVER");
            match over {
                OverClause::WindowName(name) => {
                    self.space();
                    self.identifier(name);
                }
                OverClause::Spec(spec) => {
                    self.push(" (");
                    self.fmt_window_spec(spec)?;
                    self.push(")");
                }
            }
        }
        Ok(())
    }

    fn fmt_window_spec(&mut self, spec: &WindowSpec) -> Result<()> {
        let mut first = true;
        if let Some(base) = &spec.base_window {
            self.identifier(base);
            first = false;
        }
        if !spec.partition_by.is_empty() {
            if !first {
                self.space();
            }
            first = false;
            self.kw("PARTITION BY");
            self.space();
            for (i, expr) in spec.partition_by.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.fmt_value(expr)?;
            }
        }
        if let Some(order_by) = &spec.order_by {
            if !first {
                self.space();
            }
            first = false;
            self.fmt_order_by(order_by)?;
        }
        if let Some(frame) = &spec.frame {
            if !first {
                self.space();
            }
            match frame.unit {
                FrameUnit::Rows => self.kw("ROWS"),
                FrameUnit::Range => self.kw("RANGE"),
                FrameUnit::Groups => self.kw("GROUPS"),
            }
            self.space();
            if let Some(end) = &frame.end {
                self.kw("BETWEEN");
                self.space();
                self.fmt_frame_bound(&frame.start)?;
                self.space();
                self.kw("AND");
                self.space();
                self.fmt_frame_bound(end)?;
            } else {
                self.fmt_frame_bound(&frame.start)?;
            }
        }
        Ok(())
    }

    fn fmt_frame_bound(&mut self, bound: &FrameBound) -> Result<()> {
        match bound {
            FrameBound::UnboundedPreceding => self.kw("UNBOUNDED PRECEDING"),
            FrameBound::UnboundedFollowing => self.kw("UNBOUNDED FOLLOWING"),
            FrameBound::CurrentRow => self.kw("CURRENT ROW"),
            FrameBound::Preceding(expr) => {
                self.fmt_value(expr)?;
                self.space();
                self.kw("PRECEDING");
            }
            FrameBound::Following(expr) => {
                self.fmt_value(expr)?;
                self.space();
                self.kw("FOLLOWING");
            }
        }
        Ok(())
    }

    fn fmt_case(&mut self, case: &CaseExpression) -> Result<()> {
        self.kw("CASE");
        if let Some(operand) = &case.operand {
            self.space();
            self.fmt_value(operand)?;
        }
        for branch in &case.branches {
            self.space();
            self.kw("WHEN");
            self.space();
            self.fmt_value(&branch.condition)?;
            self.space();
            self.kw("THEN");
            self.space();
            self.fmt_value(&branch.result)?;
        }
        if let Some(else_result) = &case.else_result {
            self.space();
            self.kw("ELSE");
            self.space();
            self.fmt_value(else_result)?;
        }
        self.space();
        self.kw("END");
        Ok(())
    }

    fn fmt_cast(&mut self, cast: &CastExpression) -> Result<()> {
        if cast.postfix {
            self.fmt_operand(&cast.operand, PREC_UNARY + 1)?;
            self.push("::");
            self.fmt_type_name(&cast.target_type)
        } else {
            self.kw("CAST");
            self.push("(");
            self.fmt_value(&cast.operand)?;
            self.space();
            self.kw("AS");
            self.space();
            self.fmt_type_name(&cast.target_type)?;
            self.push(")");
            Ok(())
        }
    }

    fn fmt_type_name(&mut self, type_name: &TypeName) -> Result<()> {
        self.push(&type_name.name);
        if !type_name.modifiers.is_empty() {
            self.push("(");
            for (i, modifier) in type_name.modifiers.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.fmt_value(modifier)?;
            }
            self.push(")");
        }
        if type_name.array {
            self.push("[]");
        }
        Ok(())
    }
}

impl SqlVisitor for Generator {
    type Output = Result<()>;

    fn visit_statement(&mut self, statement: &Statement) -> Self::Output {
        self.fmt_statement(statement)
    }

    fn visit_query(&mut self, query: &SelectQuery) -> Self::Output {
        self.fmt_query(query)
    }

    fn visit_source(&mut self, source: &SourceExpr) -> Self::Output {
        self.fmt_source(source)
    }

    fn visit_value(&mut self, value: &ValueExpr) -> Self::Output {
        self.fmt_value(value)
    }
}

