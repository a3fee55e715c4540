//! Tree traversal utilities for SQL ASTs
//!
//! Read-only traversal, search, and collection utilities over the node
//! families. [`children`] enumerates the children of any node explicitly per
//! variant -- there is no generic reflection -- so extending the AST forces
//! this module (and every other exhaustive consumer) to be revisited.
//!
//! Two iterators are provided: [`DfsIter`] (pre-order, stack-based) and
//! [`BfsIter`] (level-order, queue-based). Collectors build on them, except
//! [`collect_tables`], which tracks WITH-clause scopes during its walk so a
//! CTE reference is resolved to its definition and never reported as a
//! physical table.

use std::collections::{HashSet, VecDeque};

use crate::expressions::{
    FunctionCall, GroupingElement, InList, InsertSource, JoinClause, JoinCondition, MergeAction,
    MergeInsertValues, OverClause, QualifiedName, SelectItem, SelectQuery, SetValue, SourceExpr,
    Statement, ValueExpr, WindowSpec, WithClause,
};

/// A borrowed reference to any AST node family.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Statement(&'a Statement),
    Query(&'a SelectQuery),
    Source(&'a SourceExpr),
    Value(&'a ValueExpr),
}

impl<'a> From<&'a Statement> for NodeRef<'a> {
    fn from(statement: &'a Statement) -> Self {
        NodeRef::Statement(statement)
    }
}

impl<'a> From<&'a SelectQuery> for NodeRef<'a> {
    fn from(query: &'a SelectQuery) -> Self {
        NodeRef::Query(query)
    }
}

impl<'a> From<&'a ValueExpr> for NodeRef<'a> {
    fn from(value: &'a ValueExpr) -> Self {
        NodeRef::Value(value)
    }
}

impl<'a> From<&'a SourceExpr> for NodeRef<'a> {
    fn from(source: &'a SourceExpr) -> Self {
        NodeRef::Source(source)
    }
}

fn push_select_items<'a>(items: &'a [SelectItem], out: &mut Vec<NodeRef<'a>>) {
    for item in items {
        out.push(NodeRef::Value(&item.expr));
    }
}

fn push_with<'a>(with: &'a Option<WithClause>, out: &mut Vec<NodeRef<'a>>) {
    if let Some(with) = with {
        for table in &with.tables {
            out.push(NodeRef::Query(&table.query));
        }
    }
}

fn push_joins<'a>(joins: &'a [JoinClause], out: &mut Vec<NodeRef<'a>>) {
    for join in joins {
        out.push(NodeRef::Source(&join.source));
        if let Some(JoinCondition::On(condition)) = &join.condition {
            out.push(NodeRef::Value(condition));
        }
    }
}

fn push_window_spec<'a>(spec: &'a WindowSpec, out: &mut Vec<NodeRef<'a>>) {
    for expr in &spec.partition_by {
        out.push(NodeRef::Value(expr));
    }
    if let Some(order_by) = &spec.order_by {
        for item in &order_by.items {
            out.push(NodeRef::Value(&item.expr));
        }
    }
    if let Some(frame) = &spec.frame {
        for bound in [Some(&frame.start), frame.end.as_ref()].into_iter().flatten() {
            match bound {
                crate::expressions::FrameBound::Preceding(expr)
                | crate::expressions::FrameBound::Following(expr) => {
                    out.push(NodeRef::Value(expr))
                }
                _ => {}
            }
        }
    }
}

fn push_function_call<'a>(call: &'a FunctionCall, out: &mut Vec<NodeRef<'a>>) {
    for arg in &call.args {
        out.push(NodeRef::Value(arg));
    }
    if let Some(order_by) = &call.order_by {
        for item in &order_by.items {
            out.push(NodeRef::Value(&item.expr));
        }
    }
    if let Some(OverClause::Spec(spec)) = &call.over {
        push_window_spec(spec, out);
    }
}

/// Enumerate the direct children of a node, explicitly per variant.
pub fn children<'a>(node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    match node {
        NodeRef::Statement(statement) => match statement {
            Statement::Select(query) => out.push(NodeRef::Query(query)),
            Statement::Insert(insert) => {
                push_with(&insert.with, &mut out);
                if let InsertSource::Query(query) = &insert.source {
                    out.push(NodeRef::Query(query));
                }
                if let Some(returning) = &insert.returning {
                    push_select_items(&returning.items, &mut out);
                }
            }
            Statement::Update(update) => {
                push_with(&update.with, &mut out);
                for item in &update.set.items {
                    if let SetValue::Expr(expr) = &item.value {
                        out.push(NodeRef::Value(expr));
                    }
                }
                if let Some(from) = &update.from {
                    out.push(NodeRef::Source(&from.source));
                    push_joins(&from.joins, &mut out);
                }
                if let Some(where_clause) = &update.where_clause {
                    out.push(NodeRef::Value(&where_clause.condition));
                }
                if let Some(returning) = &update.returning {
                    push_select_items(&returning.items, &mut out);
                }
            }
            Statement::Delete(delete) => {
                push_with(&delete.with, &mut out);
                if let Some(using) = &delete.using {
                    out.push(NodeRef::Source(&using.source));
                    push_joins(&using.joins, &mut out);
                }
                if let Some(where_clause) = &delete.where_clause {
                    out.push(NodeRef::Value(&where_clause.condition));
                }
                if let Some(returning) = &delete.returning {
                    push_select_items(&returning.items, &mut out);
                }
            }
            Statement::Merge(merge) => {
                push_with(&merge.with, &mut out);
                out.push(NodeRef::Source(&merge.source));
                out.push(NodeRef::Value(&merge.on));
                for when in &merge.when_clauses {
                    if let Some(condition) = &when.condition {
                        out.push(NodeRef::Value(condition));
                    }
                    match &when.action {
                        MergeAction::Update { set } => {
                            for item in &set.items {
                                if let SetValue::Expr(expr) = &item.value {
                                    out.push(NodeRef::Value(expr));
                                }
                            }
                        }
                        MergeAction::Insert { values, .. } => {
                            if let MergeInsertValues::Values(row) = values {
                                for value in row {
                                    out.push(NodeRef::Value(value));
                                }
                            }
                        }
                        MergeAction::Delete | MergeAction::DoNothing => {}
                    }
                }
            }
            Statement::CreateTable(create) => {
                for column in &create.columns {
                    for constraint in &column.constraints {
                        use crate::expressions::ColumnConstraintKind::*;
                        match &constraint.kind {
                            Default(expr) | Check(expr) => out.push(NodeRef::Value(expr)),
                            _ => {}
                        }
                    }
                }
                for constraint in &create.constraints {
                    if let crate::expressions::TableConstraintKind::Check(expr) = &constraint.kind
                    {
                        out.push(NodeRef::Value(expr));
                    }
                }
                if let Some(as_select) = &create.as_select {
                    out.push(NodeRef::Query(as_select));
                }
            }
            Statement::CreateIndex(create) => {
                for column in &create.columns {
                    out.push(NodeRef::Value(&column.expr));
                }
                if let Some(where_clause) = &create.where_clause {
                    out.push(NodeRef::Value(&where_clause.condition));
                }
            }
            Statement::DropIndex(_)
            | Statement::DropConstraint(_)
            | Statement::Cluster(_)
            | Statement::Checkpoint(_)
            | Statement::Reindex(_) => {}
        },
        NodeRef::Query(query) => match query {
            SelectQuery::Simple(q) => {
                push_with(&q.with, &mut out);
                push_select_items(&q.select.items, &mut out);
                if let Some(from) = &q.from {
                    out.push(NodeRef::Source(&from.source));
                    push_joins(&from.joins, &mut out);
                }
                if let Some(where_clause) = &q.where_clause {
                    out.push(NodeRef::Value(&where_clause.condition));
                }
                if let Some(group_by) = &q.group_by {
                    for item in &group_by.items {
                        match item {
                            GroupingElement::Expr(expr) => out.push(NodeRef::Value(expr)),
                            GroupingElement::Rollup(exprs) | GroupingElement::Cube(exprs) => {
                                for expr in exprs {
                                    out.push(NodeRef::Value(expr));
                                }
                            }
                            GroupingElement::GroupingSets(sets) => {
                                for set in sets {
                                    for expr in set {
                                        out.push(NodeRef::Value(expr));
                                    }
                                }
                            }
                        }
                    }
                }
                if let Some(having) = &q.having {
                    out.push(NodeRef::Value(&having.condition));
                }
                if let Some(window) = &q.window {
                    for named in &window.windows {
                        push_window_spec(&named.spec, &mut out);
                    }
                }
                if let Some(order_by) = &q.order_by {
                    for item in &order_by.items {
                        out.push(NodeRef::Value(&item.expr));
                    }
                }
                if let Some(limit) = &q.limit {
                    if let Some(count) = &limit.count {
                        out.push(NodeRef::Value(count));
                    }
                    if let Some(offset) = &limit.offset {
                        out.push(NodeRef::Value(offset));
                    }
                }
            }
            SelectQuery::Binary(q) => {
                push_with(&q.with, &mut out);
                out.push(NodeRef::Query(&q.left));
                out.push(NodeRef::Query(&q.right));
                if let Some(order_by) = &q.order_by {
                    for item in &order_by.items {
                        out.push(NodeRef::Value(&item.expr));
                    }
                }
                if let Some(limit) = &q.limit {
                    if let Some(count) = &limit.count {
                        out.push(NodeRef::Value(count));
                    }
                    if let Some(offset) = &limit.offset {
                        out.push(NodeRef::Value(offset));
                    }
                }
            }
            SelectQuery::Values(q) => {
                push_with(&q.with, &mut out);
                for row in &q.rows {
                    for value in row {
                        out.push(NodeRef::Value(value));
                    }
                }
            }
        },
        NodeRef::Source(source) => match source {
            SourceExpr::Table(_) => {}
            SourceExpr::Subquery(subquery) => out.push(NodeRef::Query(&subquery.query)),
            SourceExpr::Function(function) => push_function_call(&function.function, &mut out),
            SourceExpr::Paren(paren) => {
                out.push(NodeRef::Source(&paren.source));
                push_joins(&paren.joins, &mut out);
            }
        },
        NodeRef::Value(value) => match value {
            ValueExpr::Literal(_)
            | ValueExpr::TypedLiteral(_)
            | ValueExpr::Column(_)
            | ValueExpr::Star(_)
            | ValueExpr::Parameter(_)
            | ValueExpr::Raw(_) => {}
            ValueExpr::Binary(binary) => {
                out.push(NodeRef::Value(&binary.left));
                out.push(NodeRef::Value(&binary.right));
            }
            ValueExpr::Unary(unary) => out.push(NodeRef::Value(&unary.operand)),
            ValueExpr::Function(call) => push_function_call(call, &mut out),
            ValueExpr::Case(case) => {
                if let Some(operand) = &case.operand {
                    out.push(NodeRef::Value(operand));
                }
                for branch in &case.branches {
                    out.push(NodeRef::Value(&branch.condition));
                    out.push(NodeRef::Value(&branch.result));
                }
                if let Some(else_result) = &case.else_result {
                    out.push(NodeRef::Value(else_result));
                }
            }
            ValueExpr::Cast(cast) => {
                out.push(NodeRef::Value(&cast.operand));
                for modifier in &cast.target_type.modifiers {
                    out.push(NodeRef::Value(modifier));
                }
            }
            ValueExpr::Extract(extract) => out.push(NodeRef::Value(&extract.source)),
            ValueExpr::Between(between) => {
                out.push(NodeRef::Value(&between.operand));
                out.push(NodeRef::Value(&between.low));
                out.push(NodeRef::Value(&between.high));
            }
            ValueExpr::In(in_expr) => {
                out.push(NodeRef::Value(&in_expr.operand));
                match &in_expr.list {
                    InList::Values(values) => {
                        for value in values {
                            out.push(NodeRef::Value(value));
                        }
                    }
                    InList::Subquery(query) => out.push(NodeRef::Query(query)),
                }
            }
            ValueExpr::Like(like) => {
                out.push(NodeRef::Value(&like.operand));
                out.push(NodeRef::Value(&like.pattern));
                if let Some(escape) = &like.escape {
                    out.push(NodeRef::Value(escape));
                }
            }
            ValueExpr::Exists(exists) => out.push(NodeRef::Query(&exists.query)),
            ValueExpr::Subquery(query) => out.push(NodeRef::Query(query)),
            ValueExpr::Paren(inner) => out.push(NodeRef::Value(inner)),
            ValueExpr::Tuple(items) | ValueExpr::Array(items) => {
                for item in items {
                    out.push(NodeRef::Value(item));
                }
            }
        },
    }
    out
}

/// Depth-first (pre-order) iterator over a tree.
pub struct DfsIter<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut kids = children(node);
        kids.reverse();
        self.stack.extend(kids);
        Some(node)
    }
}

/// Breadth-first (level-order) iterator over a tree.
pub struct BfsIter<'a> {
    queue: VecDeque<NodeRef<'a>>,
}

impl<'a> Iterator for BfsIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(children(node));
        Some(node)
    }
}

/// Depth-first traversal starting at any node.
pub fn dfs<'a>(root: impl Into<NodeRef<'a>>) -> DfsIter<'a> {
    DfsIter {
        stack: vec![root.into()],
    }
}

/// Breadth-first traversal starting at any node.
pub fn bfs<'a>(root: impl Into<NodeRef<'a>>) -> BfsIter<'a> {
    let mut queue = VecDeque::new();
    queue.push_back(root.into());
    BfsIter { queue }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

const AGGREGATE_NAMES: &[&str] = &[
    "count", "sum", "avg", "min", "max", "array_agg", "string_agg", "bool_and", "bool_or",
    "every", "json_agg", "jsonb_agg", "stddev", "stddev_pop", "stddev_samp", "variance",
    "var_pop", "var_samp",
];

/// Whether the expression is a call to a known aggregate (without a window).
pub fn is_aggregate(expr: &ValueExpr) -> bool {
    match expr {
        ValueExpr::Function(call) => {
            call.over.is_none()
                && call.name.parts.len() == 1
                && AGGREGATE_NAMES
                    .iter()
                    .any(|n| call.name.base().name.eq_ignore_ascii_case(n))
        }
        _ => false,
    }
}

/// Whether the expression is a windowed function call.
pub fn is_window_function(expr: &ValueExpr) -> bool {
    matches!(expr, ValueExpr::Function(call) if call.over.is_some())
}

/// Whether the expression embeds a subquery directly.
pub fn is_subquery(expr: &ValueExpr) -> bool {
    match expr {
        ValueExpr::Subquery(_) | ValueExpr::Exists(_) => true,
        ValueExpr::In(in_expr) => matches!(in_expr.list, InList::Subquery(_)),
        _ => false,
    }
}

pub fn is_column(expr: &ValueExpr) -> bool {
    matches!(expr, ValueExpr::Column(_))
}

pub fn is_literal(expr: &ValueExpr) -> bool {
    matches!(expr, ValueExpr::Literal(_) | ValueExpr::TypedLiteral(_))
}

pub fn is_function(expr: &ValueExpr) -> bool {
    matches!(expr, ValueExpr::Function(_))
}

pub fn is_parameter(expr: &ValueExpr) -> bool {
    matches!(expr, ValueExpr::Parameter(_))
}

/// Whether any node in the subtree satisfies `is_aggregate`.
pub fn contains_aggregate(expr: &ValueExpr) -> bool {
    dfs(expr).any(|node| matches!(node, NodeRef::Value(v) if is_aggregate(v)))
}

/// Whether any node in the subtree embeds a subquery.
pub fn contains_subquery(expr: &ValueExpr) -> bool {
    dfs(expr).any(|node| matches!(node, NodeRef::Query(_)))
}

// ---------------------------------------------------------------------------
// Collectors
// ---------------------------------------------------------------------------

fn dotted(name: &QualifiedName) -> String {
    name.parts
        .iter()
        .map(|part| part.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// Collect every column reference in the tree, as dotted names, in
/// encounter order (duplicates preserved).
pub fn collect_columns(statement: &Statement) -> Vec<String> {
    dfs(statement)
        .filter_map(|node| match node {
            NodeRef::Value(ValueExpr::Column(column)) => Some(dotted(&column.name)),
            _ => None,
        })
        .collect()
}

/// Collect every bound-parameter placeholder in the tree, in encounter
/// order.
pub fn collect_parameters(statement: &Statement) -> Vec<crate::expressions::Parameter> {
    dfs(statement)
        .filter_map(|node| match node {
            NodeRef::Value(ValueExpr::Parameter(parameter)) => Some(parameter.clone()),
            _ => None,
        })
        .collect()
}

/// Collect the physical tables a statement references, deduplicated, in
/// encounter order. WITH-clause scoping is respected: a FROM reference that
/// resolves to a CTE name is not reported, even when a physical table of the
/// same name could exist. DDL/DML target tables are included.
pub fn collect_tables(statement: &Statement) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut emit = |name: String| {
        if seen.insert(name.clone()) {
            out.push(name);
        }
    };
    statement_tables(statement, &HashSet::new(), &mut emit);
    out
}

type Emit<'e> = dyn FnMut(String) + 'e;

fn lower(name: &str) -> String {
    name.to_lowercase()
}

fn with_scope(
    scope: &HashSet<String>,
    with: &Option<WithClause>,
    emit: &mut Emit<'_>,
) -> HashSet<String> {
    let mut scope = scope.clone();
    let Some(with) = with else {
        return scope;
    };
    if with.recursive {
        // All names are visible to every body, including their own.
        for table in &with.tables {
            scope.insert(lower(&table.name.name));
        }
        for table in &with.tables {
            query_tables(&table.query, &scope, emit);
        }
    } else {
        // Each body sees only the CTEs defined before it.
        for table in &with.tables {
            query_tables(&table.query, &scope, emit);
            scope.insert(lower(&table.name.name));
        }
    }
    scope
}

fn statement_tables(statement: &Statement, scope: &HashSet<String>, emit: &mut Emit<'_>) {
    match statement {
        Statement::Select(query) => query_tables(query, scope, emit),
        Statement::Insert(insert) => {
            let scope = with_scope(scope, &insert.with, emit);
            emit(dotted(&insert.target));
            if let InsertSource::Query(query) = &insert.source {
                query_tables(query, &scope, emit);
            }
            returning_tables(&insert.returning, &scope, emit);
        }
        Statement::Update(update) => {
            let scope = with_scope(scope, &update.with, emit);
            emit(dotted(&update.update.source.name));
            for item in &update.set.items {
                if let SetValue::Expr(expr) = &item.value {
                    value_tables(expr, &scope, emit);
                }
            }
            if let Some(from) = &update.from {
                source_tables(&from.source, &scope, emit);
                joins_tables(&from.joins, &scope, emit);
            }
            if let Some(where_clause) = &update.where_clause {
                value_tables(&where_clause.condition, &scope, emit);
            }
            returning_tables(&update.returning, &scope, emit);
        }
        Statement::Delete(delete) => {
            let scope = with_scope(scope, &delete.with, emit);
            emit(dotted(&delete.target.name));
            if let Some(using) = &delete.using {
                source_tables(&using.source, &scope, emit);
                joins_tables(&using.joins, &scope, emit);
            }
            if let Some(where_clause) = &delete.where_clause {
                value_tables(&where_clause.condition, &scope, emit);
            }
            returning_tables(&delete.returning, &scope, emit);
        }
        Statement::Merge(merge) => {
            let scope = with_scope(scope, &merge.with, emit);
            emit(dotted(&merge.target.name));
            source_tables(&merge.source, &scope, emit);
            value_tables(&merge.on, &scope, emit);
            for when in &merge.when_clauses {
                if let Some(condition) = &when.condition {
                    value_tables(condition, &scope, emit);
                }
                match &when.action {
                    MergeAction::Update { set } => {
                        for item in &set.items {
                            if let SetValue::Expr(expr) = &item.value {
                                value_tables(expr, &scope, emit);
                            }
                        }
                    }
                    MergeAction::Insert { values, .. } => {
                        if let MergeInsertValues::Values(row) = values {
                            for value in row {
                                value_tables(value, &scope, emit);
                            }
                        }
                    }
                    MergeAction::Delete | MergeAction::DoNothing => {}
                }
            }
        }
        Statement::CreateTable(create) => {
            emit(dotted(&create.name));
            if let Some(as_select) = &create.as_select {
                query_tables(as_select, scope, emit);
            }
        }
        Statement::CreateIndex(create) => emit(dotted(&create.table)),
        Statement::DropConstraint(drop) => emit(dotted(&drop.table)),
        Statement::Cluster(cluster) => {
            if let Some(table) = &cluster.table {
                emit(dotted(table));
            }
        }
        Statement::Reindex(reindex) => {
            if reindex.target == crate::expressions::ReindexTarget::Table {
                emit(dotted(&reindex.name));
            }
        }
        Statement::DropIndex(_) | Statement::Checkpoint(_) => {}
    }
}

fn returning_tables(
    returning: &Option<crate::expressions::ReturningClause>,
    scope: &HashSet<String>,
    emit: &mut Emit<'_>,
) {
    if let Some(returning) = returning {
        for item in &returning.items {
            value_tables(&item.expr, scope, emit);
        }
    }
}

fn query_tables(query: &SelectQuery, scope: &HashSet<String>, emit: &mut Emit<'_>) {
    match query {
        SelectQuery::Simple(q) => {
            let scope = with_scope(scope, &q.with, emit);
            for item in &q.select.items {
                value_tables(&item.expr, &scope, emit);
            }
            if let Some(from) = &q.from {
                source_tables(&from.source, &scope, emit);
                joins_tables(&from.joins, &scope, emit);
            }
            if let Some(where_clause) = &q.where_clause {
                value_tables(&where_clause.condition, &scope, emit);
            }
            if let Some(group_by) = &q.group_by {
                for item in &group_by.items {
                    if let GroupingElement::Expr(expr) = item {
                        value_tables(expr, &scope, emit);
                    }
                }
            }
            if let Some(having) = &q.having {
                value_tables(&having.condition, &scope, emit);
            }
        }
        SelectQuery::Binary(q) => {
            let scope = with_scope(scope, &q.with, emit);
            query_tables(&q.left, &scope, emit);
            query_tables(&q.right, &scope, emit);
        }
        SelectQuery::Values(q) => {
            let scope = with_scope(scope, &q.with, emit);
            for row in &q.rows {
                for value in row {
                    value_tables(value, &scope, emit);
                }
            }
        }
    }
}

fn joins_tables(joins: &[JoinClause], scope: &HashSet<String>, emit: &mut Emit<'_>) {
    for join in joins {
        source_tables(&join.source, scope, emit);
        if let Some(JoinCondition::On(condition)) = &join.condition {
            value_tables(condition, scope, emit);
        }
    }
}

fn source_tables(source: &SourceExpr, scope: &HashSet<String>, emit: &mut Emit<'_>) {
    match source {
        SourceExpr::Table(table) => {
            let is_cte_reference =
                table.name.parts.len() == 1 && scope.contains(&lower(&table.name.base().name));
            if !is_cte_reference {
                emit(dotted(&table.name));
            }
        }
        SourceExpr::Subquery(subquery) => query_tables(&subquery.query, scope, emit),
        SourceExpr::Function(function) => {
            for arg in &function.function.args {
                value_tables(arg, scope, emit);
            }
        }
        SourceExpr::Paren(paren) => {
            source_tables(&paren.source, scope, emit);
            joins_tables(&paren.joins, scope, emit);
        }
    }
}

fn value_tables(expr: &ValueExpr, scope: &HashSet<String>, emit: &mut Emit<'_>) {
    for child in children(NodeRef::Value(expr)) {
        match child {
            NodeRef::Query(query) => query_tables(query, scope, emit),
            NodeRef::Value(value) => value_tables(value, scope, emit),
            NodeRef::Source(source) => source_tables(source, scope, emit),
            NodeRef::Statement(_) => {}
        }
    }
}

/// For each CTE of the query's top-level WITH clause, the sibling CTE names
/// its body references, in declaration order.
pub fn cte_dependencies(query: &SelectQuery) -> Vec<(String, Vec<String>)> {
    let Some(with) = query.with_clause() else {
        return Vec::new();
    };
    let siblings: HashSet<String> = with
        .tables
        .iter()
        .map(|table| lower(&table.name.name))
        .collect();

    with.tables
        .iter()
        .map(|table| {
            let mut referenced = Vec::new();
            let mut seen = HashSet::new();
            let mut emit = |name: String| {
                let lowered = lower(&name);
                if siblings.contains(&lowered) && seen.insert(lowered) {
                    referenced.push(name);
                }
            };
            query_tables(&table.query, &HashSet::new(), &mut emit);
            (table.name.name.clone(), referenced)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Statement {
        Parser::parse_sql(sql).expect("parse failed")
    }

    #[test]
    fn collect_tables_excludes_cte_references() {
        let statement =
            parse("WITH a AS (SELECT 1), b AS (SELECT * FROM a) SELECT * FROM b JOIN users u ON u.id = b.id");
        assert_eq!(collect_tables(&statement), vec!["users"]);
    }

    #[test]
    fn collect_tables_sees_through_subqueries() {
        let statement = parse("SELECT * FROM (SELECT * FROM orders) o WHERE EXISTS (SELECT 1 FROM audit)");
        assert_eq!(collect_tables(&statement), vec!["orders", "audit"]);
    }

    #[test]
    fn recursive_cte_name_is_visible_to_its_own_body() {
        let statement =
            parse("WITH RECURSIVE t AS (SELECT 1 UNION ALL SELECT n + 1 FROM t) SELECT * FROM t");
        assert_eq!(collect_tables(&statement), Vec::<String>::new());
    }

    #[test]
    fn cte_dependency_map() {
        let statement = parse(
            "WITH a AS (SELECT 1), b AS (SELECT * FROM a), c AS (SELECT * FROM b JOIN a ON TRUE) SELECT * FROM c",
        );
        let Statement::Select(query) = &statement else {
            panic!("expected select");
        };
        let deps = cte_dependencies(query);
        assert_eq!(deps[0], ("a".to_string(), vec![]));
        assert_eq!(deps[1], ("b".to_string(), vec!["a".to_string()]));
        assert_eq!(
            deps[2],
            ("c".to_string(), vec!["b".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn aggregate_and_window_predicates() {
        let statement = parse("SELECT count(*), sum(x) OVER (PARTITION BY y) FROM t");
        let Statement::Select(query) = &statement else {
            panic!("expected select");
        };
        let SelectQuery::Simple(simple) = query.as_ref() else {
            panic!("expected simple select");
        };
        assert!(is_aggregate(&simple.select.items[0].expr));
        assert!(!is_aggregate(&simple.select.items[1].expr));
        assert!(is_window_function(&simple.select.items[1].expr));
    }

    #[test]
    fn dfs_visits_nested_subqueries() {
        let statement = parse("SELECT (SELECT max(v) FROM s) FROM t");
        let queries = dfs(&statement)
            .filter(|node| matches!(node, NodeRef::Query(_)))
            .count();
        assert_eq!(queries, 2);
    }
}
