//! SELECT parsing tests
//!
//! Covers the select list, expression precedence, joins, CTEs, set
//! operations, and the clause tail (GROUP BY through LIMIT).

use sqlforge_sql::expressions::*;
use sqlforge_sql::parser::Parser;

fn parse(sql: &str) -> Statement {
    Parser::parse_sql(sql).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e))
}

fn query(sql: &str) -> SelectQuery {
    match parse(sql) {
        Statement::Select(query) => *query,
        other => panic!("expected a SELECT statement, got {}", other.kind()),
    }
}

fn simple(sql: &str) -> SimpleSelectQuery {
    match query(sql) {
        SelectQuery::Simple(q) => *q,
        other => panic!("expected a simple select, got {}", other.kind()),
    }
}

fn item_expr(sql: &str) -> ValueExpr {
    simple(sql).select.items.remove(0).expr
}

fn condition(sql: &str) -> ValueExpr {
    simple(sql)
        .where_clause
        .expect("expected a WHERE clause")
        .condition
}

// ============================================================================
// Select list
// ============================================================================

mod select_list {
    use super::*;

    #[test]
    fn star_and_qualified_star() {
        let q = simple("SELECT *, t.* FROM t");
        assert!(matches!(
            q.select.items[0].expr,
            ValueExpr::Star(StarExpr { qualifier: None })
        ));
        let ValueExpr::Star(star) = &q.select.items[1].expr else {
            panic!("expected a qualified star");
        };
        assert_eq!(star.qualifier.as_ref().unwrap().base().name, "t");
    }

    #[test]
    fn aliases_with_and_without_as() {
        let q = simple("SELECT a AS x, b y FROM t");
        assert_eq!(q.select.items[0].alias.as_ref().unwrap().name, "x");
        assert_eq!(q.select.items[1].alias.as_ref().unwrap().name, "y");
    }

    #[test]
    fn distinct() {
        let q = simple("SELECT DISTINCT dept FROM employees");
        assert!(matches!(q.select.distinct, Some(DistinctKind::Distinct)));
    }

    #[test]
    fn distinct_on() {
        let q = simple("SELECT DISTINCT ON (dept) dept, name FROM employees");
        let Some(DistinctKind::DistinctOn(exprs)) = &q.select.distinct else {
            panic!("expected DISTINCT ON");
        };
        assert_eq!(exprs.len(), 1);
        assert_eq!(q.select.items.len(), 2);
    }

    #[test]
    fn quoted_identifiers_keep_the_quoted_flag() {
        let expr = item_expr(r#"SELECT "User"."Id" FROM "User""#);
        let ValueExpr::Column(column) = expr else {
            panic!("expected a column reference");
        };
        assert!(column.name.parts.iter().all(|part| part.quoted));
        assert_eq!(column.name.base().name, "Id");
    }
}

// ============================================================================
// Expression precedence
// ============================================================================

mod precedence {
    use super::*;

    #[test]
    fn or_binds_looser_than_and() {
        let ValueExpr::Binary(top) = condition("SELECT * FROM t WHERE a OR b AND c") else {
            panic!("expected a binary expression");
        };
        assert_eq!(top.operator, BinaryOperator::Or);
        let ValueExpr::Binary(rhs) = &top.right else {
            panic!("expected AND on the right");
        };
        assert_eq!(rhs.operator, BinaryOperator::And);
    }

    #[test]
    fn parentheses_regroup() {
        let ValueExpr::Binary(top) = condition("SELECT * FROM t WHERE (a OR b) AND c") else {
            panic!("expected a binary expression");
        };
        assert_eq!(top.operator, BinaryOperator::And);
        let ValueExpr::Paren(inner) = &top.left else {
            panic!("expected a parenthesized left operand");
        };
        let ValueExpr::Binary(grouped) = inner.as_ref() else {
            panic!("expected OR inside the parentheses");
        };
        assert_eq!(grouped.operator, BinaryOperator::Or);
    }

    #[test]
    fn multiplication_before_addition() {
        let ValueExpr::Binary(top) = item_expr("SELECT 1 + 2 * 3") else {
            panic!("expected a binary expression");
        };
        assert_eq!(top.operator, BinaryOperator::Add);
        let ValueExpr::Binary(rhs) = &top.right else {
            panic!("expected multiplication on the right");
        };
        assert_eq!(rhs.operator, BinaryOperator::Mul);
    }

    #[test]
    fn exponentiation_is_right_associative() {
        let ValueExpr::Binary(top) = item_expr("SELECT 2 ^ 3 ^ 2") else {
            panic!("expected a binary expression");
        };
        assert_eq!(top.operator, BinaryOperator::Exp);
        assert!(
            matches!(&top.right, ValueExpr::Binary(r) if r.operator == BinaryOperator::Exp),
            "expected the nested exponentiation on the right"
        );
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let ValueExpr::Binary(top) = condition("SELECT * FROM t WHERE NOT a = 1 AND b") else {
            panic!("expected a binary expression");
        };
        assert_eq!(top.operator, BinaryOperator::And);
        let ValueExpr::Unary(negated) = &top.left else {
            panic!("expected NOT on the left");
        };
        assert_eq!(negated.operator, UnaryOperator::Not);
        assert!(matches!(
            &negated.operand,
            ValueExpr::Binary(c) if c.operator == BinaryOperator::Eq
        ));
    }

    #[test]
    fn postfix_cast_binds_tighter_than_unary_minus() {
        let ValueExpr::Unary(negated) = item_expr("SELECT -x::int") else {
            panic!("expected a unary expression");
        };
        assert_eq!(negated.operator, UnaryOperator::Minus);
        assert!(matches!(&negated.operand, ValueExpr::Cast(c) if c.postfix));
    }
}

// ============================================================================
// Operators
// ============================================================================

mod operators {
    use super::*;

    #[test]
    fn unmodeled_operators_are_retained_verbatim() {
        let ValueExpr::Binary(expr) = item_expr("SELECT data -> 'key' FROM t") else {
            panic!("expected a binary expression");
        };
        assert_eq!(expr.operator, BinaryOperator::Raw("->".to_string()));
    }

    #[test]
    fn is_null_and_isnull_agree() {
        for sql in ["SELECT * FROM t WHERE x IS NULL", "SELECT * FROM t WHERE x ISNULL"] {
            let ValueExpr::Binary(expr) = condition(sql) else {
                panic!("expected a binary expression for {:?}", sql);
            };
            assert_eq!(expr.operator, BinaryOperator::Is);
            assert!(matches!(expr.right, ValueExpr::Literal(LiteralValue::Null)));
        }
    }

    #[test]
    fn is_not_distinct_from() {
        let ValueExpr::Binary(expr) = condition("SELECT * FROM t WHERE a IS NOT DISTINCT FROM b")
        else {
            panic!("expected a binary expression");
        };
        assert_eq!(expr.operator, BinaryOperator::IsNotDistinctFrom);
    }

    #[test]
    fn negated_between() {
        let ValueExpr::Between(between) = condition("SELECT * FROM t WHERE x NOT BETWEEN 1 AND 10")
        else {
            panic!("expected a BETWEEN expression");
        };
        assert!(between.negated);
    }

    #[test]
    fn in_list_and_in_subquery() {
        let ValueExpr::In(in_list) = condition("SELECT * FROM t WHERE x IN (1, 2, 3)") else {
            panic!("expected an IN expression");
        };
        assert!(matches!(&in_list.list, InList::Values(v) if v.len() == 3));

        let ValueExpr::In(in_sub) = condition("SELECT * FROM t WHERE x IN (SELECT id FROM u)")
        else {
            panic!("expected an IN expression");
        };
        assert!(matches!(in_sub.list, InList::Subquery(_)));
    }

    #[test]
    fn like_with_escape() {
        let ValueExpr::Like(like) = condition("SELECT * FROM t WHERE x LIKE '1!%%' ESCAPE '!'")
        else {
            panic!("expected a LIKE expression");
        };
        assert_eq!(like.operator, LikeOperator::Like);
        assert!(like.escape.is_some());
    }

    #[test]
    fn similar_to() {
        let ValueExpr::Like(like) = condition("SELECT * FROM t WHERE x SIMILAR TO '(a|b)%'")
        else {
            panic!("expected a SIMILAR TO expression");
        };
        assert_eq!(like.operator, LikeOperator::SimilarTo);
    }
}

// ============================================================================
// Functions and windows
// ============================================================================

mod functions_and_windows {
    use super::*;

    #[test]
    fn count_star_is_a_wildcard_call() {
        let ValueExpr::Function(call) = item_expr("SELECT count(*) FROM t") else {
            panic!("expected a function call");
        };
        assert!(call.wildcard);
        assert!(!call.is_window_function());
    }

    #[test]
    fn aggregate_sugar() {
        let ValueExpr::Function(call) =
            item_expr("SELECT string_agg(DISTINCT name, ',' ORDER BY name) FROM t")
        else {
            panic!("expected a function call");
        };
        assert!(call.distinct);
        assert_eq!(call.args.len(), 2);
        assert!(call.order_by.is_some());
    }

    #[test]
    fn window_function_detection_requires_over() {
        let ValueExpr::Function(call) = item_expr(
            "SELECT sum(x) OVER (PARTITION BY y ORDER BY z ROWS BETWEEN 1 PRECEDING AND CURRENT ROW) FROM t",
        ) else {
            panic!("expected a function call");
        };
        assert!(call.is_window_function());
        let Some(OverClause::Spec(spec)) = &call.over else {
            panic!("expected an inline window spec");
        };
        assert_eq!(spec.partition_by.len(), 1);
        assert!(spec.order_by.is_some());
        let frame = spec.frame.as_ref().unwrap();
        assert_eq!(frame.unit, FrameUnit::Rows);
        assert!(matches!(frame.start, FrameBound::Preceding(_)));
        assert!(matches!(frame.end, Some(FrameBound::CurrentRow)));
    }

    #[test]
    fn named_window_reference() {
        let q = simple("SELECT sum(x) OVER w FROM t WINDOW w AS (PARTITION BY y)");
        let ValueExpr::Function(call) = &q.select.items[0].expr else {
            panic!("expected a function call");
        };
        assert!(matches!(
            &call.over,
            Some(OverClause::WindowName(name)) if name.name == "w"
        ));
        let window = q.window.expect("expected a WINDOW clause");
        assert_eq!(window.windows[0].name.name, "w");
    }
}

// ============================================================================
// Parenthesized constructs and subqueries
// ============================================================================

mod subqueries {
    use super::*;

    #[test]
    fn paren_disambiguation() {
        assert!(matches!(item_expr("SELECT (SELECT 1)"), ValueExpr::Subquery(_)));
        assert!(matches!(item_expr("SELECT (1)"), ValueExpr::Paren(_)));
        assert!(matches!(item_expr("SELECT (1, 2)"), ValueExpr::Tuple(items) if items.len() == 2));
    }

    #[test]
    fn exists() {
        let ValueExpr::Exists(exists) =
            condition("SELECT * FROM t WHERE EXISTS (SELECT 1 FROM u)")
        else {
            panic!("expected an EXISTS expression");
        };
        assert!(!exists.negated);
    }

    #[test]
    fn lateral_subquery_in_from() {
        let q = simple("SELECT * FROM a, LATERAL (SELECT * FROM b WHERE b.a_id = a.id) AS x");
        let from = q.from.unwrap();
        assert_eq!(from.joins.len(), 1);
        let join = &from.joins[0];
        assert_eq!(join.join_type, JoinType::Comma);
        assert!(join.lateral);
        assert!(matches!(&join.source, SourceExpr::Subquery(s) if s.lateral));
    }
}

// ============================================================================
// Joins
// ============================================================================

mod joins {
    use super::*;

    fn on_left_column(join: &JoinClause) -> String {
        let Some(JoinCondition::On(ValueExpr::Binary(cond))) = &join.condition else {
            panic!("expected an ON condition");
        };
        let ValueExpr::Column(column) = &cond.left else {
            panic!("expected a column on the left of the condition");
        };
        column
            .name
            .parts
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    #[test]
    fn each_on_binds_to_the_preceding_join() {
        let q = simple("SELECT * FROM a JOIN b ON a.id = b.id JOIN c ON b.id = c.id");
        let from = q.from.unwrap();
        assert_eq!(from.joins.len(), 2);
        assert!(matches!(&from.joins[0].source, SourceExpr::Table(t) if t.name.base().name == "b"));
        assert!(matches!(&from.joins[1].source, SourceExpr::Table(t) if t.name.base().name == "c"));
        assert_eq!(on_left_column(&from.joins[0]), "a.id");
        assert_eq!(on_left_column(&from.joins[1]), "b.id");
    }

    #[test]
    fn join_type_variants() {
        let q = simple(
            "SELECT * FROM a LEFT OUTER JOIN b ON TRUE FULL JOIN c ON TRUE CROSS JOIN d NATURAL JOIN e",
        );
        let joins = q.from.unwrap().joins;
        assert_eq!(joins[0].join_type, JoinType::Left);
        assert_eq!(joins[1].join_type, JoinType::Full);
        assert_eq!(joins[2].join_type, JoinType::Cross);
        assert!(joins[2].condition.is_none());
        assert!(joins[3].natural);
        assert!(joins[3].condition.is_none());
    }

    #[test]
    fn using_condition() {
        let q = simple("SELECT * FROM a JOIN b USING (id, tenant_id)");
        let joins = q.from.unwrap().joins;
        let Some(JoinCondition::Using(columns)) = &joins[0].condition else {
            panic!("expected a USING condition");
        };
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn parenthesized_join_tree() {
        let q = simple("SELECT * FROM (a JOIN b ON a.id = b.id) JOIN c ON TRUE");
        let from = q.from.unwrap();
        let SourceExpr::Paren(paren) = &from.source else {
            panic!("expected a parenthesized join tree");
        };
        assert_eq!(paren.joins.len(), 1);
        assert_eq!(from.joins.len(), 1);
    }
}

// ============================================================================
// Common table expressions
// ============================================================================

mod ctes {
    use super::*;

    #[test]
    fn with_clause_collects_entries_in_order() {
        let q = simple("WITH a AS (SELECT 1), b AS (SELECT * FROM a) SELECT * FROM b");
        let with = q.with.expect("expected a WITH clause");
        assert!(!with.recursive);
        let names: Vec<&str> = with.tables.iter().map(|t| t.name.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn recursive_flag() {
        let q = simple("WITH RECURSIVE t AS (SELECT 1 UNION ALL SELECT n + 1 FROM t) SELECT * FROM t");
        assert!(q.with.unwrap().recursive);
    }

    #[test]
    fn column_aliases_and_materialization() {
        let q = simple("WITH a (x, y) AS MATERIALIZED (SELECT 1, 2) SELECT * FROM a");
        let table = &q.with.unwrap().tables[0];
        assert_eq!(table.column_aliases.len(), 2);
        assert_eq!(table.materialized, Some(true));

        let q = simple("WITH a AS NOT MATERIALIZED (SELECT 1) SELECT * FROM a");
        assert_eq!(q.with.unwrap().tables[0].materialized, Some(false));
    }
}

// ============================================================================
// Set operations
// ============================================================================

mod set_operations {
    use super::*;

    #[test]
    fn intersect_binds_tighter_than_union() {
        let SelectQuery::Binary(top) = query("SELECT 1 UNION SELECT 2 INTERSECT SELECT 3") else {
            panic!("expected a compound query");
        };
        assert_eq!(top.operator, SetOperator::Union);
        assert!(matches!(
            &top.right,
            SelectQuery::Binary(r) if r.operator == SetOperator::Intersect
        ));
    }

    #[test]
    fn unions_are_left_associative() {
        let SelectQuery::Binary(top) = query("SELECT 1 UNION SELECT 2 UNION ALL SELECT 3") else {
            panic!("expected a compound query");
        };
        assert_eq!(top.operator, SetOperator::UnionAll);
        assert!(matches!(
            &top.left,
            SelectQuery::Binary(l) if l.operator == SetOperator::Union
        ));
    }

    #[test]
    fn trailing_order_by_attaches_to_the_compound() {
        let SelectQuery::Binary(top) = query("SELECT a FROM t UNION SELECT a FROM u ORDER BY a")
        else {
            panic!("expected a compound query");
        };
        assert!(top.order_by.is_some());
        assert!(matches!(&top.left, SelectQuery::Simple(l) if l.order_by.is_none()));
    }

    #[test]
    fn parenthesized_operand_keeps_its_own_limit() {
        let SelectQuery::Binary(top) = query("(SELECT 1 LIMIT 1) UNION ALL SELECT 2") else {
            panic!("expected a compound query");
        };
        assert!(matches!(&top.left, SelectQuery::Simple(l) if l.limit.is_some()));
        assert!(top.limit.is_none());
    }
}

// ============================================================================
// GROUP BY, ORDER BY, LIMIT
// ============================================================================

mod clause_tail {
    use super::*;

    #[test]
    fn grouping_element_forms() {
        let q = simple(
            "SELECT 1 FROM t GROUP BY a, ROLLUP (b, c), CUBE (d), GROUPING SETS ((e), (f, g), ())",
        );
        let items = q.group_by.unwrap().items;
        assert!(matches!(items[0], GroupingElement::Expr(_)));
        assert!(matches!(&items[1], GroupingElement::Rollup(exprs) if exprs.len() == 2));
        assert!(matches!(&items[2], GroupingElement::Cube(exprs) if exprs.len() == 1));
        let GroupingElement::GroupingSets(sets) = &items[3] else {
            panic!("expected GROUPING SETS");
        };
        assert_eq!(sets.len(), 3);
        assert!(sets[2].is_empty());
    }

    #[test]
    fn having_requires_group_context_not_grammar() {
        let q = simple("SELECT dept, count(*) FROM emp GROUP BY dept HAVING count(*) > 5");
        assert!(q.having.is_some());
    }

    #[test]
    fn order_by_direction_and_nulls() {
        let q = simple("SELECT * FROM t ORDER BY a DESC NULLS LAST, b");
        let items = q.order_by.unwrap().items;
        assert_eq!(items[0].direction, Some(SortDirection::Desc));
        assert_eq!(items[0].nulls, Some(NullsOrder::Last));
        assert!(items[1].direction.is_none());
    }

    #[test]
    fn limit_and_offset_in_either_order() {
        let q = simple("SELECT * FROM t LIMIT 10 OFFSET 5");
        let limit = q.limit.unwrap();
        assert!(limit.count.is_some());
        assert!(limit.offset.is_some());

        let q = simple("SELECT * FROM t OFFSET 5 ROWS LIMIT 10");
        let limit = q.limit.unwrap();
        assert!(limit.count.is_some());
        assert!(limit.offset.is_some());
    }

    #[test]
    fn limit_all() {
        let q = simple("SELECT * FROM t LIMIT ALL");
        let limit = q.limit.unwrap();
        assert!(limit.count.is_none());
        assert!(limit.offset.is_none());
    }
}

// ============================================================================
// VALUES and leaf expressions
// ============================================================================

mod values_and_literals {
    use super::*;

    #[test]
    fn standalone_values() {
        let SelectQuery::Values(values) = query("VALUES (1, 'a'), (2, 'b')") else {
            panic!("expected a VALUES query");
        };
        assert_eq!(values.rows.len(), 2);
        assert_eq!(values.rows[0].len(), 2);
    }

    #[test]
    fn typed_literals() {
        let ValueExpr::TypedLiteral(literal) = item_expr("SELECT DATE '2024-01-01'") else {
            panic!("expected a typed literal");
        };
        assert_eq!(literal.type_name, "DATE");
        assert_eq!(literal.value, "2024-01-01");

        // A bare type keyword is an ordinary column reference.
        assert!(matches!(item_expr("SELECT date FROM t"), ValueExpr::Column(_)));
    }

    #[test]
    fn case_forms() {
        let ValueExpr::Case(searched) =
            item_expr("SELECT CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END FROM t")
        else {
            panic!("expected a CASE expression");
        };
        assert!(searched.operand.is_none());
        assert_eq!(searched.branches.len(), 1);
        assert!(searched.else_result.is_some());

        let ValueExpr::Case(simple_form) =
            item_expr("SELECT CASE x WHEN 1 THEN 'one' WHEN 2 THEN 'two' END FROM t")
        else {
            panic!("expected a CASE expression");
        };
        assert!(simple_form.operand.is_some());
        assert_eq!(simple_form.branches.len(), 2);
        assert!(simple_form.else_result.is_none());
    }

    #[test]
    fn cast_forms() {
        let ValueExpr::Cast(call_form) = item_expr("SELECT CAST(a AS numeric(10, 2))") else {
            panic!("expected a cast");
        };
        assert!(!call_form.postfix);
        assert_eq!(call_form.target_type.modifiers.len(), 2);

        let ValueExpr::Cast(postfix) = item_expr("SELECT a::text[]") else {
            panic!("expected a cast");
        };
        assert!(postfix.postfix);
        assert!(postfix.target_type.array);
    }

    #[test]
    fn extract() {
        let ValueExpr::Extract(extract) = item_expr("SELECT EXTRACT(year FROM created_at) FROM t")
        else {
            panic!("expected EXTRACT");
        };
        assert_eq!(extract.field, "year");
    }

    #[test]
    fn parameter_markers() {
        let q = simple("SELECT * FROM t WHERE a = ? AND b = $2 AND c = :name");
        let params = sqlforge_sql::traversal::collect_parameters(&Statement::Select(Box::new(
            SelectQuery::Simple(Box::new(q)),
        )));
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], Parameter { name: None, ordinal: None });
        assert_eq!(params[1], Parameter { name: None, ordinal: Some(2) });
        assert_eq!(
            params[2],
            Parameter { name: Some("name".to_string()), ordinal: None }
        );
    }

    #[test]
    fn array_constructor_and_exotic_strings() {
        assert!(matches!(item_expr("SELECT ARRAY[1, 2, 3]"), ValueExpr::Array(items) if items.len() == 3));
        assert!(matches!(item_expr("SELECT E'\\n'"), ValueExpr::Raw(_)));
        assert!(matches!(item_expr("SELECT X'1f'"), ValueExpr::Raw(_)));
    }
}
