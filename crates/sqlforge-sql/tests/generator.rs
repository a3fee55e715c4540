//! Generator configuration tests: keyword casing, identifier quoting, comma
//! style, CTE layout, pretty printing, and bound-parameter extraction.

use sqlforge_sql::expressions::*;
use sqlforge_sql::generator::{
    CommaStyle, CteStyle, Generator, GeneratorConfig, IdentifierQuoting, KeywordCase,
    ParameterStyle, Params,
};
use sqlforge_sql::parser::Parser;

fn gen(sql: &str) -> String {
    let ast = Parser::parse_sql(sql).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e));
    Generator::sql(&ast).expect("failed to generate SQL")
}

fn gen_with(config: GeneratorConfig, sql: &str) -> String {
    let ast = Parser::parse_sql(sql).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e));
    Generator::new(config).generate(&ast).expect("failed to generate SQL")
}

// ============================================================================
// Normalization and casing
// ============================================================================

mod casing {
    use super::*;

    #[test]
    fn default_output_is_compact_with_uppercase_keywords() {
        assert_eq!(
            gen("select   id ,\n name\nfrom users"),
            "SELECT id, name FROM users"
        );
    }

    #[test]
    fn lowercase_keywords() {
        let config = GeneratorConfig {
            keyword_case: KeywordCase::Lower,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            gen_with(config, "SELECT id FROM users WHERE active = TRUE"),
            "select id from users where active = true"
        );
    }
}

// ============================================================================
// Identifier quoting
// ============================================================================

mod quoting {
    use super::*;

    #[test]
    fn preserve_keeps_source_quoting() {
        assert_eq!(gen(r#"SELECT id, "User" FROM t"#), r#"SELECT id, "User" FROM t"#);
    }

    #[test]
    fn always_quotes_everything() {
        let config = GeneratorConfig {
            identifier_quoting: IdentifierQuoting::Always,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            gen_with(config, "SELECT id FROM users"),
            r#"SELECT "id" FROM "users""#
        );
    }

    #[test]
    fn minimal_quotes_only_unsafe_names() {
        let config = GeneratorConfig {
            identifier_quoting: IdentifierQuoting::Minimal,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            gen_with(config, r#"SELECT "id", "User" FROM t"#),
            r#"SELECT id, "User" FROM t"#
        );
    }
}

// ============================================================================
// Pretty printing
// ============================================================================

mod pretty {
    use super::*;

    #[test]
    fn one_clause_per_line_with_indented_select_list() {
        assert_eq!(
            gen_with(GeneratorConfig::pretty(), "SELECT a, b FROM t WHERE a = 1"),
            "SELECT\n  a,\n  b\nFROM t\nWHERE a = 1"
        );
    }

    #[test]
    fn leading_comma_style() {
        let config = GeneratorConfig {
            comma_style: CommaStyle::Leading,
            ..GeneratorConfig::pretty()
        };
        assert_eq!(
            gen_with(config, "SELECT a, b FROM t"),
            "SELECT\n  a\n  , b\nFROM t"
        );
    }

    #[test]
    fn cte_per_line() {
        assert_eq!(
            gen_with(
                GeneratorConfig::pretty(),
                "WITH a AS (SELECT 1), b AS (SELECT 2) SELECT * FROM b"
            ),
            "WITH\n  a AS (SELECT 1),\n  b AS (SELECT 2)\nSELECT\n  *\nFROM b"
        );
    }

    #[test]
    fn cte_inline() {
        let config = GeneratorConfig {
            cte_style: CteStyle::Inline,
            ..GeneratorConfig::pretty()
        };
        assert_eq!(
            gen_with(config, "WITH a AS (SELECT 1), b AS (SELECT 2) SELECT * FROM b"),
            "WITH a AS (SELECT 1), b AS (SELECT 2)\nSELECT\n  *\nFROM b"
        );
    }

    #[test]
    fn subqueries_stay_compact_in_pretty_mode() {
        assert_eq!(
            gen_with(
                GeneratorConfig::pretty(),
                "SELECT a FROM (SELECT a, b FROM t WHERE b > 0) s"
            ),
            "SELECT\n  a\nFROM (SELECT a, b FROM t WHERE b > 0) AS s"
        );
    }
}

// ============================================================================
// Precedence-aware parenthesization
// ============================================================================

mod parenthesization {
    use super::*;

    fn statement_for(expr: ValueExpr) -> Statement {
        Statement::Select(Box::new(SelectQuery::Simple(Box::new(
            SimpleSelectQuery::new(SelectClause::new(vec![SelectItem::new(expr)])),
        ))))
    }

    #[test]
    fn built_trees_get_the_parentheses_they_need() {
        // OR nested under AND has lower precedence and must be wrapped.
        let expr = ValueExpr::binary(
            ValueExpr::binary(ValueExpr::column("a"), BinaryOperator::Or, ValueExpr::column("b")),
            BinaryOperator::And,
            ValueExpr::column("c"),
        );
        assert_eq!(
            Generator::sql(&statement_for(expr)).unwrap(),
            "SELECT (a OR b) AND c"
        );
    }

    #[test]
    fn equal_precedence_right_operand_is_wrapped() {
        // a - (b - c) must not render as a - b - c.
        let expr = ValueExpr::binary(
            ValueExpr::column("a"),
            BinaryOperator::Sub,
            ValueExpr::binary(ValueExpr::column("b"), BinaryOperator::Sub, ValueExpr::column("c")),
        );
        assert_eq!(
            Generator::sql(&statement_for(expr)).unwrap(),
            "SELECT a - (b - c)"
        );
    }
}

// ============================================================================
// Parameter extraction
// ============================================================================

mod parameters {
    use super::*;

    fn format_with(style: ParameterStyle, sql: &str) -> (String, Params) {
        let ast = Parser::parse_sql(sql).expect("parse failed");
        let config = GeneratorConfig {
            parameter_style: style,
            ..GeneratorConfig::default()
        };
        let result = Generator::new(config).format(&ast).expect("format failed");
        (result.sql, result.params)
    }

    #[test]
    fn preserve_keeps_placeholders_and_collects_positionally() {
        let (sql, params) =
            format_with(ParameterStyle::Preserve, "SELECT * FROM t WHERE a = $1 OR b = $2");
        assert_eq!(sql, "SELECT * FROM t WHERE a = $1 OR b = $2");
        assert_eq!(params, Params::Positional(vec!["1".into(), "2".into()]));
    }

    #[test]
    fn question_style_anonymizes() {
        let (sql, params) =
            format_with(ParameterStyle::Question, "SELECT * FROM t WHERE a = $1 AND b = $2");
        assert_eq!(sql, "SELECT * FROM t WHERE a = ? AND b = ?");
        assert_eq!(params, Params::Positional(vec!["1".into(), "2".into()]));
    }

    #[test]
    fn dollar_style_numbers_anonymous_placeholders_by_occurrence() {
        let (sql, _) = format_with(ParameterStyle::Dollar, "SELECT * FROM t WHERE a = ? AND b = ?");
        assert_eq!(sql, "SELECT * FROM t WHERE a = $1 AND b = $2");
    }

    #[test]
    fn named_style_deduplicates_reused_names() {
        let (sql, params) =
            format_with(ParameterStyle::Named, "SELECT * FROM t WHERE a = :uid OR b = :uid");
        assert_eq!(sql, "SELECT * FROM t WHERE a = :uid OR b = :uid");
        assert_eq!(params, Params::Named(vec!["uid".into()]));
    }

    #[test]
    fn named_style_synthesizes_names_for_anonymous_placeholders() {
        let (sql, _) = format_with(ParameterStyle::Named, "SELECT * FROM t WHERE a = ?");
        assert_eq!(sql, "SELECT * FROM t WHERE a = :p1");
    }
}
