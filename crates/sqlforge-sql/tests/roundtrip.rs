//! Round-trip tests
//!
//! Parse -> generate -> reparse must yield a structurally equal AST, and a
//! second generation must reproduce the first output byte for byte. Where
//! the generator intentionally normalizes (inserted parentheses, keyword
//! casing on typed literals, explicit AS), only stability is asserted.

use sqlforge_sql::expressions::Statement;
use sqlforge_sql::generator::Generator;
use sqlforge_sql::parser::Parser;

fn parse(sql: &str) -> Statement {
    Parser::parse_sql(sql).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e))
}

/// Parse, render, and reparse: the AST must survive unchanged.
fn assert_ast_roundtrip(sql: &str) {
    let first = parse(sql);
    let rendered = Generator::sql(&first).expect("failed to generate SQL");
    let second = Parser::parse_sql(&rendered)
        .unwrap_or_else(|e| panic!("failed to re-parse {:?}: {}", rendered, e));
    assert_eq!(
        first, second,
        "AST changed across a format round-trip for {:?}\nrendered: {}",
        sql, rendered
    );
}

/// Weaker property for statements the generator normalizes: rendering must
/// reach a fixed point after one pass.
fn assert_stable(sql: &str) {
    let rendered = Generator::sql(&parse(sql)).expect("failed to generate SQL");
    let rerendered = Generator::sql(&parse(&rendered)).expect("failed to generate SQL");
    assert_eq!(
        rendered, rerendered,
        "formatting did not stabilize for {:?}",
        sql
    );
}

#[test]
fn select_statements() {
    assert_ast_roundtrip("SELECT id, name FROM users");
    assert_ast_roundtrip("SELECT DISTINCT dept FROM employees");
    assert_ast_roundtrip("SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c USING (id)");
    assert_ast_roundtrip(
        "SELECT dept, count(*) AS n FROM emp GROUP BY dept HAVING count(*) > 5 ORDER BY n DESC LIMIT 10 OFFSET 5",
    );
    assert_ast_roundtrip("SELECT * FROM t WHERE a OR b AND c");
    assert_ast_roundtrip("SELECT * FROM t WHERE (a OR b) AND c");
    assert_ast_roundtrip("SELECT 2 ^ 3 ^ 2");
    assert_ast_roundtrip("SELECT (SELECT max(v) FROM s) FROM t");
    assert_ast_roundtrip(
        "SELECT * FROM t WHERE a BETWEEN 1 AND 10 AND b IN (1, 2) AND c LIKE 'x%'",
    );
    assert_ast_roundtrip("SELECT CASE WHEN a THEN 1 ELSE 2 END FROM t");
    assert_ast_roundtrip("SELECT CAST(a AS int), b::text FROM t");
    assert_ast_roundtrip("SELECT sum(x) OVER (PARTITION BY y ORDER BY z) FROM t");
    assert_ast_roundtrip("SELECT 1 UNION ALL SELECT 2");
    assert_ast_roundtrip("WITH a AS (SELECT 1), b AS (SELECT * FROM a) SELECT * FROM b");
    assert_ast_roundtrip("SELECT * FROM t WHERE id = $1");
    assert_ast_roundtrip("VALUES (1, 'a'), (2, 'b')");
}

#[test]
fn dml_statements() {
    assert_ast_roundtrip("INSERT INTO t (a, b) VALUES (1, 2)");
    assert_ast_roundtrip("INSERT INTO t SELECT * FROM src RETURNING id");
    assert_ast_roundtrip("UPDATE t SET a = 1, b = DEFAULT WHERE c = 2");
    assert_ast_roundtrip("DELETE FROM t USING u WHERE t.id = u.id RETURNING t.id");
    assert_ast_roundtrip(
        "MERGE INTO accounts USING transfers ON accounts.id = transfers.account_id \
         WHEN MATCHED THEN UPDATE SET balance = balance + amount \
         WHEN NOT MATCHED THEN INSERT (id, balance) VALUES (account_id, amount)",
    );
}

#[test]
fn ddl_statements() {
    assert_ast_roundtrip("CREATE TABLE t (id int PRIMARY KEY, name text NOT NULL)");
    assert_ast_roundtrip("CREATE TABLE summary AS SELECT dept, count(*) FROM emp GROUP BY dept");
    assert_ast_roundtrip("CREATE UNIQUE INDEX idx ON t (a DESC, b) WHERE a IS NOT NULL");
    assert_ast_roundtrip("DROP INDEX IF EXISTS idx CASCADE");
    assert_ast_roundtrip("ALTER TABLE t DROP CONSTRAINT fk");
    assert_ast_roundtrip("CLUSTER sales USING sales_pkey");
    assert_ast_roundtrip("REINDEX TABLE sales");
}

#[test]
fn normalized_statements_reach_a_fixed_point() {
    // Implicit aliases gain AS, typed literal keywords are uppercased, and
    // mixed casing is normalized; a second pass must change nothing.
    assert_stable("select a b from t c");
    assert_stable("select date '2024-01-01', interval '1 day'");
    assert_stable("SELECT a NOT BETWEEN 1 AND 2 FROM t");
    assert_stable("SELECT x FROM generate_series(1, 10) g(x)");
    assert_stable("WITH RECURSIVE t AS (SELECT 1 UNION ALL SELECT n + 1 FROM t) SELECT * FROM t");
}

#[test]
fn pretty_output_parses_back_to_the_same_ast() {
    let sql = "WITH a AS (SELECT 1), b AS (SELECT * FROM a) \
               SELECT b.x, count(*) AS n FROM b JOIN c ON b.id = c.id \
               WHERE b.x > 0 GROUP BY b.x ORDER BY n DESC LIMIT 10";
    let compact = parse(sql);
    let pretty = Generator::new(sqlforge_sql::generator::GeneratorConfig::pretty())
        .generate(&compact)
        .expect("failed to generate SQL");
    assert_eq!(compact, parse(&pretty), "pretty rendering changed the AST:\n{}", pretty);
}

mod multi_statement {
    use super::*;

    #[test]
    fn splits_on_top_level_semicolons_only() {
        let statements = Parser::parse_many("SELECT 1; SELECT 2;").expect("parse_many failed");
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn semicolon_inside_a_string_literal_does_not_split() {
        let statements =
            Parser::parse_many("SELECT 'a;b'; SELECT 2").expect("parse_many failed");
        assert_eq!(statements.len(), 2);
        assert_eq!(Generator::sql(&statements[0]).unwrap(), "SELECT 'a;b'");
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(Parser::parse_many("  ;;  ").expect("parse_many failed").len(), 0);
        assert_eq!(Parser::parse_many("").expect("parse_many failed").len(), 0);
    }
}
