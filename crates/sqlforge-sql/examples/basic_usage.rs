//! Basic usage examples for sqlforge-sql.
//!
//! Run with: cargo run --example basic_usage -p sqlforge-sql

use sqlforge_sql::generator::{Generator, GeneratorConfig, ParameterStyle};
use sqlforge_sql::traversal::{collect_tables, cte_dependencies};
use sqlforge_sql::{parse, scope_at, Statement};

fn main() {
    parsing();
    generation();
    parameters();
    analysis();
}

/// Parse SQL into an AST and inspect it.
fn parsing() {
    println!("=== Parsing ===\n");

    let ast = parse("SELECT id, name FROM users WHERE active = TRUE").expect("parse failed");
    println!("Parsed AST (debug): {:#?}\n", ast);
}

/// Parse SQL then regenerate it, compact and pretty.
fn generation() {
    println!("=== Generation ===\n");

    let ast = parse("select u.id, count(*) n from users u join orders o on o.user_id = u.id group by u.id")
        .expect("parse failed");

    // Default generation normalizes keywords to uppercase on one line.
    println!("Compact: {}\n", Generator::sql(&ast).expect("generate"));

    // Pretty mode puts one clause per line.
    let pretty = Generator::new(GeneratorConfig::pretty())
        .generate(&ast)
        .expect("generate");
    println!("Pretty:\n{}\n", pretty);
}

/// Extract bound parameters while rendering.
fn parameters() {
    println!("=== Parameters ===\n");

    let ast = parse("SELECT * FROM orders WHERE user_id = :uid AND total > :min_total")
        .expect("parse failed");
    let config = GeneratorConfig {
        parameter_style: ParameterStyle::Dollar,
        ..GeneratorConfig::default()
    };
    let result = Generator::new(config).format(&ast).expect("format");
    println!("SQL:    {}", result.sql);
    println!("Params: {:?}\n", result.params);
}

/// Walk the tree: referenced tables, CTE dependencies, cursor scopes.
fn analysis() {
    println!("=== Analysis ===\n");

    let sql = "WITH a AS (SELECT 1), b AS (SELECT * FROM a JOIN users u ON TRUE) SELECT * FROM b";
    let ast = parse(sql).expect("parse failed");

    // CTE references are resolved by name and never reported as tables.
    println!("Tables: {:?}", collect_tables(&ast));

    if let Statement::Select(query) = &ast {
        println!("CTE dependencies: {:?}", cte_dependencies(query));
    }

    // IDE-style query: what is visible at this cursor position?
    let offset = sql.find("FROM a").unwrap();
    let scope = scope_at(sql, offset).expect("scope query failed");
    println!(
        "At offset {}: token {:?}, visible CTEs {:?}",
        offset,
        scope.token.map(|t| t.text),
        scope.visible_ctes
    );
}
