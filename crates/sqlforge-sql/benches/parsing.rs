use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlforge_sql::generator::{Generator, GeneratorConfig};
use sqlforge_sql::parser::Parser;

const SIMPLE_SELECT: &str = "SELECT a, b, c FROM table1";

const MEDIUM_SELECT: &str = r#"
SELECT
    u.id,
    u.name,
    u.email,
    COUNT(o.id) AS order_count,
    SUM(o.total) AS total_spent
FROM users u
LEFT JOIN orders o ON u.id = o.user_id
WHERE u.created_at > '2024-01-01'
    AND u.status = 'active'
GROUP BY u.id, u.name, u.email
HAVING COUNT(o.id) > 5
ORDER BY total_spent DESC
LIMIT 100
"#;

const COMPLEX_SELECT: &str = r#"
WITH
    active_users AS (
        SELECT u.id, u.name, u.email
        FROM users u
        WHERE u.status = 'active'
          AND u.last_login > current_date - INTERVAL '30 days'
    ),
    user_orders AS (
        SELECT
            o.user_id,
            COUNT(*) AS order_count,
            SUM(o.total) AS total_spent,
            ROW_NUMBER() OVER (PARTITION BY o.user_id ORDER BY SUM(o.total) DESC) AS rank
        FROM orders o
        WHERE o.status = 'completed'
        GROUP BY o.user_id
    )
SELECT
    au.id AS user_id,
    au.name AS user_name,
    COALESCE(uo.order_count, 0) AS total_orders,
    COALESCE(uo.total_spent, 0) AS lifetime_value,
    CASE
        WHEN uo.total_spent > 1000 THEN 'gold'
        WHEN uo.total_spent > 100 THEN 'silver'
        ELSE 'bronze'
    END AS tier
FROM active_users au
LEFT JOIN user_orders uo ON au.id = uo.user_id
WHERE uo.order_count > 0 OR au.email LIKE '%@example.com'
ORDER BY lifetime_value DESC
LIMIT 50
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.bench_function("simple", |b| {
        b.iter(|| Parser::parse_sql(black_box(SIMPLE_SELECT)).unwrap())
    });
    group.bench_function("medium", |b| {
        b.iter(|| Parser::parse_sql(black_box(MEDIUM_SELECT)).unwrap())
    });
    group.bench_function("complex", |b| {
        b.iter(|| Parser::parse_sql(black_box(COMPLEX_SELECT)).unwrap())
    });
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let simple = Parser::parse_sql(SIMPLE_SELECT).unwrap();
    let complex = Parser::parse_sql(COMPLEX_SELECT).unwrap();

    let mut group = c.benchmark_group("generate");
    group.bench_function("simple", |b| {
        b.iter(|| Generator::sql(black_box(&simple)).unwrap())
    });
    group.bench_function("complex", |b| {
        b.iter(|| Generator::sql(black_box(&complex)).unwrap())
    });
    group.bench_function("complex_pretty", |b| {
        b.iter(|| {
            Generator::new(GeneratorConfig::pretty())
                .generate(black_box(&complex))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    c.bench_function("roundtrip/complex", |b| {
        b.iter(|| {
            let ast = Parser::parse_sql(black_box(COMPLEX_SELECT)).unwrap();
            Generator::sql(&ast).unwrap()
        })
    });
}

criterion_group!(benches, bench_parse, bench_generate, bench_roundtrip);
criterion_main!(benches);
