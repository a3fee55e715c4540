//! INSERT, UPDATE, DELETE, and MERGE parsing tests

use sqlforge_sql::expressions::*;
use sqlforge_sql::parser::Parser;

fn parse(sql: &str) -> Statement {
    Parser::parse_sql(sql).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e))
}

// ============================================================================
// INSERT
// ============================================================================

mod insert {
    use super::*;

    #[test]
    fn insert_values() {
        let Statement::Insert(insert) = parse("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)") else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.target.base().name, "t");
        assert_eq!(insert.columns.len(), 2);
        let InsertSource::Query(SelectQuery::Values(values)) = &insert.source else {
            panic!("expected a VALUES source");
        };
        assert_eq!(values.rows.len(), 2);
    }

    #[test]
    fn insert_select_with_cte_and_returning() {
        let Statement::Insert(insert) = parse(
            "WITH src AS (SELECT * FROM staging) INSERT INTO t SELECT * FROM src RETURNING id",
        ) else {
            panic!("expected INSERT");
        };
        assert!(insert.with.is_some());
        assert!(matches!(insert.source, InsertSource::Query(SelectQuery::Simple(_))));
        assert_eq!(insert.returning.unwrap().items.len(), 1);
    }

    #[test]
    fn insert_default_values() {
        let Statement::Insert(insert) = parse("INSERT INTO t DEFAULT VALUES") else {
            panic!("expected INSERT");
        };
        assert!(matches!(insert.source, InsertSource::DefaultValues));
    }

    #[test]
    fn default_inside_a_values_row_is_retained() {
        let Statement::Insert(insert) = parse("INSERT INTO t (a, b) VALUES (1, DEFAULT)") else {
            panic!("expected INSERT");
        };
        let InsertSource::Query(SelectQuery::Values(values)) = &insert.source else {
            panic!("expected a VALUES source");
        };
        assert!(matches!(&values.rows[0][1], ValueExpr::Raw(raw) if raw.text == "DEFAULT"));
    }
}

// ============================================================================
// UPDATE
// ============================================================================

mod update {
    use super::*;

    #[test]
    fn full_update() {
        let Statement::Update(update) = parse(
            "UPDATE t AS x SET a = 1, b = DEFAULT FROM u WHERE x.id = u.id RETURNING a",
        ) else {
            panic!("expected UPDATE");
        };
        assert_eq!(update.update.source.name.base().name, "t");
        assert_eq!(update.update.source.alias.as_ref().unwrap().name.name, "x");
        assert_eq!(update.set.items.len(), 2);
        assert!(matches!(update.set.items[0].value, SetValue::Expr(_)));
        assert!(matches!(update.set.items[1].value, SetValue::Default));
        assert!(update.from.is_some());
        assert!(update.where_clause.is_some());
        assert!(update.returning.is_some());
    }

    #[test]
    fn update_with_cte() {
        let Statement::Update(update) =
            parse("WITH dead AS (SELECT id FROM t WHERE expired) UPDATE t SET gone = TRUE WHERE id IN (SELECT id FROM dead)")
        else {
            panic!("expected UPDATE");
        };
        assert!(update.with.is_some());
    }
}

// ============================================================================
// DELETE
// ============================================================================

mod delete {
    use super::*;

    #[test]
    fn delete_using() {
        let Statement::Delete(delete) = parse("DELETE FROM t USING u, v WHERE t.id = u.id") else {
            panic!("expected DELETE");
        };
        let using = delete.using.unwrap();
        assert!(matches!(&using.source, SourceExpr::Table(s) if s.name.base().name == "u"));
        assert_eq!(using.joins.len(), 1);
        assert_eq!(using.joins[0].join_type, JoinType::Comma);
        assert!(delete.where_clause.is_some());
    }

    #[test]
    fn bare_delete() {
        let Statement::Delete(delete) = parse("DELETE FROM audit_log") else {
            panic!("expected DELETE");
        };
        assert!(delete.using.is_none());
        assert!(delete.where_clause.is_none());
    }
}

// ============================================================================
// MERGE
// ============================================================================

mod merge {
    use super::*;

    const TRANSFER_MERGE: &str = "MERGE INTO accounts a \
         USING transfers t ON a.id = t.account_id \
         WHEN MATCHED AND t.amount = 0 THEN DO NOTHING \
         WHEN MATCHED THEN UPDATE SET balance = a.balance + t.amount \
         WHEN NOT MATCHED THEN INSERT (id, balance) VALUES (t.account_id, t.amount)";

    #[test]
    fn when_clauses_preserve_source_order() {
        let Statement::Merge(merge) = parse(TRANSFER_MERGE) else {
            panic!("expected MERGE");
        };
        assert_eq!(merge.target.name.base().name, "accounts");
        assert_eq!(merge.when_clauses.len(), 3);

        assert!(merge.when_clauses[0].matched);
        assert!(merge.when_clauses[0].condition.is_some());
        assert!(matches!(merge.when_clauses[0].action, MergeAction::DoNothing));

        assert!(merge.when_clauses[1].matched);
        assert!(merge.when_clauses[1].condition.is_none());
        assert!(matches!(&merge.when_clauses[1].action, MergeAction::Update { set } if set.items.len() == 1));

        assert!(!merge.when_clauses[2].matched);
        assert!(matches!(
            &merge.when_clauses[2].action,
            MergeAction::Insert { columns, .. } if columns.len() == 2
        ));
    }

    #[test]
    fn not_matched_by_source_delete() {
        let Statement::Merge(merge) = parse(
            "MERGE INTO t USING u ON t.id = u.id WHEN NOT MATCHED BY SOURCE THEN DELETE",
        ) else {
            panic!("expected MERGE");
        };
        let when = &merge.when_clauses[0];
        assert!(!when.matched);
        assert!(when.by_source);
        assert!(matches!(when.action, MergeAction::Delete));
    }

    #[test]
    fn merge_requires_at_least_one_when_clause() {
        assert!(Parser::parse_sql("MERGE INTO t USING u ON TRUE").is_err());
    }
}
