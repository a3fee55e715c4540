//! DDL parsing tests: CREATE TABLE (both forms), index DDL, ALTER TABLE
//! DROP CONSTRAINT, CLUSTER, CHECKPOINT, REINDEX.

use sqlforge_sql::error::Error;
use sqlforge_sql::expressions::*;
use sqlforge_sql::parser::Parser;

fn parse(sql: &str) -> Statement {
    Parser::parse_sql(sql).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", sql, e))
}

// ============================================================================
// CREATE TABLE
// ============================================================================

mod create_table {
    use super::*;

    #[test]
    fn classic_column_and_constraint_list() {
        let Statement::CreateTable(create) = parse(
            "CREATE TABLE users ( \
                 id bigint PRIMARY KEY, \
                 email varchar(255) NOT NULL UNIQUE, \
                 age int CHECK (age >= 0), \
                 team_id int REFERENCES teams (id) ON DELETE CASCADE, \
                 created_at timestamp with time zone DEFAULT now(), \
                 UNIQUE (email, team_id), \
                 CONSTRAINT users_team_fk FOREIGN KEY (team_id) REFERENCES teams (id) ON UPDATE RESTRICT \
             )",
        ) else {
            panic!("expected CREATE TABLE");
        };
        assert_eq!(create.columns.len(), 5);
        assert_eq!(create.constraints.len(), 2);
        assert!(create.as_select.is_none());

        let email = &create.columns[1];
        assert_eq!(email.data_type.name, "varchar");
        assert_eq!(email.data_type.modifiers.len(), 1);
        assert!(matches!(email.constraints[0].kind, ColumnConstraintKind::NotNull));
        assert!(matches!(email.constraints[1].kind, ColumnConstraintKind::Unique));

        let team = &create.columns[3];
        let ColumnConstraintKind::References(reference) = &team.constraints[0].kind else {
            panic!("expected a REFERENCES constraint");
        };
        assert_eq!(reference.on_delete, Some(ReferentialAction::Cascade));

        assert_eq!(create.columns[4].data_type.name, "timestamp with time zone");

        let TableConstraintKind::ForeignKey { columns, reference } = &create.constraints[1].kind
        else {
            panic!("expected a FOREIGN KEY table constraint");
        };
        assert_eq!(columns.len(), 1);
        assert_eq!(reference.on_update, Some(ReferentialAction::Restrict));
        assert_eq!(create.constraints[1].name.as_ref().unwrap().name, "users_team_fk");
    }

    #[test]
    fn temporary_and_if_not_exists() {
        let Statement::CreateTable(create) =
            parse("CREATE TEMPORARY TABLE IF NOT EXISTS scratch (id int)")
        else {
            panic!("expected CREATE TABLE");
        };
        assert!(create.temporary);
        assert!(create.if_not_exists);
    }

    #[test]
    fn create_table_as_select() {
        let Statement::CreateTable(create) =
            parse("CREATE TABLE summary AS SELECT dept, count(*) FROM emp GROUP BY dept")
        else {
            panic!("expected CREATE TABLE");
        };
        assert!(create.columns.is_empty());
        assert!(matches!(create.as_select, Some(SelectQuery::Simple(_))));
    }

    #[test]
    fn table_name_must_be_followed_by_columns_or_as() {
        assert!(Parser::parse_sql("CREATE TABLE t").is_err());
    }
}

// ============================================================================
// Index DDL
// ============================================================================

mod indexes {
    use super::*;

    #[test]
    fn create_index_with_all_options() {
        let Statement::CreateIndex(create) = parse(
            "CREATE UNIQUE INDEX CONCURRENTLY IF NOT EXISTS users_email_idx \
             ON users USING btree (lower(email) DESC NULLS LAST, id) \
             WHERE deleted_at IS NULL",
        ) else {
            panic!("expected CREATE INDEX");
        };
        assert!(create.unique);
        assert!(create.concurrently);
        assert!(create.if_not_exists);
        assert_eq!(create.name.as_ref().unwrap().name, "users_email_idx");
        assert_eq!(create.method.as_ref().unwrap().name, "btree");
        assert_eq!(create.columns.len(), 2);
        assert!(matches!(create.columns[0].expr, ValueExpr::Function(_)));
        assert_eq!(create.columns[0].direction, Some(SortDirection::Desc));
        assert_eq!(create.columns[0].nulls, Some(NullsOrder::Last));
        assert!(create.where_clause.is_some());
    }

    #[test]
    fn anonymous_index() {
        let Statement::CreateIndex(create) = parse("CREATE INDEX ON t (a)") else {
            panic!("expected CREATE INDEX");
        };
        assert!(create.name.is_none());
    }

    #[test]
    fn drop_index_list() {
        let Statement::DropIndex(drop) =
            parse("DROP INDEX CONCURRENTLY IF EXISTS idx_a, idx_b CASCADE")
        else {
            panic!("expected DROP INDEX");
        };
        assert!(drop.concurrently);
        assert!(drop.if_exists);
        assert_eq!(drop.names.len(), 2);
        assert_eq!(drop.behavior, Some(DropBehavior::Cascade));
    }

    #[test]
    fn reindex_targets() {
        let Statement::Reindex(reindex) = parse("REINDEX TABLE sales") else {
            panic!("expected REINDEX");
        };
        assert_eq!(reindex.target, ReindexTarget::Table);
        assert!(!reindex.concurrently);

        let Statement::Reindex(reindex) = parse("REINDEX CONCURRENTLY INDEX sales_idx") else {
            panic!("expected REINDEX");
        };
        assert_eq!(reindex.target, ReindexTarget::Index);
        assert!(reindex.concurrently);
    }
}

// ============================================================================
// ALTER TABLE / maintenance statements
// ============================================================================

mod maintenance {
    use super::*;

    #[test]
    fn drop_constraint() {
        let Statement::DropConstraint(drop) =
            parse("ALTER TABLE orders DROP CONSTRAINT IF EXISTS orders_fk RESTRICT")
        else {
            panic!("expected ALTER TABLE DROP CONSTRAINT");
        };
        assert_eq!(drop.table.base().name, "orders");
        assert!(drop.if_exists);
        assert_eq!(drop.name.name, "orders_fk");
        assert_eq!(drop.behavior, Some(DropBehavior::Restrict));
    }

    #[test]
    fn cluster_variants() {
        assert!(matches!(parse("CHECKPOINT"), Statement::Checkpoint(_)));

        let Statement::Cluster(bare) = parse("CLUSTER") else {
            panic!("expected CLUSTER");
        };
        assert!(bare.table.is_none());

        let Statement::Cluster(with_index) = parse("CLUSTER sales USING sales_pkey") else {
            panic!("expected CLUSTER");
        };
        assert_eq!(with_index.table.as_ref().unwrap().base().name, "sales");
        assert_eq!(with_index.index.as_ref().unwrap().name, "sales_pkey");
    }

    #[test]
    fn unmodeled_ddl_is_an_unsupported_construct() {
        for sql in [
            "CREATE VIEW v AS SELECT 1",
            "DROP TABLE t",
            "ALTER TABLE t ADD COLUMN c int",
        ] {
            match Parser::parse_sql(sql) {
                Err(Error::Unsupported { .. }) => {}
                other => panic!("expected an unsupported-construct error for {:?}, got {:?}", sql, other),
            }
        }
    }
}
