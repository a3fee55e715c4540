//! Error handling tests
//!
//! Failures must carry the position of the offending token, never a
//! partially built tree, and multi-statement errors must report absolute
//! source positions.

use sqlforge_sql::error::Error;
use sqlforge_sql::parser::Parser;

// ============================================================================
// Position reporting
// ============================================================================

mod positions {
    use super::*;

    #[test]
    fn missing_select_list_points_at_from() {
        let err = Parser::parse_sql("SELECT FROM").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "expected a parse error, got {:?}", err);
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(8), "error should point at FROM, not the start");
    }

    #[test]
    fn error_on_a_later_line_reports_that_line() {
        let err = Parser::parse_sql("SELECT *\nFROM t\nWHERE AND").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.column(), Some(7));
    }

    #[test]
    fn tokenizer_errors_carry_positions_too() {
        let err = Parser::parse_sql("SELECT 'unterminated").unwrap_err();
        assert!(matches!(err, Error::Tokenize { .. }));
        assert_eq!(err.column(), Some(8));
    }

    #[test]
    fn unrecognized_leading_keyword_is_named() {
        let err = Parser::parse_sql("FROBNICATE the database").unwrap_err();
        let Error::Parse { message, .. } = &err else {
            panic!("expected a parse error, got {:?}", err);
        };
        assert!(message.contains("FROBNICATE"), "message was: {}", message);
    }
}

// ============================================================================
// Grammar violations
// ============================================================================

mod grammar {
    use super::*;

    #[test]
    fn unbalanced_parentheses() {
        assert!(Parser::parse_sql("SELECT (1 + 2").is_err());
        assert!(Parser::parse_sql("SELECT 1 + 2)").is_err());
        assert!(Parser::parse_sql("SELECT ((1 + 2)").is_err());
    }

    #[test]
    fn operator_in_operand_position() {
        let err = Parser::parse_sql("SELECT * FROM t WHERE a = >").unwrap_err();
        let Error::Parse { message, .. } = &err else {
            panic!("expected a parse error, got {:?}", err);
        };
        assert!(message.contains("operand"), "message was: {}", message);
    }

    #[test]
    fn incomplete_clauses() {
        for sql in [
            "SELECT * FROM t WHERE",
            "SELECT * FROM t WHERE a AND",
            "SELECT * FROM t ORDER BY",
            "SELECT * FROM t GROUP BY",
            "SELECT * FROM",
            "SELECT * FROM t JOIN",
            "WITH a AS (SELECT 1)",
        ] {
            assert!(Parser::parse_sql(sql).is_err(), "expected an error for {:?}", sql);
        }
    }

    #[test]
    fn empty_input() {
        assert!(Parser::parse_sql("").is_err());
        assert!(Parser::parse_sql("  -- just a comment").is_err());
    }

    #[test]
    fn trailing_garbage_after_a_statement() {
        assert!(Parser::parse_sql("SELECT 1 SELECT 2").is_err());
    }
}

// ============================================================================
// Multi-statement error scoping
// ============================================================================

mod multi_statement {
    use super::*;

    const MIXED: &str = "SELECT 1; SELECT FROM; SELECT 3";

    #[test]
    fn parse_many_fails_fast_with_an_absolute_position() {
        let err = Parser::parse_many(MIXED).unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(18), "position must be absolute, not segment-relative");
    }

    #[test]
    fn parse_report_collects_per_segment_results() {
        let report = Parser::parse_report(MIXED);
        assert!(!report.is_ok());
        assert_eq!(report.statements.len(), 2, "the segments around the failure still parse");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].column(), Some(18));
    }

    #[test]
    fn parse_report_on_clean_input_has_no_errors() {
        let report = Parser::parse_report("SELECT 1; SELECT 2");
        assert!(report.is_ok());
        assert_eq!(report.statements.len(), 2);
    }

    #[test]
    fn tokenizer_failure_fails_the_whole_report() {
        let report = Parser::parse_report("SELECT 1; SELECT 'oops");
        assert_eq!(report.statements.len(), 0);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], Error::Tokenize { .. }));
    }
}
