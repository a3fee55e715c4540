//! The visitor protocol
//!
//! [`SqlVisitor`] is the single contract through which external code
//! observes the tree: one `visit_*` method per node family, entered through
//! `accept` on the node (double dispatch re-expressed as a trait call). A
//! visitor implementation branches over the family enum with `match`, so the
//! compiler flags every visitor that does not handle a newly added variant.
//!
//! The [`Generator`](crate::generator::Generator) is the canonical
//! implementation; read-only analysis walkers live in
//! [`traversal`](crate::traversal).

use crate::expressions::{SelectQuery, SourceExpr, Statement, ValueExpr};

/// One operation per AST node family.
pub trait SqlVisitor {
    type Output;

    fn visit_statement(&mut self, statement: &Statement) -> Self::Output;
    fn visit_query(&mut self, query: &SelectQuery) -> Self::Output;
    fn visit_source(&mut self, source: &SourceExpr) -> Self::Output;
    fn visit_value(&mut self, value: &ValueExpr) -> Self::Output;
}

impl Statement {
    /// Double-dispatch entry point.
    pub fn accept<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_statement(self)
    }
}

impl SelectQuery {
    pub fn accept<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_query(self)
    }
}

impl SourceExpr {
    pub fn accept<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_source(self)
    }
}

impl ValueExpr {
    pub fn accept<V: SqlVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_value(self)
    }
}
