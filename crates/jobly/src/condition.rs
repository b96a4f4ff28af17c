//! Single-column predicates for WHERE clauses.
//!
//! A [`Condition`] pairs a validated column with an operator and one bound
//! value. Rendering assigns the placeholder number, so the caller decides the
//! numbering sequence and the value list stays aligned with it.

use crate::error::JoblyResult;
use crate::ident::{Ident, IntoIdent};
use crate::query::SqlValue;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// column != value
    Ne,
    /// column >= value
    Gte,
    /// column <= value
    Lte,
    /// Case-insensitive pattern match (PostgreSQL ILIKE)
    Ilike,
}

impl Op {
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Ne => "!=",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Ilike => "ILIKE",
        }
    }
}

/// A `column <op> $n` predicate with its bound value.
#[derive(Debug, Clone)]
pub struct Condition {
    column: Ident,
    op: Op,
    value: SqlValue,
}

impl Condition {
    fn new<I, T>(column: I, op: Op, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Ok(Self {
            column: column.into_ident()?,
            op,
            value: Arc::new(value),
        })
    }

    /// Create an inequality condition: column != value
    pub fn ne<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ne, value)
    }

    /// Create a greater-than-or-equal condition: column >= value
    pub fn gte<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Gte, value)
    }

    /// Create a less-than-or-equal condition: column <= value
    pub fn lte<I, T>(column: I, value: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Lte, value)
    }

    /// Create a case-insensitive ILIKE condition: column ILIKE pattern
    pub fn ilike<I, T>(column: I, pattern: T) -> JoblyResult<Self>
    where
        I: IntoIdent,
        T: ToSql + Send + Sync + 'static,
    {
        Self::new(column, Op::Ilike, pattern)
    }

    /// Render the predicate with the next placeholder number and return its value.
    pub fn build(&self, param_idx: &mut usize) -> (String, SqlValue) {
        *param_idx += 1;
        let sql = format!("{} {} ${}", self.column.to_sql(), self.op.as_sql(), *param_idx);
        (sql, self.value.clone())
    }
}
