//! Partial-update SET fragments.
//!
//! A [`PartialUpdate`] is an ordered list of `(field, value)` pairs. Order is
//! the order of [`PartialUpdate::set`] calls, never the iteration order of a
//! map, so the same update always renders the same SQL text.
//!
//! ```ignore
//! let fragment = sql_for_partial_update(
//!     PartialUpdate::new().set("firstName", "Aliya").set("age", 32_i32),
//!     &[("age", "official_age")],
//! )?;
//! assert_eq!(fragment.set_cols(), r#""firstName"=$1, "official_age"=$2"#);
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::ident::Ident;
use crate::query::SqlValue;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Field name → storage column name.
pub type ColumnAliases<'a> = &'a [(&'a str, &'a str)];

/// Ordered field assignments for a partial update.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct PartialUpdate {
    fields: Vec<(String, SqlValue)>,
}

impl PartialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `field`.
    ///
    /// Setting a field twice keeps its first position and the last value.
    pub fn set<T>(mut self, field: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let field = field.into();
        let value: SqlValue = Arc::new(value);
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    /// Assign `value` to `field` when it is `Some`; `None` leaves the field untouched.
    pub fn set_opt<T>(self, field: impl Into<String>, value: Option<T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in assignment order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// A rendered SET list and the values it binds, `values[i]` ↔ `$i+1`.
#[derive(Debug, Clone)]
pub struct UpdateFragment {
    assignments: Vec<String>,
    values: Vec<SqlValue>,
}

impl UpdateFragment {
    /// `"column"=$n` clauses in order.
    pub fn assignments(&self) -> &[String] {
        &self.assignments
    }

    /// The clauses joined for a `SET` list.
    pub fn set_cols(&self) -> String {
        self.assignments.join(", ")
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Placeholder number for the first parameter that follows this fragment
    /// (typically the primary key in the `WHERE` clause).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build the SET fragment of an `UPDATE` from `update`.
///
/// Each field resolves to `aliases[field]`, falling back to the field name,
/// and renders as `"column"=$position` with 1-based positions.
///
/// Returns [`JoblyError::InvalidInput`] when `update` has no fields.
pub fn sql_for_partial_update(
    update: PartialUpdate,
    aliases: ColumnAliases<'_>,
) -> JoblyResult<UpdateFragment> {
    if update.is_empty() {
        return Err(JoblyError::invalid_input("No data"));
    }

    let mut assignments = Vec::with_capacity(update.len());
    let mut values = Vec::with_capacity(update.len());

    for (idx, (field, value)) in update.fields.into_iter().enumerate() {
        let column = aliases
            .iter()
            .find(|(from, _)| *from == field)
            .map(|(_, to)| *to)
            .unwrap_or(field.as_str());
        let column = Ident::parse(column)?;

        let mut clause = column.to_quoted_sql();
        clause.push_str("=$");
        clause.push_str(&(idx + 1).to_string());
        assignments.push(clause);
        values.push(value);
    }

    Ok(UpdateFragment {
        assignments,
        values,
    })
}

/// A typed payload that can be applied as a partial update.
pub trait UpdateModel {
    /// Field → column renames for this table.
    const COLUMN_ALIASES: &'static [(&'static str, &'static str)] = &[];

    /// The fields the payload actually carries, in a fixed declaration order.
    fn into_partial_update(self) -> PartialUpdate;

    /// Render the SET fragment for this payload.
    fn into_fragment(self) -> JoblyResult<UpdateFragment>
    where
        Self: Sized,
    {
        sql_for_partial_update(self.into_partial_update(), Self::COLUMN_ALIASES)
    }
}
