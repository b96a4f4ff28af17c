//! Optional-filter WHERE composition.
//!
//! Each searchable entity implements [`Filter`] by checking its criteria in a
//! fixed order and pushing one [`Condition`] per criterion that is present.
//! Placeholders are numbered in push order starting at `$1`, so the rendered
//! text depends only on which criteria are set, never on how the input was
//! assembled.

use crate::condition::Condition;
use crate::error::JoblyResult;
use crate::query::SqlValue;

/// Rendered predicates and their values, `values[i]` ↔ `$i+1`.
#[derive(Debug, Clone, Default)]
pub struct PredicateSet {
    predicates: Vec<String>,
    values: Vec<SqlValue>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `condition` with the next placeholder and record its value.
    pub fn push(&mut self, condition: Condition) -> &mut Self {
        let mut idx = self.values.len();
        let (sql, value) = condition.build(&mut idx);
        self.predicates.push(sql);
        self.values.push(value);
        self
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// ` WHERE a AND b ...`, or an empty string when there are no predicates.
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        format!(" WHERE {}", self.predicates.join(" AND "))
    }
}

/// A set of optional search criteria for one entity.
pub trait Filter {
    /// Validate cross-field rules and render the predicates that apply.
    fn compose(&self) -> JoblyResult<PredicateSet>;
}

/// `%text%` for a case-insensitive substring match, with `\`, `%` and `_` in
/// `text` escaped so they match literally.
pub fn contains_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// `Some(text)` when the text filter carries something to match.
pub(crate) fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|s| !s.is_empty())
}
