//! Column identifier handling.
//!
//! Postgres cannot bind identifiers as parameters, so column names are the one
//! piece of caller-influenced text that reaches the SQL string. [`Ident`]
//! validates a single column name against `[A-Za-z_][A-Za-z0-9_$]*` and renders
//! it either bare (`num_employees`) or double-quoted (`"num_employees"`).

use crate::error::{JoblyError, JoblyResult};
use std::fmt;

/// A validated, single-segment SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Parse and validate a column name.
    pub fn parse(s: &str) -> JoblyResult<Self> {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(JoblyError::invalid_input("Identifier cannot be empty"));
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(JoblyError::invalid_input(format!(
                "Invalid identifier start character: '{first}'"
            )));
        }
        if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
            return Err(JoblyError::invalid_input(format!(
                "Invalid character in identifier '{s}': '{c}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the identifier bare, as used in WHERE predicates.
    pub fn to_sql(&self) -> String {
        self.0.clone()
    }

    /// Render the identifier double-quoted, as used in SET assignments.
    ///
    /// Validation rules out `"` in the name, so no escaping is needed.
    pub fn to_quoted_sql(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert an input into an [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> JoblyResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(&self)
    }
}
