//! Companies: create, search, detail, partial update, delete.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{Filter, PredicateSet, contains_pattern, non_empty};
use crate::models::job::JobSummary;
use crate::partial_update::{PartialUpdate, UpdateModel};
use crate::query::query;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// A company row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

/// Payload for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Payload for [`Company::update`]. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl UpdateModel for CompanyUpdate {
    const COLUMN_ALIASES: &'static [(&'static str, &'static str)] =
        &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

    fn into_partial_update(self) -> PartialUpdate {
        PartialUpdate::new()
            .set_opt("name", self.name)
            .set_opt("description", self.description)
            .set_opt("numEmployees", self.num_employees)
            .set_opt("logoUrl", self.logo_url)
    }
}

/// Search criteria for [`Company::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Bounds of zero are the same as absent, but still take part in the
    /// min/max check.
    #[serde(default)]
    pub min_employees: Option<i32>,
    #[serde(default)]
    pub max_employees: Option<i32>,
}

impl Filter for CompanyFilter {
    fn compose(&self) -> JoblyResult<PredicateSet> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(JoblyError::invalid_input(format!(
                    "Invalid Number of Employees Filter: min_employees ({min}) > max_employees ({max})"
                )));
            }
        }

        let mut set = PredicateSet::new();
        if let Some(name) = non_empty(&self.name) {
            set.push(Condition::ilike("name", contains_pattern(name))?);
        }
        if let Some(min) = self.min_employees.filter(|v| *v != 0) {
            set.push(Condition::gte("num_employees", min)?);
        }
        if let Some(max) = self.max_employees.filter(|v| *v != 0) {
            set.push(Condition::lte("num_employees", max)?);
        }
        Ok(set)
    }
}

impl Company {
    /// Insert a new company.
    ///
    /// Returns [`JoblyError::Conflict`] if the handle is already taken.
    pub async fn create(conn: &impl GenericClient, new: NewCompany) -> JoblyResult<Company> {
        let duplicate = query("SELECT handle FROM companies WHERE handle = $1")
            .tag("company.duplicate_check")
            .bind(new.handle.clone())
            .fetch_opt(conn)
            .await
            .map_err(|e| e.context("company.create"))?;
        if duplicate.is_some() {
            return Err(JoblyError::conflict(format!(
                "Duplicate company: {}",
                new.handle
            )));
        }

        let company: Company = query(format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .tag("company.create")
        .bind(new.handle)
        .bind(new.name)
        .bind(new.description)
        .bind(new.num_employees)
        .bind(new.logo_url)
        .fetch_one_as(conn)
        .await
        .map_err(|e| e.context("company.create"))?;

        tracing::info!(handle = %company.handle, "created company");
        Ok(company)
    }

    /// All companies matching `filter`, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> JoblyResult<Vec<Company>> {
        let predicates = filter.compose()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM companies{} ORDER BY name",
            predicates.where_clause()
        );
        query(sql)
            .tag("company.find_all")
            .bind_all(predicates.into_values())
            .fetch_all_as(conn)
            .await
            .map_err(|e| e.context("company.find_all"))
    }

    /// The company with `handle`, plus its jobs ordered by id.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let company: Company = query(format!(
            "SELECT {COLUMNS} FROM companies WHERE handle = $1"
        ))
        .tag("company.get")
        .bind(handle.to_string())
        .fetch_opt_as(conn)
        .await
        .map_err(|e| e.context("company.get"))?
        .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

        let jobs = query(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .tag("company.jobs")
        .bind(handle.to_string())
        .fetch_all_as(conn)
        .await
        .map_err(|e| e.context("company.get"))?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply the fields present in `changes` and return the full updated row.
    ///
    /// Returns [`JoblyError::InvalidInput`] for an empty payload (before touching the
    /// store) and [`JoblyError::NotFound`] if no company has `handle`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        changes: CompanyUpdate,
    ) -> JoblyResult<Company> {
        let fragment = changes.into_fragment()?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            fragment.set_cols(),
            fragment.next_placeholder()
        );

        query(sql)
            .tag("company.update")
            .bind_all(fragment.into_values())
            .bind(handle.to_string())
            .fetch_opt_as(conn)
            .await
            .map_err(|e| e.context("company.update"))?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))
    }

    /// Delete the company (its jobs go with it) and return the deleted handle.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<String> {
        let row = query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .tag("company.remove")
            .bind(handle.to_string())
            .fetch_opt(conn)
            .await
            .map_err(|e| e.context("company.remove"))?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

        let deleted: String = row.try_get_column("handle")?;
        tracing::info!(handle = %deleted, "removed company");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_without_criteria_is_empty() {
        let set = CompanyFilter::default().compose().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn filter_renders_in_fixed_order() {
        let filter = CompanyFilter {
            name: Some("net".into()),
            min_employees: Some(10),
            max_employees: Some(500),
        };
        let set = filter.compose().unwrap();
        assert_eq!(
            set.where_clause(),
            " WHERE name ILIKE $1 AND num_employees >= $2 AND num_employees <= $3"
        );
        assert_eq!(format!("{:?}", set.values()), r#"["%net%", 10, 500]"#);
    }

    #[test]
    fn filter_numbers_only_present_criteria() {
        let filter = CompanyFilter {
            max_employees: Some(2),
            ..Default::default()
        };
        let set = filter.compose().unwrap();
        assert_eq!(set.predicates(), ["num_employees <= $1"]);
    }

    #[test]
    fn filter_rejects_min_above_max() {
        let filter = CompanyFilter {
            name: None,
            min_employees: Some(10),
            max_employees: Some(5),
        };
        assert!(filter.compose().unwrap_err().is_invalid_input());
    }

    #[test]
    fn filter_allows_equal_bounds() {
        let filter = CompanyFilter {
            name: None,
            min_employees: Some(3),
            max_employees: Some(3),
        };
        assert_eq!(filter.compose().unwrap().len(), 2);
    }

    #[test]
    fn zero_bounds_are_ignored() {
        let filter = CompanyFilter {
            name: None,
            min_employees: Some(0),
            max_employees: Some(0),
        };
        assert!(filter.compose().unwrap().is_empty());

        let filter = CompanyFilter {
            name: None,
            min_employees: Some(0),
            max_employees: Some(3),
        };
        assert_eq!(filter.compose().unwrap().predicates(), ["num_employees <= $1"]);
    }

    #[test]
    fn zero_max_still_checked_against_min() {
        let filter = CompanyFilter {
            name: None,
            min_employees: Some(2),
            max_employees: Some(0),
        };
        assert!(filter.compose().unwrap_err().is_invalid_input());
    }

    #[test]
    fn filter_from_query_keys() {
        let filter: CompanyFilter =
            serde_json::from_str(r#"{"max_employees": 3, "name": "c"}"#).unwrap();
        assert_eq!(filter.name.as_deref(), Some("c"));
        assert_eq!(filter.max_employees, Some(3));
        assert_eq!(filter.min_employees, None);
    }

    #[test]
    fn update_maps_camel_case_fields_to_columns() {
        let changes = CompanyUpdate {
            num_employees: Some(5),
            logo_url: Some("http://new.img".into()),
            ..Default::default()
        };
        let fragment = changes.into_fragment().unwrap();
        assert_eq!(fragment.set_cols(), r#""num_employees"=$1, "logo_url"=$2"#);
        assert_eq!(fragment.next_placeholder(), 3);
    }

    #[test]
    fn update_order_is_declaration_order() {
        let a: CompanyUpdate =
            serde_json::from_str(r#"{"logoUrl": "x", "name": "N", "numEmployees": 1}"#).unwrap();
        let b: CompanyUpdate =
            serde_json::from_str(r#"{"numEmployees": 1, "logoUrl": "x", "name": "N"}"#).unwrap();
        let a = a.into_fragment().unwrap();
        let b = b.into_fragment().unwrap();
        assert_eq!(a.set_cols(), r#""name"=$1, "num_employees"=$2, "logo_url"=$3"#);
        assert_eq!(a.set_cols(), b.set_cols());
    }

    #[test]
    fn empty_update_is_invalid_input() {
        let err = CompanyUpdate::default().into_fragment().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn update_rejects_handle_changes() {
        let parsed = serde_json::from_str::<CompanyUpdate>(r#"{"handle": "c9"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn company_serializes_camel_case() {
        let company = Company {
            handle: "c1".into(),
            name: "C1".into(),
            description: "Desc1".into(),
            num_employees: Some(1),
            logo_url: Some("http://c1.img".into()),
        };
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["numEmployees"], 1);
        assert_eq!(json["logoUrl"], "http://c1.img");
    }
}
