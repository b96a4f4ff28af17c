//! Jobs: create, search, detail, partial update, delete.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{Filter, PredicateSet, contains_pattern, non_empty};
use crate::models::company::Company;
use crate::partial_update::{PartialUpdate, UpdateModel};
use crate::query::query;
use crate::row::{FromRow, RowExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

/// A job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for JobSummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

/// A job with its owning company embedded in place of the handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

impl JobDetail {
    fn new(job: Job, company: Company) -> Self {
        Self {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        }
    }
}

/// Payload for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Payload for [`Job::update`]. The owning company cannot change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
}

impl UpdateModel for JobUpdate {
    fn into_partial_update(self) -> PartialUpdate {
        PartialUpdate::new()
            .set_opt("title", self.title)
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity)
    }
}

/// Search criteria for [`Job::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Case-insensitive substring of the job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Zero is the same as absent.
    #[serde(default, rename = "minSalary")]
    pub min_salary: Option<i32>,
    /// `true` restricts to jobs with non-zero equity; `false` is the same as absent.
    #[serde(default, rename = "hasEquity")]
    pub has_equity: Option<bool>,
}

impl Filter for JobFilter {
    fn compose(&self) -> JoblyResult<PredicateSet> {
        let mut set = PredicateSet::new();
        if let Some(title) = non_empty(&self.title) {
            set.push(Condition::ilike("title", contains_pattern(title))?);
        }
        if let Some(min) = self.min_salary.filter(|v| *v != 0) {
            set.push(Condition::gte("salary", min)?);
        }
        if self.has_equity == Some(true) {
            set.push(Condition::ne("equity", Decimal::ZERO)?);
        }
        Ok(set)
    }
}

async fn company_exists(conn: &impl GenericClient, handle: &str) -> JoblyResult<bool> {
    let row = query("SELECT handle FROM companies WHERE handle = $1")
        .tag("job.company_check")
        .bind(handle.to_string())
        .fetch_opt(conn)
        .await?;
    Ok(row.is_some())
}

impl Job {
    /// Insert a new job under an existing company.
    ///
    /// Returns [`JoblyError::NotFound`] if the company does not exist; nothing
    /// is inserted in that case.
    pub async fn create(conn: &impl GenericClient, new: NewJob) -> JoblyResult<Job> {
        let handle = new.company_handle;
        if !company_exists(conn, &handle)
            .await
            .map_err(|e| e.context("job.create"))?
        {
            return Err(JoblyError::not_found(format!("No such company: {handle}")));
        }

        let job: Job = query(format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .tag("job.create")
        .bind(new.title)
        .bind(new.salary)
        .bind(new.equity)
        .bind(handle.clone())
        .fetch_one_as(conn)
        .await
        .map_err(|e| match e {
            // company deleted between the check and the insert
            JoblyError::NotFound(_) => {
                JoblyError::not_found(format!("No such company: {handle}"))
            }
            other => other.context("job.create"),
        })?;

        tracing::info!(id = job.id, company = %job.company_handle, "created job");
        Ok(job)
    }

    /// All jobs matching `filter`, ordered by title.
    pub async fn find_all(conn: &impl GenericClient, filter: &JobFilter) -> JoblyResult<Vec<Job>> {
        let predicates = filter.compose()?;
        let sql = format!(
            "SELECT {COLUMNS} FROM jobs{} ORDER BY title",
            predicates.where_clause()
        );
        query(sql)
            .tag("job.find_all")
            .bind_all(predicates.into_values())
            .fetch_all_as(conn)
            .await
            .map_err(|e| e.context("job.find_all"))
    }

    /// The job with `id`, with its company embedded.
    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
        let job: Job = query(format!("SELECT {COLUMNS} FROM jobs WHERE id = $1"))
            .tag("job.get")
            .bind(id)
            .fetch_opt_as(conn)
            .await
            .map_err(|e| e.context("job.get"))?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;

        let company: Company = query(
            "SELECT handle, name, description, num_employees, logo_url FROM companies WHERE handle = $1",
        )
        .tag("job.company")
        .bind(job.company_handle.clone())
        .fetch_opt_as(conn)
        .await
        .map_err(|e| e.context("job.get"))?
        .ok_or_else(|| JoblyError::not_found(format!("No company: {}", job.company_handle)))?;

        Ok(JobDetail::new(job, company))
    }

    /// Apply the fields present in `changes` and return the full updated row.
    pub async fn update(conn: &impl GenericClient, id: i32, changes: JobUpdate) -> JoblyResult<Job> {
        let fragment = changes.into_fragment()?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            fragment.set_cols(),
            fragment.next_placeholder()
        );

        query(sql)
            .tag("job.update")
            .bind_all(fragment.into_values())
            .bind(id)
            .fetch_opt_as(conn)
            .await
            .map_err(|e| e.context("job.update"))?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))
    }

    /// Delete the job and return its id.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<i32> {
        let row = query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .tag("job.remove")
            .bind(id)
            .fetch_opt(conn)
            .await
            .map_err(|e| e.context("job.remove"))?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;

        let deleted: i32 = row.try_get_column("id")?;
        tracing::info!(id = deleted, "removed job");
        Ok(deleted)
    }
}
