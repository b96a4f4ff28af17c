//! # jobly
//!
//! Company and job records over PostgreSQL.
//!
//! - **Partial updates**: [`sql_for_partial_update`] turns an ordered set of
//!   changed fields into a `"col"=$n, ...` SET fragment plus its bind values
//! - **Filtered search**: each entity's [`Filter`] renders only the criteria
//!   that are present, numbered from `$1` in a fixed order
//! - **Access layer**: [`Company`] and [`Job`] operations run against anything
//!   that implements [`GenericClient`], including a transaction
//!
//! ```ignore
//! use jobly::{Job, JobFilter};
//!
//! let jobs = Job::find_all(&client, &JobFilter {
//!     title: Some("engineer".into()),
//!     min_salary: Some(50_000),
//!     has_equity: Some(true),
//! })
//! .await?;
//! ```

pub mod client;
pub mod condition;
pub mod error;
pub mod filter;
pub mod ident;
pub mod migrate;
pub mod models;
pub mod partial_update;
pub mod pool;
pub mod query;
pub mod row;

pub use client::GenericClient;
pub use condition::{Condition, Op};
pub use error::{JoblyError, JoblyResult};
pub use filter::{Filter, PredicateSet, contains_pattern};
pub use ident::{Ident, IntoIdent};
pub use models::{
    Company, CompanyDetail, CompanyFilter, CompanyUpdate, Job, JobDetail, JobFilter, JobSummary,
    JobUpdate, NewCompany, NewJob,
};
pub use partial_update::{PartialUpdate, UpdateFragment, UpdateModel, sql_for_partial_update};
pub use pool::{DEFAULT_MAX_CONNECTIONS, create_pool, create_pool_with_config};
pub use query::{Query, SqlValue, query};
pub use row::{FromRow, RowExt};

pub use deadpool_postgres::Pool;
