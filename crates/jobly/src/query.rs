//! Executor for pre-numbered SQL (`$1, $2, ...`).

use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::row::FromRow;
use std::sync::Arc;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A bound parameter value, shared between fragments and the final statement.
pub type SqlValue = Arc<dyn ToSql + Sync + Send>;

/// Hand-written SQL plus its positional parameters.
///
/// Values are only ever sent as bind parameters; the SQL text is never
/// rewritten with them.
///
/// # Example
///
/// ```ignore
/// use jobly::query;
///
/// let company: Company = query("SELECT handle, name FROM companies WHERE handle = $1")
///     .bind("c1")
///     .fetch_one_as(&conn)
///     .await?;
/// ```
#[must_use]
pub struct Query {
    sql: String,
    params: Vec<SqlValue>,
    tag: Option<&'static str>,
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: Vec::new(),
        tag: None,
    }
}

impl Query {
    /// Bind the next positional parameter.
    pub fn bind<T: ToSql + Sync + Send + 'static>(mut self, value: T) -> Self {
        self.params.push(Arc::new(value));
        self
    }

    /// Bind already-boxed values in order (e.g. the values of a fragment).
    pub fn bind_all(mut self, values: impl IntoIterator<Item = SqlValue>) -> Self {
        self.params.extend(values);
        self
    }

    /// Label the statement in the SQL log.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    fn trace(&self) {
        tracing::debug!(
            target: "jobly.sql",
            tag = self.tag.unwrap_or("-"),
            param_count = self.params.len(),
            sql = %self.sql,
        );
    }

    /// Execute the query and return all rows
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> JoblyResult<Vec<Row>> {
        self.trace();
        conn.query(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return the first row
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> JoblyResult<Row> {
        self.trace();
        conn.query_one(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return the first row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> JoblyResult<Option<Row>> {
        self.trace();
        conn.query_opt(&self.sql, &self.params_ref()).await
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> JoblyResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }
}
