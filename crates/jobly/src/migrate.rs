//! Schema migrations via [`refinery`].
//!
//! The SQL files under `crates/jobly/migrations` are embedded at compile time.

use crate::error::JoblyResult;
use deadpool_postgres::Pool;
use refinery::Report;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Apply all pending migrations on a single connection.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = embedded::migrations::runner().run_async(client).await?;
    for migration in report.applied_migrations() {
        tracing::info!(
            version = migration.version(),
            name = migration.name(),
            "applied migration"
        );
    }
    Ok(report)
}

/// Apply all pending migrations using a connection checked out of `pool`.
pub async fn run_pool(pool: &Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
