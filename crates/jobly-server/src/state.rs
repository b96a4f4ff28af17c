use crate::auth::{Authenticator, CurrentUser};
use jobly::{JoblyError, JoblyResult, Pool};
use std::sync::Arc;

/// Shared by every request: the connection pool and the token resolver.
#[derive(Clone)]
pub struct AppState {
    pool: Pool,
    auth: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(pool: Pool, auth: impl Authenticator + 'static) -> Self {
        Self {
            pool,
            auth: Arc::new(auth),
        }
    }

    /// Check a connection out of the pool for the current request.
    pub async fn conn(&self) -> JoblyResult<deadpool_postgres::Client> {
        self.pool.get().await.map_err(JoblyError::from)
    }

    pub fn authenticate(&self, token: &str) -> Option<CurrentUser> {
        self.auth.authenticate(token)
    }
}
