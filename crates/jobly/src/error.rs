//! Error types for jobly

use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error taxonomy shared by the builders, the composers and the access layer.
///
/// `InvalidInput`, `NotFound` and `Conflict` are client errors. Every other
/// variant is a store failure and is propagated unchanged apart from the
/// operation context added by [`JoblyError::context`].
#[derive(Debug, Error)]
pub enum JoblyError {
    /// Caller data violates a business rule (empty update, min > max, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A lookup by key matched zero rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique key already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Statement rejected or failed by the store
    #[error("{}", store_message(.context.as_deref(), .source))]
    Store {
        context: Option<String>,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

fn store_message(context: Option<&str>, source: &tokio_postgres::Error) -> String {
    match context {
        Some(ctx) => format!("Store failure during {ctx}: {source}"),
        None => format!("Store failure: {source}"),
    }
}

impl JoblyError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Attach the operation that was running when the store failed.
    ///
    /// Only [`JoblyError::Store`] carries context; client errors pass through untouched.
    pub fn context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Store { source, .. } => Self::Store {
                context: Some(operation.into()),
                source,
            },
            other => other,
        }
    }

    /// Whether the caller supplied data that failed a business rule
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Whether the error came from the store rather than from the caller's input
    pub fn is_store_failure(&self) -> bool {
        !(self.is_invalid_input() || self.is_not_found() || self.is_conflict())
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::Conflict(format!("{constraint}: {message}")),
                "23503" => return Self::NotFound(format!("{constraint}: {message}")),
                _ => {}
            }
        }
        Self::Store {
            context: None,
            source: err,
        }
    }
}

impl From<tokio_postgres::Error> for JoblyError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::from_db_error(err)
    }
}

impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<refinery::Error> for JoblyError {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}
