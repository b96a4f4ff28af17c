//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jobly::JoblyError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid request data
    #[error("{0}")]
    BadRequest(String),

    /// Missing credentials or not an admin
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Jobly(#[from] JoblyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Jobly(JoblyError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Jobly(JoblyError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Jobly(JoblyError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Jobly(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Store failures are logged and replaced.
    fn client_message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Jobly(
                JoblyError::InvalidInput(message)
                | JoblyError::NotFound(message)
                | JoblyError::Conflict(message),
            ) => message.clone(),
            ApiError::Jobly(err) => {
                tracing::error!(error = %err, "store failure");
                "Internal Server Error".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": {
                "message": self.client_message(),
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), 400),
            (ApiError::Unauthorized, 401),
            (JoblyError::invalid_input("No data").into(), 400),
            (JoblyError::not_found("No job: 0").into(), 404),
            (JoblyError::conflict("Duplicate company: c1").into(), 409),
            (JoblyError::Pool("timed out".into()).into(), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status().as_u16(), code, "{err}");
        }
    }

    #[test]
    fn client_errors_carry_their_message() {
        let err: ApiError = JoblyError::not_found("No company: nope").into();
        assert_eq!(err.client_message(), "No company: nope");
    }

    #[test]
    fn store_failures_are_masked() {
        let err: ApiError = JoblyError::Connection("password authentication failed".into()).into();
        assert_eq!(err.client_message(), "Internal Server Error");
    }
}
