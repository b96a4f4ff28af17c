//! HTTP routing.
//!
//! Handlers extract and validate the request, check out a pooled connection,
//! call the access layer, and wrap the result in the response envelope.

mod companies;
mod jobs;

use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(companies::routes())
        .merge(jobs::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
