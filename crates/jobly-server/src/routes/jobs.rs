use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::Validate;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jobly::{Job, JobFilter, JobUpdate, NewJob};
use serde_json::{Value, json};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list).post(create))
        .route("/jobs/:id", get(detail).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(new) = payload?;
    new.validate()?;

    let conn = state.conn().await?;
    let job = Job::create(&conn, new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

async fn list(
    State(state): State<AppState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(filter) = filter?;

    let conn = state.conn().await?;
    let jobs = Job::find_all(&conn, &filter).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

async fn detail(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;

    let conn = state.conn().await?;
    let job = Job::get(&conn, id).await?;
    Ok(Json(json!({ "job": job })))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    changes.validate()?;

    let conn = state.conn().await?;
    let job = Job::update(&conn, id, changes).await?;
    Ok(Json(json!({ "job": job })))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;

    let conn = state.conn().await?;
    let deleted = Job::remove(&conn, id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
