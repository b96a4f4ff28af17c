use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validate::Validate;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jobly::{Company, CompanyFilter, CompanyUpdate, NewCompany};
use serde_json::{Value, json};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list).post(create))
        .route("/companies/:handle", get(detail).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(new) = payload?;
    new.validate()?;

    let conn = state.conn().await?;
    let company = Company::create(&conn, new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

async fn list(
    State(state): State<AppState>,
    filter: Result<Query<CompanyFilter>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(filter) = filter?;

    let conn = state.conn().await?;
    let companies = Company::find_all(&conn, &filter).await?;
    Ok(Json(json!({ "companies": companies })))
}

async fn detail(
    State(state): State<AppState>,
    handle: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(handle) = handle?;

    let conn = state.conn().await?;
    let company = Company::get(&conn, &handle).await?;
    Ok(Json(json!({ "company": company })))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    handle: Result<Path<String>, PathRejection>,
    payload: Result<Json<CompanyUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(handle) = handle?;
    let Json(changes) = payload?;
    changes.validate()?;

    let conn = state.conn().await?;
    let company = Company::update(&conn, &handle, changes).await?;
    Ok(Json(json!({ "company": company })))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminUser,
    handle: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(handle) = handle?;

    let conn = state.conn().await?;
    let deleted = Company::remove(&conn, &handle).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
