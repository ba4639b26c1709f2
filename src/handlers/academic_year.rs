//! Academic year CRUD (admin only).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use super::required;
use crate::api::pagination::{PageQuery, Pagination};
use crate::auth::SessionUser;
use crate::database::repositories::academic_year as repo;
use crate::error::ApiError;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let pagination = Pagination::from_query(&query);
    let (rows, total) = repo::list(&state.pool, pagination).await?;
    let headers = pagination.map(|p| p.headers(total)).unwrap_or_default();

    Ok((headers, Json(rows)).into_response())
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let year = repo::find(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tahun ajaran tidak ditemukan"))?;
    Ok(Json(year).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<crate::database::models::academic_year::AcademicYearPayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let name = required(payload.name, "Nama tahun ajaran wajib diisi")?;
    let year = repo::create(&state.pool, &name, payload.is_active.unwrap_or(false)).await?;

    Ok((StatusCode::CREATED, Json(year)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<crate::database::models::academic_year::AcademicYearPayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let name = required(payload.name, "Nama tahun ajaran wajib diisi")?;
    let year = repo::update(&state.pool, id, &name, payload.is_active.unwrap_or(false))
        .await?
        .ok_or_else(|| ApiError::not_found("Tahun ajaran tidak ditemukan"))?;

    Ok(Json(year).into_response())
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    if !repo::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Tahun ajaran tidak ditemukan"));
    }
    Ok(Json(json!({ "message": "Tahun ajaran dihapus" })).into_response())
}
