//! Teacher CRUD (admin only).
//!
//! Creating a teacher is a two-step write: the login account first, then the
//! profile. A failed profile insert deletes the account again so the
//! username is immediately reusable.

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
use crate::auth::{self, Role, SessionUser};
use crate::database::models::teacher::{CreateTeacherPayload, UpdateTeacherPayload};
use crate::database::repositories::{teacher as repo, user as user_repo};
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

    let teacher = repo::find(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Guru tidak ditemukan"))?;
    Ok(Json(teacher).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateTeacherPayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let nip = required(payload.nip, "NIP wajib diisi")?;
    let name = required(payload.name, "Nama guru wajib diisi")?;
    let username = required(payload.username, "Username wajib diisi")?;
    let password = required(payload.password, "Password wajib diisi")?;

    if user_repo::find_by_username(&state.pool, &username)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("Username sudah digunakan"));
    }

    let account = user_repo::create(
        &state.pool,
        &username,
        &auth::hash_password(&password),
        Role::Guru,
        &name,
    )
    .await?;

    match repo::create(
        &state.pool,
        account.id,
        &nip,
        &name,
        payload.subject.as_deref(),
    )
    .await
    {
        Ok(teacher) => Ok((StatusCode::CREATED, Json(teacher)).into_response()),
        Err(err) => {
            // Roll back the half-created account so the username frees up
            if let Err(cleanup) = user_repo::delete(&state.pool, account.id).await {
                tracing::error!(
                    user_id = %account.id,
                    "failed to clean up account after teacher create error: {}",
                    cleanup
                );
            }
            Err(err.into())
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeacherPayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let nip = required(payload.nip, "NIP wajib diisi")?;
    let name = required(payload.name, "Nama guru wajib diisi")?;

    let teacher = repo::update(&state.pool, id, &nip, &name, payload.subject.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Guru tidak ditemukan"))?;

    Ok(Json(teacher).into_response())
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    if !repo::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Guru tidak ditemukan"));
    }
    Ok(Json(json!({ "message": "Guru dihapus" })).into_response())
}
