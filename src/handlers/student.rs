//! Student enrollment CRUD (admin only) plus bulk creation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::required;
use crate::api::pagination::{PageQuery, Pagination};
use crate::auth::SessionUser;
use crate::database::models::student::{BulkStudentResult, Student, StudentPayload};
use crate::database::repositories::student as repo;
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

    let student = repo::find(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Siswa tidak ditemukan"))?;
    Ok(Json(student).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<StudentPayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let student = insert_one(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(student)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct BulkStudentRequest {
    pub students: Vec<StudentPayload>,
}

/// POST /api/students/bulk
///
/// Items are processed independently; one failure never aborts the batch.
/// The response lists every item's outcome in input order.
pub async fn create_bulk(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<BulkStudentRequest>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    if body.students.is_empty() {
        return Err(ApiError::bad_request("Daftar siswa tidak boleh kosong"));
    }

    let mut results = Vec::with_capacity(body.students.len());
    for (index, item) in body.students.into_iter().enumerate() {
        match insert_one(&state.pool, item).await {
            Ok(student) => results.push(BulkStudentResult {
                index,
                success: true,
                id: Some(student.id),
                error: None,
            }),
            Err(err) => results.push(BulkStudentResult {
                index,
                success: false,
                id: None,
                error: Some(err.message().to_string()),
            }),
        }
    }

    Ok(Json(json!({ "results": results })).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StudentPayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    let (nis, name, class_name, academic_year_id) = validate(payload)?;
    let student = repo::update(&state.pool, id, &nis, &name, &class_name, academic_year_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Siswa tidak ditemukan"))?;

    Ok(Json(student).into_response())
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    if !repo::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Siswa tidak ditemukan"));
    }
    Ok(Json(json!({ "message": "Siswa dihapus" })).into_response())
}

fn validate(payload: StudentPayload) -> Result<(String, String, String, Uuid), ApiError> {
    let nis = required(payload.nis, "NIS wajib diisi")?;
    let name = required(payload.name, "Nama siswa wajib diisi")?;
    let class_name = required(payload.class_name, "Kelas wajib diisi")?;
    let academic_year_id = payload
        .academic_year_id
        .ok_or_else(|| ApiError::bad_request("Tahun ajaran wajib diisi"))?;
    Ok((nis, name, class_name, academic_year_id))
}

async fn insert_one(pool: &PgPool, payload: StudentPayload) -> Result<Student, ApiError> {
    let (nis, name, class_name, academic_year_id) = validate(payload)?;
    let student = repo::create(pool, &nis, &name, &class_name, academic_year_id).await?;
    Ok(student)
}
