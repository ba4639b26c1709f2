//! Read-only endpoints for partner integrations, behind the x-api-key gate.
//!
//! These keep the legacy limit/offset pagination their consumers were built
//! against; the page/limit convention of the admin routes does not apply
//! here.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::pagination::{OffsetPagination, OffsetQuery};
use crate::database::models::{schedule::Schedule, student::Student, teacher::Teacher};
use crate::database::repositories::{
    schedule as schedule_repo, student as student_repo, teacher as teacher_repo,
};
use crate::error::ApiError;
use crate::AppState;

pub async fn students(
    State(state): State<AppState>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let window = OffsetPagination::from_query(&query);
    let rows = student_repo::list_range(&state.pool, window.limit, window.offset).await?;
    Ok(Json(rows))
}

pub async fn teachers(
    State(state): State<AppState>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<Vec<Teacher>>, ApiError> {
    let window = OffsetPagination::from_query(&query);
    let rows = teacher_repo::list_range(&state.pool, window.limit, window.offset).await?;
    Ok(Json(rows))
}

pub async fn schedules(
    State(state): State<AppState>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    let window = OffsetPagination::from_query(&query);
    let rows = schedule_repo::list_range(&state.pool, window.limit, window.offset).await?;
    Ok(Json(rows))
}
