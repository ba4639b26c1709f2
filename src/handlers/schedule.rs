//! Lesson schedule endpoints. Reads are open to any authenticated role;
//! writes are admin only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{Datelike, Local, Weekday};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::required;
use crate::api::pagination::{PageQuery, Pagination};
use crate::auth::SessionUser;
use crate::database::models::schedule::SchedulePayload;
use crate::database::repositories::schedule as repo;
use crate::error::ApiError;
use crate::AppState;

pub const VALID_DAYS: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub today: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Response, ApiError> {
    let today_only = matches!(query.today.as_deref(), Some("true") | Some("1"));
    let day = today_only.then(today_day_name);

    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let pagination = Pagination::from_query(&page_query);

    let (rows, total) = repo::list(&state.pool, day, pagination).await?;
    let headers = pagination.map(|p| p.headers(total)).unwrap_or_default();

    Ok((headers, Json(rows)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;
    let fields = validate(payload)?;

    let schedule = repo::create(
        &state.pool,
        fields.academic_year_id,
        fields.teacher_id,
        &fields.class_name,
        &fields.subject,
        &fields.day,
        fields.start_time,
        fields.end_time,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(schedule)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Response, ApiError> {
    user.require_admin()?;
    let fields = validate(payload)?;

    let schedule = repo::update(
        &state.pool,
        id,
        fields.academic_year_id,
        fields.teacher_id,
        &fields.class_name,
        &fields.subject,
        &fields.day,
        fields.start_time,
        fields.end_time,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Jadwal tidak ditemukan"))?;

    Ok(Json(schedule).into_response())
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    user.require_admin()?;

    if !repo::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("Jadwal tidak ditemukan"));
    }
    Ok(Json(json!({ "message": "Jadwal dihapus" })).into_response())
}

#[derive(Debug)]
struct ValidatedSchedule {
    academic_year_id: Uuid,
    teacher_id: Uuid,
    class_name: String,
    subject: String,
    day: String,
    start_time: chrono::NaiveTime,
    end_time: chrono::NaiveTime,
}

fn validate(payload: SchedulePayload) -> Result<ValidatedSchedule, ApiError> {
    let academic_year_id = payload
        .academic_year_id
        .ok_or_else(|| ApiError::bad_request("Tahun ajaran wajib diisi"))?;
    let teacher_id = payload
        .teacher_id
        .ok_or_else(|| ApiError::bad_request("Guru wajib diisi"))?;
    let class_name = required(payload.class_name, "Kelas wajib diisi")?;
    let subject = required(payload.subject, "Mata pelajaran wajib diisi")?;
    let day = required(payload.day, "Hari wajib diisi")?;
    if !VALID_DAYS.contains(&day.as_str()) {
        return Err(ApiError::bad_request("Hari tidak valid"));
    }
    let start_time = payload
        .start_time
        .ok_or_else(|| ApiError::bad_request("Jam mulai wajib diisi"))?;
    let end_time = payload
        .end_time
        .ok_or_else(|| ApiError::bad_request("Jam selesai wajib diisi"))?;
    if end_time <= start_time {
        return Err(ApiError::bad_request("Jam selesai harus setelah jam mulai"));
    }

    Ok(ValidatedSchedule {
        academic_year_id,
        teacher_id,
        class_name,
        subject,
        day,
        start_time,
        end_time,
    })
}

/// Indonesian day name for the server's local date, matching the values
/// stored in the `day` column.
pub fn today_day_name() -> &'static str {
    match Local::now().weekday() {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_maps_to_a_known_day() {
        assert!(VALID_DAYS.contains(&today_day_name()));
    }

    #[test]
    fn validate_rejects_unknown_day() {
        let payload = SchedulePayload {
            academic_year_id: Some(Uuid::new_v4()),
            teacher_id: Some(Uuid::new_v4()),
            class_name: Some("7A".into()),
            subject: Some("Matematika".into()),
            day: Some("Funday".into()),
            start_time: chrono::NaiveTime::from_hms_opt(7, 0, 0),
            end_time: chrono::NaiveTime::from_hms_opt(8, 30, 0),
        };
        let err = validate(payload).expect_err("should reject");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn validate_rejects_inverted_times() {
        let payload = SchedulePayload {
            academic_year_id: Some(Uuid::new_v4()),
            teacher_id: Some(Uuid::new_v4()),
            class_name: Some("7A".into()),
            subject: Some("Matematika".into()),
            day: Some("Senin".into()),
            start_time: chrono::NaiveTime::from_hms_opt(9, 0, 0),
            end_time: chrono::NaiveTime::from_hms_opt(8, 0, 0),
        };
        let err = validate(payload).expect_err("should reject");
        assert_eq!(err.status_code(), 400);
    }
}
