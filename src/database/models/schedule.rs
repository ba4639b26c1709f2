use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Weekly lesson slot. `day` holds an Indonesian day name (Senin..Minggu).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Schedule {
    pub id: Uuid,
    pub academic_year_id: Uuid,
    pub teacher_id: Uuid,
    pub class_name: String,
    pub subject: String,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SchedulePayload {
    pub academic_year_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub subject: Option<String>,
    pub day: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}
