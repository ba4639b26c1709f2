use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Student enrollment for an academic year.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    /// Student number (NIS).
    pub nis: String,
    pub name: String,
    pub class_name: String,
    pub academic_year_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentPayload {
    pub nis: Option<String>,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub academic_year_id: Option<Uuid>,
}

/// Outcome of one item in a bulk enrollment. Failures never abort the batch.
#[derive(Debug, Serialize)]
pub struct BulkStudentResult {
    pub index: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
