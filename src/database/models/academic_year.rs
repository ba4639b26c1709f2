use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// School year, e.g. "2025/2026 Ganjil". At most one is active at a time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AcademicYear {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AcademicYearPayload {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
