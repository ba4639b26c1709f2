use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Teacher {
    pub id: Uuid,
    /// Login account backing this profile.
    pub user_id: Uuid,
    /// Employee number (NIP).
    pub nip: String,
    pub name: String,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeacherPayload {
    pub nip: Option<String>,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeacherPayload {
    pub nip: Option<String>,
    pub name: Option<String>,
    pub subject: Option<String>,
}
