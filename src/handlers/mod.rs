pub mod academic_year;
pub mod announcement;
pub mod auth;
pub mod cache_admin;
pub mod external;
pub mod schedule;
pub mod student;
pub mod teacher;

use crate::error::ApiError;

/// Pull a required string field out of a request payload, trimming it.
/// Missing or blank fields produce a 400 with the localized message.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}
