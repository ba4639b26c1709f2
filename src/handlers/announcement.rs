//! Announcements proxied from the upstream service through the response
//! cache, so repeated reads inside the TTL never leave the process.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::config;
use crate::error::ApiError;
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let base = config::config().api.upstream_base_url.trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(ApiError::service_unavailable(
            "Layanan pengumuman tidak dikonfigurasi",
        ));
    }

    let url = format!("{}/api/announcements", base);
    let data = state.cache.fetch(&url).await?;
    Ok(Json(data))
}
