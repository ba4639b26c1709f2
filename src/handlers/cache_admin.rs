//! Operational cache invalidation (admin only).

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    pub prefix: Option<String>,
}

/// POST /api/cache/invalidate
///
/// Without a prefix the whole cache is dropped. Prefix matching is
/// permissive (starts-with or contains), same as the cache itself.
pub async fn invalidate(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    body: Option<Json<InvalidateRequest>>,
) -> Result<Json<Value>, ApiError> {
    user.require_admin()?;

    let prefix = body.and_then(|Json(b)| b.prefix);
    state.cache.invalidate(prefix.as_deref());
    tracing::info!(prefix = prefix.as_deref().unwrap_or("<all>"), "cache invalidated");

    Ok(Json(json!({ "message": "Cache dibersihkan" })))
}
