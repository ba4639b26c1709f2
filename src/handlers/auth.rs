//! Login, logout, and session introspection.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, SessionUser};
use crate::config;
use crate::database::repositories::{session as session_repo, user as user_repo};
use crate::error::ApiError;
use crate::ratelimit::{FALLBACK_CLIENT_KEY, RATE_LIMIT_MESSAGE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
///
/// Rate-limited per client before credentials are even looked at, so a
/// brute-force run burns its budget regardless of outcome.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let client_key = client_key_from_headers(&headers);
    if !state.login_limiter.check(&client_key) {
        tracing::warn!(client = %client_key, "login rate limit exceeded");
        return Err(ApiError::too_many_requests(RATE_LIMIT_MESSAGE));
    }

    let username = body
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Username wajib diisi"))?;
    let password = body
        .password
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password wajib diisi"))?;

    let user = user_repo::find_by_username(&state.pool, username)
        .await?
        .filter(|u| auth::verify_password(password, &u.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Username atau password salah"))?;

    let token = auth::generate_session_token();
    let expires_at =
        Utc::now() + Duration::days(config::config().security.session_expiry_days);
    session_repo::create(&state.pool, &token, user.id, expires_at).await?;

    tracing::info!(user = %user.username, "login successful");

    Ok((
        [(header::SET_COOKIE, auth::session_cookie(&token))],
        Json(json!({
            "user": {
                "id": user.id,
                "username": user.username,
                "name": user.name,
                "role": user.role,
            }
        })),
    )
        .into_response())
}

/// POST /api/auth/logout - drop the session row and expire the cookie.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = auth::session_token_from_headers(&headers) {
        session_repo::delete(&state.pool, &token).await?;
    }

    Ok((
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Json(json!({ "message": "Logout berhasil" })),
    )
        .into_response())
}

/// GET /api/auth/me
pub async fn me(Extension(user): Extension<SessionUser>) -> Json<SessionUser> {
    Json(user)
}

/// Client identity for the login limiter: proxy headers when present,
/// otherwise the shared anonymous bucket.
fn client_key_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(FALLBACK_CLIENT_KEY)
        .to_string()
}
