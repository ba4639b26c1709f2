//! Session identity: roles, the opaque session token, and the validator
//! capability used by the auth middleware.
//!
//! Sessions are opaque random tokens stored server-side; the cookie carries
//! nothing but the token itself.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseError;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "session_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "GURU")]
    Guru,
    #[serde(rename = "SISWA")]
    Siswa,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "GURU" => Some(Role::Guru),
            "SISWA" => Some(Role::Siswa),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Guru => "GURU",
            Role::Siswa => "SISWA",
        }
    }
}

/// Authenticated user attached to the request by the session middleware.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    /// Role gate used inside handlers. Insufficient role is reported as 401,
    /// matching the rest of the auth surface (no information about which
    /// role would have been required).
    pub fn require_admin(&self) -> Result<(), crate::error::ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(crate::error::ApiError::unauthorized("Unauthorized"))
        }
    }
}

/// Exchange an opaque token for a user identity.
///
/// The production implementation reads the sessions table; tests substitute
/// an in-memory map.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Option<SessionUser>, DatabaseError>;
}

pub struct PgSessionValidator {
    pool: PgPool,
}

impl PgSessionValidator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    username: String,
    role: String,
}

#[async_trait]
impl SessionValidator for PgSessionValidator {
    async fn validate(&self, token: &str) -> Result<Option<SessionUser>, DatabaseError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT u.id, u.username, u.role \
             FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.token = $1 AND s.expires_at > now()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|r| match Role::parse(&r.role) {
            Some(role) => Some(SessionUser {
                id: r.id,
                username: r.username,
                role,
            }),
            None => {
                tracing::warn!(user = %r.username, role = %r.role, "unknown role on session");
                None
            }
        }))
    }
}

/// Extract the session token from the Cookie request header.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

/// Set-Cookie value for a fresh session: HttpOnly, SameSite=Lax, root path,
/// Secure outside development, lifetime from config (7 days by default).
pub fn session_cookie(token: &str) -> String {
    let max_age = config::config().security.session_expiry_days * 24 * 60 * 60;
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age
    );
    if config::config().security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that expires the session cookie immediately.
pub fn clear_session_cookie() -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE);
    if config::config().security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Random opaque session token (hex, 64 chars).
pub fn generate_session_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_be_bytes(),
    );
    format!("{:x}", hasher.finalize())
}

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn role_parse_roundtrip() {
        for role in [Role::Admin, Role::Guru, Role::Siswa] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("STAFF"), None);
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_token=abc123; lang=id"),
        );
        assert_eq!(session_token_from_headers(&headers), Some("abc123".into()));
    }

    #[test]
    fn missing_cookie_yields_none() {
        assert_eq!(session_token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn session_cookie_carries_required_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("session_token=tok"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age="));
        assert_eq!(
            cookie.contains("Secure"),
            config::config().security.secure_cookies
        );
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn tokens_are_unique_and_opaque() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn password_verification() {
        let hash = hash_password("rahasia123");
        assert!(verify_password("rahasia123", &hash));
        assert!(!verify_password("salah", &hash));
    }
}
