// School LMS backend API
//
// Session-cookie authenticated admin/teacher/student routes, a login rate
// limiter, a read-through response cache for upstream announcements, and an
// x-api-key gated read-only surface for partner integrations.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ratelimit;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::SessionValidator;
use crate::cache::ResponseCache;
use crate::ratelimit::LoginRateLimiter;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: Arc<dyn SessionValidator>,
    pub login_limiter: LoginRateLimiter,
    pub cache: ResponseCache,
}

/// Build the full application router.
///
/// Three surfaces: public (root, health, login), session-protected
/// (everything under /api except login and external), and the x-api-key
/// gated /api/external reads. Role checks happen inside handlers so GET and
/// POST on the same path can carry different requirements.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/auth/login", post(handlers::auth::login));

    let protected = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/academic-years",
            get(handlers::academic_year::list).post(handlers::academic_year::create),
        )
        .route(
            "/api/academic-years/:id",
            get(handlers::academic_year::get)
                .put(handlers::academic_year::update)
                .delete(handlers::academic_year::remove),
        )
        .route(
            "/api/teachers",
            get(handlers::teacher::list).post(handlers::teacher::create),
        )
        .route(
            "/api/teachers/:id",
            get(handlers::teacher::get)
                .put(handlers::teacher::update)
                .delete(handlers::teacher::remove),
        )
        .route(
            "/api/schedules",
            get(handlers::schedule::list).post(handlers::schedule::create),
        )
        .route(
            "/api/schedules/:id",
            put(handlers::schedule::update).delete(handlers::schedule::remove),
        )
        .route(
            "/api/students",
            get(handlers::student::list).post(handlers::student::create),
        )
        .route("/api/students/bulk", post(handlers::student::create_bulk))
        .route(
            "/api/students/:id",
            get(handlers::student::get)
                .put(handlers::student::update)
                .delete(handlers::student::remove),
        )
        .route("/api/announcements", get(handlers::announcement::list))
        .route(
            "/api/cache/invalidate",
            post(handlers::cache_admin::invalidate),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::session_auth,
        ));

    let external = Router::new()
        .route("/api/external/students", get(handlers::external::students))
        .route("/api/external/teachers", get(handlers::external::teachers))
        .route(
            "/api/external/schedules",
            get(handlers::external::schedules),
        )
        .route_layer(from_fn(middleware::api_key::require_api_key));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(external)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "sekolah-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth/login | /api/auth/logout | /api/auth/me",
            "academic_years": "/api/academic-years",
            "teachers": "/api/teachers",
            "schedules": "/api/schedules",
            "students": "/api/students",
            "announcements": "/api/announcements",
            "external": "/api/external/{students,teachers,schedules}",
            "health": "/health"
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    match database::manager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "connected" })),
        ),
        Err(err) => {
            tracing::warn!("health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unreachable" })),
            )
        }
    }
}
