use std::sync::Arc;

use sekolah_api::auth::PgSessionValidator;
use sekolah_api::cache::ResponseCache;
use sekolah_api::config;
use sekolah_api::database::manager;
use sekolah_api::ratelimit::LoginRateLimiter;
use sekolah_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cfg = config::config();
    tracing::info!(environment = ?cfg.environment, "starting sekolah-api");

    let pool = manager::create_pool()?;

    let login_limiter = LoginRateLimiter::new();
    login_limiter.spawn_sweeper();

    let state = AppState {
        pool: pool.clone(),
        sessions: Arc::new(PgSessionValidator::new(pool)),
        login_limiter,
        cache: ResponseCache::new(),
    };

    let port: u16 = std::env::var("SEKOLAH_API_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on port {}", port);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
