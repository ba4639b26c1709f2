use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    /// Base URL of the upstream service behind /api/announcements.
    /// Empty string disables the route.
    pub upstream_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Session cookies carry the Secure attribute when true.
    pub secure_cookies: bool,
    pub session_expiry_days: i64,
    /// Shared secret compared against the x-api-key header on /api/external routes.
    pub external_api_key: String,
}

/// Login attempt budget. Window resets entirely when it expires (fixed window,
/// not a rolling average).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_attempts: u32,
    pub window_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("UPSTREAM_BASE_URL") {
            self.api.upstream_base_url = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_DAYS") {
            self.security.session_expiry_days = v.parse().unwrap_or(self.security.session_expiry_days);
        }
        if let Ok(v) = env::var("EXTERNAL_API_KEY") {
            self.security.external_api_key = v;
        }

        // Rate limit overrides
        if let Ok(v) = env::var("RATE_LIMIT_MAX_ATTEMPTS") {
            self.rate_limit.max_attempts = v.parse().unwrap_or(self.rate_limit.max_attempts);
        }
        if let Ok(v) = env::var("RATE_LIMIT_WINDOW_SECS") {
            self.rate_limit.window_secs = v.parse().unwrap_or(self.rate_limit.window_secs);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SWEEP_INTERVAL_SECS") {
            self.rate_limit.sweep_interval_secs =
                v.parse().unwrap_or(self.rate_limit.sweep_interval_secs);
        }

        // Cache overrides
        if let Ok(v) = env::var("CACHE_TTL_MS") {
            self.cache.ttl_ms = v.parse().unwrap_or(self.cache.ttl_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                upstream_base_url: String::new(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                secure_cookies: false,
                session_expiry_days: 7,
                external_api_key: String::new(),
            },
            rate_limit: RateLimitConfig {
                max_attempts: 5,
                window_secs: 60,
                sweep_interval_secs: 300,
            },
            cache: CacheConfig { ttl_ms: 30_000 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                upstream_base_url: String::new(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.sekolah.example".to_string()],
                secure_cookies: true,
                session_expiry_days: 7,
                external_api_key: String::new(),
            },
            rate_limit: RateLimitConfig {
                max_attempts: 5,
                window_secs: 60,
                sweep_interval_secs: 300,
            },
            cache: CacheConfig { ttl_ms: 30_000 },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                upstream_base_url: String::new(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.sekolah.example".to_string()],
                secure_cookies: true,
                session_expiry_days: 7,
                external_api_key: String::new(),
            },
            rate_limit: RateLimitConfig {
                max_attempts: 5,
                window_secs: 60,
                sweep_interval_secs: 300,
            },
            cache: CacheConfig { ttl_ms: 30_000 },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
