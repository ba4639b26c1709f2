use axum::{extract::Request, middleware::Next, response::Response};

use crate::config;
use crate::error::ApiError;

/// Static API-key gate for the /api/external routes.
///
/// The header is compared against the configured secret; an unconfigured
/// secret rejects everything rather than letting requests through.
pub async fn require_api_key(request: Request, next: Next) -> Result<Response, ApiError> {
    let expected = config::config().security.external_api_key.as_str();
    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    if expected.is_empty() || provided != Some(expected) {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    Ok(next.run(request).await)
}
