use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

/// Session gate for every protected route.
///
/// Resolves the `session_token` cookie through the session validator and
/// attaches the resulting [`auth::SessionUser`] to the request. Missing or
/// invalid tokens get a generic 401; validator failures surface as 500 with
/// the detail only in the server log.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = auth::session_token_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let user = state
        .sessions
        .validate(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
