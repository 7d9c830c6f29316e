use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, INVALID_TOKEN_MESSAGE};
use crate::state::AppState;

/// JWT authentication middleware that validates bearer tokens and injects
/// the decoded [`Claims`](crate::auth::Claims) into the request extensions.
///
/// Every rejection, whatever its cause, produces the same 401 body.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).map_err(|reason| {
        tracing::debug!("Rejected request without usable bearer token: {}", reason);
        ApiError::unauthorized(INVALID_TOKEN_MESSAGE)
    })?;

    let claims = state.verifier.verify(token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("missing Authorization header")?
        .to_str()
        .map_err(|_| "Authorization header is not valid ASCII")?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or("Authorization header must use Bearer token format")?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format");
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("empty bearer token");
    }
    Ok(token)
}
