use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::TokenResponse;
use crate::error::ApiError;
use crate::extract::Form;
use crate::state::AppState;

/// OAuth2 password-grant style form body.
#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /token - exchange username and password for a bearer token
///
/// The body is the bare `{access_token, token_type}` pair rather than the
/// usual success envelope, so standard OAuth2 clients can read it.
pub async fn token_post(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .authenticator
        .login(&form.username, &form.password)
        .await?;
    Ok(Json(token))
}
