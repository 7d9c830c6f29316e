use axum::{extract::State, Extension};

use crate::auth::{Claims, Operation};
use crate::database::models::UserProfile;
use crate::extract::{Json, Path};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{NewUser, UserUpdate};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<UserProfile>> {
    state.policy.require(&claims, Operation::List)?;
    Ok(ApiResponse::success(state.users.list().await?))
}

/// GET /api/v1/users/me - profile of the token's subject
///
/// Looked up fresh from the store, so a deleted or disabled account is
/// refused here even while its token is still valid.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<UserProfile> {
    state.policy.require(&claims, Operation::Get)?;
    Ok(ApiResponse::success(state.users.current(&claims.subject).await?))
}

/// POST /api/v1/user
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<UserProfile> {
    state.policy.require(&claims, Operation::Create)?;
    Ok(ApiResponse::created(state.users.create(new_user).await?))
}

/// PUT /api/v1/user/:id - overwrite the provided fields only
pub async fn put(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<UserProfile> {
    state.policy.require(&claims, Operation::Update)?;
    Ok(ApiResponse::success(state.users.replace(id, update).await?))
}
