use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Staff API",
            "version": version,
            "description": "Employee and user records behind bearer-token authentication",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "token": "/token (public - form username/password)",
                "employees": "/api/v1/employees, /api/v1/employee/:id (protected)",
                "users": "/api/v1/users, /api/v1/users/me, /api/v1/user[/:id] (protected)",
            }
        }
    }))
}

/// GET /health - store liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.credential_store().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
