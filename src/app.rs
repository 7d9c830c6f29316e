use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .merge(public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/token", post(public::token_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{employees, users};

    Router::new()
        .route("/api/v1/employees", get(employees::list))
        .route(
            "/api/v1/employee/:id",
            get(employees::get)
                .post(employees::create)
                .delete(employees::delete)
                .patch(employees::patch)
                .put(employees::put),
        )
        .route("/api/v1/users", get(users::list))
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/user", post(users::create))
        .route("/api/v1/user/:id", put(users::put))
        // route_layer so unmatched paths still 404 instead of 401
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Permissive when no origins are configured, otherwise an explicit allow list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::auth::password::MIN_COST;
    use crate::auth::TokenIssuer;
    use crate::config::AppConfig;
    use crate::database::MemoryStore;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::development();
        config.security.password_hash_cost = MIN_COST;
        config
    }

    fn app() -> Router {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(test_config(), store.clone(), store).unwrap();
        router(state)
    }

    fn bearer(privilege: i32) -> String {
        let issuer = TokenIssuer::new(&test_config().security).unwrap();
        format!("Bearer {}", issuer.issue_default("alice", privilege).unwrap())
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn protected_route_without_token_is_challenged() {
        let response = app()
            .oneshot(Request::get("/api/v1/employees").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid authentication credentials");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found_not_unauthorized() {
        let response = app()
            .oneshot(Request::get("/api/v1/nothing-here").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn read_token_lists_but_cannot_create() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/employees")
                    .header(header::AUTHORIZATION, bearer(1))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["data"].as_array().unwrap().is_empty());

        let response = app
            .oneshot(
                Request::post("/api/v1/employee/1")
                    .header(header::AUTHORIZATION, bearer(1))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn root_and_health_are_public() {
        let app = app();
        for path in ["/", "/health"] {
            let response = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
        }
    }
}
