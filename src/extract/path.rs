use axum::async_trait;
use axum::extract::rejection::PathRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Path parameters whose rejections are [`ApiError`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                tracing::debug!("Path parameters rejected: {}", err.body_text());
                ApiError::bad_request(format!("Invalid path parameter: {}", err.body_text()))
            }
            // The route and the handler disagree; not the caller's fault
            PathRejection::MissingPathParams(err) => {
                tracing::error!("Missing path parameters: {}", err.body_text());
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            other => ApiError::bad_request(other.body_text()),
        }
    }
}
