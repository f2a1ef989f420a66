pub mod connections;
pub mod recommendations;

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use crate::constants::CALLER_ID_HEADER;
use crate::db::ConnectionStore;
use crate::errors::ConnectionError;
use crate::services::ConnectionService;

pub use connections::*;
pub use recommendations::*;

#[derive(Clone)]
pub struct AppState<S> {
    pub connections: ConnectionService<S>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, code: &str, message: String) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: code.to_string(),
            message,
        }),
    )
}

impl From<ConnectionError> for (StatusCode, Json<ErrorBody>) {
    fn from(e: ConnectionError) -> Self {
        let status = match &e {
            ConnectionError::NotFound => StatusCode::NOT_FOUND,
            ConnectionError::InvalidTarget => StatusCode::BAD_REQUEST,
            ConnectionError::InvalidState => StatusCode::CONFLICT,
            ConnectionError::Database(db_error) => {
                tracing::error!("Database error while handling request: {}", db_error);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // never leak driver details to callers
        let message = match &e {
            ConnectionError::Database(_) => "Internal database error".to_string(),
            other => other.to_string(),
        };
        api_error(status, e.code(), message)
    }
}

/// Authenticated caller, taken from the header set by the upstream auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .map(Caller)
            .ok_or_else(|| {
                api_error(
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    format!("Missing or invalid {} header", CALLER_ID_HEADER),
                )
            })
    }
}

/// The `{target_id}` path segment. Anything that is not a user id, including
/// values outside the id range, is answered like an unknown user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for Target {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(target_id)) => Ok(Target(target_id)),
            Err(rejection) => {
                tracing::debug!("Rejected target path {}: {}", parts.uri.path(), rejection.body_text());
                Err(ConnectionError::NotFound.into())
            }
        }
    }
}

/// API routes, without transport layers (CORS, tracing) which `main` adds.
pub fn api_router<S: ConnectionStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/connections", get(list_connections::<S>))
        .route("/api/connections/pending", get(list_pending_requests::<S>))
        .route("/api/connections/{target_id}/request", post(request_connection::<S>))
        .route("/api/connections/{target_id}/accept", post(accept_connection::<S>))
        .route("/api/connections/{target_id}/decline", post(decline_connection::<S>))
        .route("/api/connections/{target_id}/cancel", post(cancel_connection::<S>))
        .route("/api/connections/{target_id}/disconnect", post(disconnect_connection::<S>))
        .route("/api/connections/{target_id}/status", get(connection_status::<S>))
        .route("/api/recommendations", get(list_recommendations::<S>))
        .route("/api/recommendations/{target_id}/dismiss", post(dismiss_recommendation::<S>))
        .with_state(state)
}
