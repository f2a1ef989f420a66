use axum::{
    extract::State,
    response::Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use crate::db::ConnectionStore;
use crate::models::ConnectionSummary;
use crate::services::ActionResponse;
use super::{ApiError, AppState, Caller, Target};

#[derive(Debug, Serialize)]
pub struct ConnectionStatusResponse {
    pub accepted: bool,
    pub pending_or_accepted: bool,
}

pub async fn request_connection<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<ActionResponse>, ApiError> {
    let response = state.connections.request(actor_id, target_id).await?;
    Ok(Json(response))
}

pub async fn accept_connection<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<ActionResponse>, ApiError> {
    let response = state.connections.accept(actor_id, target_id).await?;
    Ok(Json(response))
}

pub async fn decline_connection<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<ActionResponse>, ApiError> {
    let response = state.connections.decline(actor_id, target_id).await?;
    Ok(Json(response))
}

pub async fn cancel_connection<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<ActionResponse>, ApiError> {
    let response = state.connections.cancel(actor_id, target_id).await?;
    Ok(Json(response))
}

pub async fn disconnect_connection<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<Value>, ApiError> {
    state.connections.disconnect(actor_id, target_id).await?;
    Ok(Json(json!({})))
}

pub async fn list_connections<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
) -> Result<Json<Vec<ConnectionSummary>>, ApiError> {
    let connections = state.connections.list_connections(actor_id).await?;
    Ok(Json(connections))
}

/// Requests waiting for the caller's answer.
pub async fn list_pending_requests<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
) -> Result<Json<Vec<ConnectionSummary>>, ApiError> {
    let pending = state.connections.list_pending_requests(actor_id).await?;
    Ok(Json(pending))
}

/// Relationship predicates consumed by the chat and profile services.
pub async fn connection_status<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<ConnectionStatusResponse>, ApiError> {
    let accepted = state.connections.has_accepted_connection(actor_id, target_id).await?;
    let pending_or_accepted = state.connections.has_pending_or_accepted(actor_id, target_id).await?;
    Ok(Json(ConnectionStatusResponse { accepted, pending_or_accepted }))
}
