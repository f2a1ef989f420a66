use axum::{
    extract::State,
    response::Json,
};
use serde_json::{json, Value};
use crate::db::ConnectionStore;
use crate::services::ScoredCandidate;
use super::{ApiError, AppState, Caller, Target};

/// Recomputed on every call; there is no recommendation cache.
pub async fn list_recommendations<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
) -> Result<Json<Vec<ScoredCandidate>>, ApiError> {
    let recommendations = state.connections.list_recommendations(actor_id).await?;
    tracing::debug!("Serving {} recommendations to user {}", recommendations.len(), actor_id);
    Ok(Json(recommendations))
}

pub async fn dismiss_recommendation<S: ConnectionStore>(
    State(state): State<AppState<S>>,
    Caller(actor_id): Caller,
    Target(target_id): Target,
) -> Result<Json<Value>, ApiError> {
    state.connections.dismiss(actor_id, target_id).await?;
    Ok(Json(json!({})))
}
