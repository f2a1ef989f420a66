use serde::Serialize;
use crate::db::ConnectionStore;
use crate::errors::{ConnectionError, ConnectionResult};
use crate::models::{ConnectionStatus, ConnectionSummary, User};
use crate::services::eligibility;
use crate::services::scoring::{RecommendationEngine, ScoredCandidate};
use crate::services::state_machine::{decide, Applied, ConnectionAction};

/// Response of request / accept / decline / cancel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub state: ConnectionStatus,
    pub connection_id: Option<i32>,
}

impl From<&Applied> for ActionResponse {
    fn from(applied: &Applied) -> Self {
        Self {
            state: applied.connection.status,
            connection_id: Some(applied.connection.id),
        }
    }
}

/// Entry point for every connection operation a caller can perform.
#[derive(Debug, Clone)]
pub struct ConnectionService<S> {
    store: S,
    engine: RecommendationEngine,
}

impl<S: ConnectionStore> ConnectionService<S> {
    pub fn new(store: S, engine: RecommendationEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub async fn request(&self, actor_id: i32, target_id: i32) -> ConnectionResult<ActionResponse> {
        let applied = self.act(ConnectionAction::Request, actor_id, target_id).await?;
        Ok(ActionResponse::from(&applied))
    }

    pub async fn accept(&self, actor_id: i32, target_id: i32) -> ConnectionResult<ActionResponse> {
        let applied = self.act(ConnectionAction::Accept, actor_id, target_id).await?;
        Ok(ActionResponse::from(&applied))
    }

    pub async fn decline(&self, actor_id: i32, target_id: i32) -> ConnectionResult<ActionResponse> {
        let applied = self.act(ConnectionAction::Decline, actor_id, target_id).await?;
        Ok(ActionResponse::from(&applied))
    }

    pub async fn cancel(&self, actor_id: i32, target_id: i32) -> ConnectionResult<ActionResponse> {
        let applied = self.act(ConnectionAction::Cancel, actor_id, target_id).await?;
        Ok(ActionResponse::from(&applied))
    }

    pub async fn disconnect(&self, actor_id: i32, target_id: i32) -> ConnectionResult<()> {
        self.act(ConnectionAction::Disconnect, actor_id, target_id).await?;
        Ok(())
    }

    /// Hides `target_id` from the actor's future recommendations. Repeating
    /// it is harmless.
    pub async fn dismiss(&self, actor_id: i32, target_id: i32) -> ConnectionResult<()> {
        self.validate_target(actor_id, target_id).await?;
        if self.store.insert_dismissal(actor_id, target_id).await? {
            tracing::info!("User {} dismissed user {}", actor_id, target_id);
        }
        Ok(())
    }

    pub async fn list_connections(&self, actor_id: i32) -> ConnectionResult<Vec<ConnectionSummary>> {
        self.store.accepted_connections(actor_id).await
    }

    /// Requests waiting for the actor's answer.
    pub async fn list_pending_requests(&self, actor_id: i32) -> ConnectionResult<Vec<ConnectionSummary>> {
        self.store.incoming_pending(actor_id).await
    }

    pub async fn list_recommendations(&self, actor_id: i32) -> ConnectionResult<Vec<ScoredCandidate>> {
        eligibility::recommendations_for(&self.store, &self.engine, actor_id).await
    }

    /// Gate used by chat to decide whether a message may be stored.
    pub async fn has_accepted_connection(&self, user_a: i32, user_b: i32) -> ConnectionResult<bool> {
        self.latest_status_in(user_a, user_b, &[ConnectionStatus::Accepted]).await
    }

    /// Gate used by profile and avatar visibility.
    pub async fn has_pending_or_accepted(&self, user_a: i32, user_b: i32) -> ConnectionResult<bool> {
        self.latest_status_in(user_a, user_b, &[ConnectionStatus::Pending, ConnectionStatus::Accepted])
            .await
    }

    async fn latest_status_in(&self, user_a: i32, user_b: i32, statuses: &[ConnectionStatus]) -> ConnectionResult<bool> {
        if user_a == user_b {
            return Ok(false);
        }
        let latest = self.store.latest_pair(user_a, user_b).await?;
        Ok(latest.is_some_and(|c| statuses.contains(&c.status)))
    }

    /// Shape, self-reference and target checks shared by every action.
    async fn validate_target(&self, actor_id: i32, target_id: i32) -> ConnectionResult<User> {
        if actor_id <= 0 || target_id <= 0 {
            return Err(ConnectionError::NotFound);
        }
        if actor_id == target_id {
            return Err(ConnectionError::InvalidTarget);
        }
        match self.store.find_user(target_id).await? {
            Some(user) if user.profile_complete => Ok(user),
            _ => Err(ConnectionError::NotFound),
        }
    }

    async fn act(&self, action: ConnectionAction, actor_id: i32, target_id: i32) -> ConnectionResult<Applied> {
        self.validate_target(actor_id, target_id).await?;

        // Only a request with no pair row at all needs the gate. The answer
        // may be stale by the time the lock is taken; the locked read decides.
        let recommendable = if action == ConnectionAction::Request
            && self.store.latest_pair(actor_id, target_id).await?.is_none()
        {
            Some(eligibility::is_recommendable(&self.store, &self.engine, actor_id, target_id).await?)
        } else {
            None
        };

        let result = self
            .store
            .apply_locked(actor_id, target_id, move |current| {
                decide(action, actor_id, target_id, current, recommendable)
            })
            .await;

        match &result {
            Ok(applied) if applied.changed => tracing::info!(
                "{} by user {} on user {}: connection {} is now {}",
                action.as_str(),
                actor_id,
                target_id,
                applied.connection.id,
                applied.connection.status.as_str()
            ),
            Ok(_) => tracing::debug!("{} by user {} on user {}: no change", action.as_str(), actor_id, target_id),
            Err(ConnectionError::Database(e)) => {
                tracing::error!("{} by user {} on user {} failed: {}", action.as_str(), actor_id, target_id, e)
            }
            Err(e) => tracing::debug!("{} by user {} on user {} rejected: {}", action.as_str(), actor_id, target_id, e.code()),
        }
        result
    }
}
