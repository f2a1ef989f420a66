use std::collections::HashSet;
use std::future::Future;
use sqlx::PgPool;
use crate::db::{connections, dismissals, users};
use crate::errors::ConnectionResult;
use crate::models::{Connection, ConnectionSummary, ProfileSnapshot, User};
use crate::services::state_machine::{Applied, Transition};

/// Persistence seam for the connection and recommendation services.
///
/// `apply_locked` is the only mutating pair operation: it holds an exclusive
/// lock on the pair for the duration of `decide` and the resulting write.
pub trait ConnectionStore: Clone + Send + Sync + 'static {
    fn find_user(&self, user_id: i32) -> impl Future<Output = ConnectionResult<Option<User>>> + Send;

    fn complete_profile(&self, user_id: i32) -> impl Future<Output = ConnectionResult<Option<ProfileSnapshot>>> + Send;

    fn candidate_pool(&self, viewer_id: i32) -> impl Future<Output = ConnectionResult<Vec<ProfileSnapshot>>> + Send;

    fn dismissed_ids(&self, viewer_id: i32) -> impl Future<Output = ConnectionResult<HashSet<i32>>> + Send;

    fn insert_dismissal(&self, viewer_id: i32, dismissed_id: i32) -> impl Future<Output = ConnectionResult<bool>> + Send;

    /// Unlocked read of the authoritative pair row.
    fn latest_pair(&self, user_a: i32, user_b: i32) -> impl Future<Output = ConnectionResult<Option<Connection>>> + Send;

    fn apply_locked<F>(
        &self,
        actor_id: i32,
        target_id: i32,
        decide: F,
    ) -> impl Future<Output = ConnectionResult<Applied>> + Send
    where
        F: FnOnce(Option<&Connection>) -> ConnectionResult<Transition> + Send;

    fn accepted_connections(&self, user_id: i32) -> impl Future<Output = ConnectionResult<Vec<ConnectionSummary>>> + Send;

    fn incoming_pending(&self, user_id: i32) -> impl Future<Output = ConnectionResult<Vec<ConnectionSummary>>> + Send;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ConnectionStore for PgStore {
    async fn find_user(&self, user_id: i32) -> ConnectionResult<Option<User>> {
        Ok(users::get_user_by_id(&self.pool, user_id).await?)
    }

    async fn complete_profile(&self, user_id: i32) -> ConnectionResult<Option<ProfileSnapshot>> {
        Ok(users::get_complete_profile(&self.pool, user_id).await?)
    }

    async fn candidate_pool(&self, viewer_id: i32) -> ConnectionResult<Vec<ProfileSnapshot>> {
        Ok(users::get_candidate_pool(&self.pool, viewer_id).await?)
    }

    async fn dismissed_ids(&self, viewer_id: i32) -> ConnectionResult<HashSet<i32>> {
        Ok(dismissals::get_dismissed_ids(&self.pool, viewer_id).await?)
    }

    async fn insert_dismissal(&self, viewer_id: i32, dismissed_id: i32) -> ConnectionResult<bool> {
        Ok(dismissals::insert_dismissal(&self.pool, viewer_id, dismissed_id).await?)
    }

    async fn latest_pair(&self, user_a: i32, user_b: i32) -> ConnectionResult<Option<Connection>> {
        Ok(connections::get_latest_pair(&self.pool, user_a, user_b).await?)
    }

    async fn apply_locked<F>(&self, actor_id: i32, target_id: i32, decide: F) -> ConnectionResult<Applied>
    where
        F: FnOnce(Option<&Connection>) -> ConnectionResult<Transition> + Send,
    {
        connections::apply_transition(&self.pool, actor_id, target_id, decide).await
    }

    async fn accepted_connections(&self, user_id: i32) -> ConnectionResult<Vec<ConnectionSummary>> {
        Ok(connections::get_accepted_connections(&self.pool, user_id).await?)
    }

    async fn incoming_pending(&self, user_id: i32) -> ConnectionResult<Vec<ConnectionSummary>> {
        Ok(connections::get_incoming_pending(&self.pool, user_id).await?)
    }
}
