//! In-process `ConnectionStore` used by the service tests.
//!
//! A single mutex stands in for the pair lock: `apply_locked` holds it across
//! read, decide and write, which gives the same serialization per pair that
//! the advisory lock gives in Postgres.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use crate::db::store::ConnectionStore;
use crate::errors::{ConnectionError, ConnectionResult};
use crate::models::{Connection, ConnectionStatus, ConnectionSummary, ProfileSnapshot, User};
use crate::services::state_machine::{Applied, Transition};

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i32, User>,
    profiles: BTreeMap<i32, ProfileSnapshot>,
    connections: Vec<Connection>,
    dismissals: Vec<(i32, i32)>,
    next_connection_id: i32,
    ticks: i64,
}

impl MemoryState {
    // Strictly increasing timestamps so recency ordering is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(self.ticks)
    }

    fn latest_pair(&self, a: i32, b: i32) -> Option<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.involves(a) && c.involves(b))
            .fold(None, |best: Option<&Connection>, c| match best {
                Some(best) if !c.is_newer_than(best) => Some(best),
                _ => Some(c),
            })
    }

    fn latest_per_pair(&self, user_id: i32) -> Vec<Connection> {
        let others: HashSet<i32> = self
            .connections
            .iter()
            .filter(|c| c.involves(user_id))
            .map(|c| c.other_party(user_id))
            .collect();
        let mut latest: Vec<Connection> = others
            .into_iter()
            .filter_map(|other| self.latest_pair(user_id, other).cloned())
            .collect();
        latest.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        latest
    }

    fn summary(&self, connection: &Connection, user_id: i32) -> ConnectionSummary {
        let other = connection.other_party(user_id);
        ConnectionSummary {
            connection_id: connection.id,
            user_id: other,
            display_name: self.users.get(&other).map(|u| u.display_name.clone()).unwrap_or_default(),
            since: connection.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user; a profile marks them complete.
    pub async fn add_user(&self, user_id: i32, profile: Option<ProfileSnapshot>) {
        let mut state = self.state.lock().await;
        let now = state.tick();
        state.users.insert(
            user_id,
            User {
                id: user_id,
                display_name: format!("user-{}", user_id),
                profile_complete: profile.is_some(),
                created_at: now,
                updated_at: now,
            },
        );
        if let Some(profile) = profile {
            state.profiles.insert(user_id, profile);
        }
    }

    /// Inserts a raw row, bypassing the state machine, to model legacy writes.
    pub async fn insert_raw(&self, requester_id: i32, addressee_id: i32, status: ConnectionStatus) -> Connection {
        let mut state = self.state.lock().await;
        let now = state.tick();
        state.next_connection_id += 1;
        let connection = Connection {
            id: state.next_connection_id,
            requester_id,
            addressee_id,
            status,
            created_at: now,
            updated_at: now,
        };
        state.connections.push(connection.clone());
        connection
    }

    pub async fn pair_rows(&self, a: i32, b: i32) -> Vec<Connection> {
        let state = self.state.lock().await;
        state
            .connections
            .iter()
            .filter(|c| c.involves(a) && c.involves(b))
            .cloned()
            .collect()
    }
}

impl ConnectionStore for MemoryStore {
    async fn find_user(&self, user_id: i32) -> ConnectionResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn complete_profile(&self, user_id: i32) -> ConnectionResult<Option<ProfileSnapshot>> {
        let state = self.state.lock().await;
        let complete = state.users.get(&user_id).is_some_and(|u| u.profile_complete);
        Ok(if complete { state.profiles.get(&user_id).cloned() } else { None })
    }

    async fn candidate_pool(&self, viewer_id: i32) -> ConnectionResult<Vec<ProfileSnapshot>> {
        let state = self.state.lock().await;
        Ok(state
            .profiles
            .values()
            .filter(|p| p.user_id != viewer_id)
            .filter(|p| state.users.get(&p.user_id).is_some_and(|u| u.profile_complete))
            .filter(|p| state.latest_pair(viewer_id, p.user_id).is_none())
            .filter(|p| !state.dismissals.contains(&(viewer_id, p.user_id)))
            .cloned()
            .collect())
    }

    async fn dismissed_ids(&self, viewer_id: i32) -> ConnectionResult<HashSet<i32>> {
        let state = self.state.lock().await;
        Ok(state
            .dismissals
            .iter()
            .filter(|(viewer, _)| *viewer == viewer_id)
            .map(|(_, dismissed)| *dismissed)
            .collect())
    }

    async fn insert_dismissal(&self, viewer_id: i32, dismissed_id: i32) -> ConnectionResult<bool> {
        let mut state = self.state.lock().await;
        if state.dismissals.contains(&(viewer_id, dismissed_id)) {
            return Ok(false);
        }
        state.dismissals.push((viewer_id, dismissed_id));
        Ok(true)
    }

    async fn latest_pair(&self, user_a: i32, user_b: i32) -> ConnectionResult<Option<Connection>> {
        Ok(self.state.lock().await.latest_pair(user_a, user_b).cloned())
    }

    async fn apply_locked<F>(&self, actor_id: i32, target_id: i32, decide: F) -> ConnectionResult<Applied>
    where
        F: FnOnce(Option<&Connection>) -> ConnectionResult<Transition> + Send,
    {
        let mut state = self.state.lock().await;
        let current = state.latest_pair(actor_id, target_id).cloned();

        match decide(current.as_ref())? {
            Transition::Unchanged => current
                .map(|connection| Applied { connection, changed: false })
                .ok_or(ConnectionError::NotFound),
            Transition::Create { requester_id, addressee_id } => {
                let now = state.tick();
                state.next_connection_id += 1;
                let connection = Connection {
                    id: state.next_connection_id,
                    requester_id,
                    addressee_id,
                    status: ConnectionStatus::Pending,
                    created_at: now,
                    updated_at: now,
                };
                state.connections.push(connection.clone());
                Ok(Applied { connection, changed: true })
            }
            Transition::SetStatus { id, status } => {
                let now = state.tick();
                let row = state
                    .connections
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or(ConnectionError::NotFound)?;
                row.status = status;
                row.updated_at = now;
                Ok(Applied { connection: row.clone(), changed: true })
            }
        }
    }

    async fn accepted_connections(&self, user_id: i32) -> ConnectionResult<Vec<ConnectionSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .latest_per_pair(user_id)
            .iter()
            .filter(|c| c.status == ConnectionStatus::Accepted)
            .map(|c| state.summary(c, user_id))
            .collect())
    }

    async fn incoming_pending(&self, user_id: i32) -> ConnectionResult<Vec<ConnectionSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .latest_per_pair(user_id)
            .iter()
            .filter(|c| c.status == ConnectionStatus::Pending && c.addressee_id == user_id)
            .map(|c| state.summary(c, user_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_row_wins_among_duplicates() {
        let store = MemoryStore::new();
        store.add_user(1, None).await;
        store.add_user(2, None).await;
        store.insert_raw(1, 2, ConnectionStatus::Accepted).await;
        let newest = store.insert_raw(2, 1, ConnectionStatus::Disconnected).await;

        let latest = store.latest_pair(1, 2).await.unwrap().unwrap();
        assert_eq!(latest.id, newest.id);
        assert_eq!(store.latest_pair(2, 1).await.unwrap().unwrap().id, newest.id);
        assert!(store.accepted_connections(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_decision_writes_nothing() {
        let store = MemoryStore::new();
        let result = store
            .apply_locked(1, 2, |_| Err(ConnectionError::InvalidState))
            .await;
        assert!(matches!(result, Err(ConnectionError::InvalidState)));
        assert!(store.pair_rows(1, 2).await.is_empty());
    }
}
