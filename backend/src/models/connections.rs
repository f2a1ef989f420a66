use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "connection_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Dismissed,
    Disconnected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Dismissed => "dismissed",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }

    /// No forward transition exists out of these.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionStatus::Dismissed | ConnectionStatus::Disconnected)
    }
}

/// The pair row. `requester_id` only carries meaning while `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Connection {
    pub id: i32,
    pub requester_id: i32,
    pub addressee_id: i32,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    pub fn involves(&self, user_id: i32) -> bool {
        self.requester_id == user_id || self.addressee_id == user_id
    }

    pub fn other_party(&self, user_id: i32) -> i32 {
        if self.requester_id == user_id {
            self.addressee_id
        } else {
            self.requester_id
        }
    }

    /// Recency order used to pick the authoritative row among duplicates.
    pub fn is_newer_than(&self, other: &Connection) -> bool {
        (self.updated_at, self.id) > (other.updated_at, other.id)
    }
}

/// One entry of a user's connection or pending-request list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ConnectionSummary {
    pub connection_id: i32,
    pub user_id: i32,
    pub display_name: String,
    pub since: DateTime<Utc>,
}

/// Unordered pair with more than one stored row, reported by `pair_audit`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DuplicatePair {
    pub low_id: i32,
    pub high_id: i32,
    pub row_count: i64,
    pub winning_id: i32,
    pub winning_status: ConnectionStatus,
}

/// Orders a pair so the lower id comes first.
pub fn ordered_pair(a: i32, b: i32) -> (i32, i32) {
    if a < b { (a, b) } else { (b, a) }
}
