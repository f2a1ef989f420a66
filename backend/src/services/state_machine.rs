use serde::Serialize;
use crate::errors::{ConnectionError, ConnectionResult};
use crate::models::{Connection, ConnectionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionAction {
    Request,
    Accept,
    Decline,
    Cancel,
    Disconnect,
}

impl ConnectionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionAction::Request => "request",
            ConnectionAction::Accept => "accept",
            ConnectionAction::Decline => "decline",
            ConnectionAction::Cancel => "cancel",
            ConnectionAction::Disconnect => "disconnect",
        }
    }
}

/// What the store has to write once the pair is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idempotent re-entry; the current row is returned untouched.
    Unchanged,
    /// First row for the pair, always `pending`.
    Create { requester_id: i32, addressee_id: i32 },
    SetStatus { id: i32, status: ConnectionStatus },
}

/// Row after a locked transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub connection: Connection,
    pub changed: bool,
}

/// The transition table.
///
/// `current` is the authoritative pair row read under lock. `recommendable`
/// is the eligibility verdict for `target` as seen by `actor`; it is only
/// consulted when `request` finds no row at all, and `None` there means the
/// gate was not asked.
pub fn decide(
    action: ConnectionAction,
    actor: i32,
    target: i32,
    current: Option<&Connection>,
    recommendable: Option<bool>,
) -> ConnectionResult<Transition> {
    use ConnectionAction::*;
    use ConnectionStatus::*;

    let Some(row) = current else {
        return match (action, recommendable) {
            (Request, Some(true)) => Ok(Transition::Create { requester_id: actor, addressee_id: target }),
            _ => Err(ConnectionError::NotFound),
        };
    };

    let actor_requested = row.requester_id == actor;
    let set = |status: ConnectionStatus| -> ConnectionResult<Transition> {
        Ok(Transition::SetStatus { id: row.id, status })
    };

    match (action, row.status) {
        (Request, Pending) if actor_requested => Ok(Transition::Unchanged),
        // the other side already asked: mutual interest
        (Request, Pending) => set(Accepted),
        (Request, Accepted) => Ok(Transition::Unchanged),
        (Request, status) if status.is_terminal() => Err(ConnectionError::InvalidState),

        (Accept, Pending) if actor_requested => Err(ConnectionError::NotFound),
        (Accept, Pending) => set(Accepted),
        (Accept, Accepted) => Ok(Transition::Unchanged),

        (Decline, Pending) if actor_requested => Err(ConnectionError::NotFound),
        (Decline, Pending) => set(Dismissed),
        (Decline, Dismissed) => Ok(Transition::Unchanged),

        (Cancel, Pending) if actor_requested => set(Dismissed),
        (Cancel, Pending) => Err(ConnectionError::NotFound),
        (Cancel, Dismissed) => Ok(Transition::Unchanged),

        (Disconnect, Accepted) => set(Disconnected),
        (Disconnect, Disconnected) => Ok(Transition::Unchanged),

        _ => Err(ConnectionError::InvalidState),
    }
}
