//! Breakout room and participant rows.

use serde::Serialize;

use crate::domain::foundation::{BreakoutParticipantId, BreakoutRoomId, SessionId, Timestamp, UserId};

/// A breakout room. Closed once `ended_at` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakoutRoom {
    pub id: BreakoutRoomId,
    pub session_id: SessionId,
    pub name: String,
    /// Zero-based index within its round.
    pub position: i32,
    pub created_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

impl BreakoutRoom {
    pub fn open(session_id: SessionId, position: i32, name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: BreakoutRoomId::new(),
            session_id,
            name: name.into(),
            position,
            created_at: now,
            ended_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// One stay of a user in a room. Open while `left_at` is unset.
///
/// `session_id` is copied from the room so the single-open-row rule can be
/// checked without joining through rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakoutParticipant {
    pub id: BreakoutParticipantId,
    pub room_id: BreakoutRoomId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub joined_at: Timestamp,
    pub left_at: Option<Timestamp>,
}

impl BreakoutParticipant {
    pub fn enter(room: &BreakoutRoom, user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: BreakoutParticipantId::new(),
            room_id: room.id,
            session_id: room.session_id,
            user_id,
            joined_at: now,
            left_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.left_at.is_none()
    }
}
