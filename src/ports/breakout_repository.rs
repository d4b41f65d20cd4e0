//! Breakout repository port.
//!
//! Two operations must be atomic in every implementation:
//!
//! - `open_round` inserts rooms only if the session has no open room
//! - `move_participant` closes the user's other open row in the session and
//!   opens the new one in a single step, so a user is never open in two
//!   rooms at once

use async_trait::async_trait;

use crate::domain::breakout::{BreakoutParticipant, BreakoutRoom, BreakoutRound};
use crate::domain::foundation::{BreakoutRoomId, DomainError, SessionId, Timestamp, UserId};

/// Result of a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new row was opened; `left_room` is the room the user was moved out of.
    Joined {
        participant: BreakoutParticipant,
        left_room: Option<BreakoutRoomId>,
    },
    /// The user already had an open row in this room.
    AlreadyInRoom(BreakoutParticipant),
}

#[async_trait]
pub trait BreakoutRepository: Send + Sync {
    /// Stores a round's rooms and initial participants.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session already has an open room
    async fn open_round(&self, round: &BreakoutRound) -> Result<(), DomainError>;

    async fn find_room(&self, room_id: &BreakoutRoomId) -> Result<Option<BreakoutRoom>, DomainError>;

    /// Open rooms of the session in round order.
    async fn open_rooms(&self, session_id: &SessionId) -> Result<Vec<BreakoutRoom>, DomainError>;

    /// Open participant rows of a room, earliest join first.
    async fn open_participants(&self, room_id: &BreakoutRoomId) -> Result<Vec<BreakoutParticipant>, DomainError>;

    /// The user's open row in any room of the session.
    async fn open_participation(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<Option<BreakoutParticipant>, DomainError>;

    /// Moves the user into `room`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the room closed before the write
    async fn move_participant(
        &self,
        room: &BreakoutRoom,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<JoinOutcome, DomainError>;

    /// Stamps `left_at` on the user's open row in the room. Returns `false`
    /// if there was none.
    async fn leave(&self, room_id: &BreakoutRoomId, user_id: &UserId, now: Timestamp) -> Result<bool, DomainError>;

    /// Ends the room and every open row in it. Returns `false` if the room
    /// was already closed.
    async fn close_room(&self, room_id: &BreakoutRoomId, now: Timestamp) -> Result<bool, DomainError>;

    /// Closes every open room of the session, returning how many closed.
    async fn close_all(&self, session_id: &SessionId, now: Timestamp) -> Result<usize, DomainError>;
}
