use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::breakout::{BreakoutParticipant, BreakoutRoom, BreakoutRound};
use crate::domain::foundation::{BreakoutRoomId, DomainError, ErrorCode, SessionId, Timestamp, UserId};
use crate::ports::{BreakoutRepository, JoinOutcome};

#[async_trait]
impl BreakoutRepository for InMemoryStore {
    async fn open_round(&self, round: &BreakoutRound) -> Result<(), DomainError> {
        let Some(session_id) = round.rooms.first().map(|r| r.session_id) else {
            return Ok(());
        };
        let mut state = self.lock()?;
        if state
            .rooms
            .iter()
            .any(|r| r.session_id == session_id && r.is_open())
        {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "A breakout round is already open for this session",
            ));
        }
        state.rooms.extend(round.rooms.iter().cloned());
        state
            .breakout_participants
            .extend(round.participants.iter().cloned());
        Ok(())
    }

    async fn find_room(&self, room_id: &BreakoutRoomId) -> Result<Option<BreakoutRoom>, DomainError> {
        Ok(self.lock()?.rooms.iter().find(|r| &r.id == room_id).cloned())
    }

    async fn open_rooms(&self, session_id: &SessionId) -> Result<Vec<BreakoutRoom>, DomainError> {
        let mut rooms: Vec<BreakoutRoom> = self
            .lock()?
            .rooms
            .iter()
            .filter(|r| &r.session_id == session_id && r.is_open())
            .cloned()
            .collect();
        rooms.sort_by_key(|r| (r.created_at, r.position));
        Ok(rooms)
    }

    async fn open_participants(&self, room_id: &BreakoutRoomId) -> Result<Vec<BreakoutParticipant>, DomainError> {
        let mut rows: Vec<BreakoutParticipant> = self
            .lock()?
            .breakout_participants
            .iter()
            .filter(|p| &p.room_id == room_id && p.is_open())
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.joined_at);
        Ok(rows)
    }

    async fn open_participation(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<Option<BreakoutParticipant>, DomainError> {
        Ok(self
            .lock()?
            .breakout_participants
            .iter()
            .find(|p| &p.session_id == session_id && &p.user_id == user_id && p.is_open())
            .cloned())
    }

    async fn move_participant(
        &self,
        room: &BreakoutRoom,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<JoinOutcome, DomainError> {
        let mut state = self.lock()?;
        let still_open = state
            .rooms
            .iter()
            .find(|r| r.id == room.id)
            .is_some_and(|r| r.is_open());
        if !still_open {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "This breakout room has been closed",
            ));
        }

        if let Some(existing) = state
            .breakout_participants
            .iter()
            .find(|p| p.room_id == room.id && &p.user_id == user_id && p.is_open())
        {
            return Ok(JoinOutcome::AlreadyInRoom(existing.clone()));
        }

        let mut left_room = None;
        for row in state.breakout_participants.iter_mut().filter(|p| {
            p.session_id == room.session_id && &p.user_id == user_id && p.is_open()
        }) {
            row.left_at = Some(now);
            left_room = Some(row.room_id);
        }

        let participant = BreakoutParticipant::enter(room, user_id.clone(), now);
        state.breakout_participants.push(participant.clone());
        Ok(JoinOutcome::Joined {
            participant,
            left_room,
        })
    }

    async fn leave(&self, room_id: &BreakoutRoomId, user_id: &UserId, now: Timestamp) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let row = state
            .breakout_participants
            .iter_mut()
            .find(|p| &p.room_id == room_id && &p.user_id == user_id && p.is_open());
        Ok(match row {
            Some(row) => {
                row.left_at = Some(now);
                true
            }
            None => false,
        })
    }

    async fn close_room(&self, room_id: &BreakoutRoomId, now: Timestamp) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let Some(room) = state
            .rooms
            .iter_mut()
            .find(|r| &r.id == room_id && r.is_open())
        else {
            return Ok(false);
        };
        room.ended_at = Some(now);
        for row in state
            .breakout_participants
            .iter_mut()
            .filter(|p| &p.room_id == room_id && p.is_open())
        {
            row.left_at = Some(now);
        }
        Ok(true)
    }

    async fn close_all(&self, session_id: &SessionId, now: Timestamp) -> Result<usize, DomainError> {
        let open: Vec<BreakoutRoomId> = self.open_rooms(session_id).await?.iter().map(|r| r.id).collect();
        let mut closed = 0;
        for room_id in open {
            if self.close_room(&room_id, now).await? {
                closed += 1;
            }
        }
        Ok(closed)
    }
}
