//! CloseRoomHandler / CloseAllRoomsHandler - instructor ends breakout rooms.

use std::sync::Arc;

use crate::application::handlers::support::load_session;
use crate::domain::foundation::{BreakoutRoomId, ClassroomError, CommandMetadata, SessionId};
use crate::ports::{BreakoutRepository, Clock, SessionRepository};

#[derive(Debug, Clone)]
pub struct CloseRoomCommand {
    pub session_id: SessionId,
    pub room_id: BreakoutRoomId,
}

#[derive(Debug, Clone)]
pub struct CloseAllRoomsCommand {
    pub session_id: SessionId,
}

pub struct CloseRoomHandler {
    sessions: Arc<dyn SessionRepository>,
    breakouts: Arc<dyn BreakoutRepository>,
    clock: Arc<dyn Clock>,
}

impl CloseRoomHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        breakouts: Arc<dyn BreakoutRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            breakouts,
            clock,
        }
    }

    /// Closing an already closed room succeeds without changes.
    pub async fn handle(
        &self,
        cmd: CloseRoomCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.authorize_owner(&metadata.user_id, "close breakout rooms")?;

        let room = self
            .breakouts
            .find_room(&cmd.room_id)
            .await?
            .filter(|room| room.session_id == cmd.session_id)
            .ok_or_else(|| ClassroomError::not_found("Breakout room", cmd.room_id))?;

        if self.breakouts.close_room(&room.id, self.clock.now()).await? {
            tracing::info!(session_id = %cmd.session_id, room_id = %room.id, "breakout room closed");
        }
        Ok(())
    }
}

pub struct CloseAllRoomsHandler {
    sessions: Arc<dyn SessionRepository>,
    breakouts: Arc<dyn BreakoutRepository>,
    clock: Arc<dyn Clock>,
}

impl CloseAllRoomsHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        breakouts: Arc<dyn BreakoutRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            breakouts,
            clock,
        }
    }

    /// Returns how many rooms were closed.
    pub async fn handle(
        &self,
        cmd: CloseAllRoomsCommand,
        metadata: CommandMetadata,
    ) -> Result<usize, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.authorize_owner(&metadata.user_id, "close breakout rooms")?;

        let closed = self
            .breakouts
            .close_all(&cmd.session_id, self.clock.now())
            .await?;
        tracing::info!(session_id = %cmd.session_id, closed, "all breakout rooms closed");
        Ok(closed)
    }
}
