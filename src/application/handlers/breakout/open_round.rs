//! OpenRoundHandler - opens a round of breakout rooms.

use std::sync::Arc;

use super::views::{room_views, RoomView};
use crate::application::handlers::support::load_session;
use crate::domain::breakout::{plan_round, RoundRequest};
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId};
use crate::domain::presence::active_participants;
use crate::ports::{ActivityLog, BreakoutRepository, Clock, SessionRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct OpenRoundCommand {
    pub session_id: SessionId,
    pub request: RoundRequest,
}

pub struct OpenRoundHandler {
    sessions: Arc<dyn SessionRepository>,
    log: Arc<dyn ActivityLog>,
    breakouts: Arc<dyn BreakoutRepository>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl OpenRoundHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        log: Arc<dyn ActivityLog>,
        breakouts: Arc<dyn BreakoutRepository>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            log,
            breakouts,
            users,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: OpenRoundCommand,
        metadata: CommandMetadata,
    ) -> Result<Vec<RoomView>, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.ensure_active("open breakout rooms")?;
        session.authorize_owner(&metadata.user_id, "create breakout rooms")?;

        if !self.breakouts.open_rooms(&cmd.session_id).await?.is_empty() {
            return Err(ClassroomError::invalid_transition(
                "There are already open breakout rooms in this session",
            ));
        }

        let active = active_participants(self.log.participant_summaries(&cmd.session_id).await?);
        let round = plan_round(cmd.session_id, cmd.request, &active, self.clock.now())?;

        // The store re-checks for an open round atomically with the insert.
        self.breakouts.open_round(&round).await?;
        tracing::info!(
            session_id = %cmd.session_id,
            rooms = round.rooms.len(),
            assigned = round.participants.len(),
            "breakout round opened"
        );

        room_views(self.breakouts.as_ref(), self.users.as_ref(), round.rooms).await
    }
}
