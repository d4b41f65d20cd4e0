//! JoinRoomHandler / LeaveRoomHandler - a participant moves between rooms.
//!
//! Both run under the per-(session, user) lock, and the store performs the
//! close-old/open-new write atomically, so a user is never open in two
//! rooms of the same session.

use std::sync::Arc;

use super::ParticipantLocks;
use crate::domain::breakout::{BreakoutParticipant, BreakoutRoom};
use crate::domain::foundation::{BreakoutRoomId, ClassroomError, CommandMetadata, SessionId};
use crate::ports::{BreakoutRepository, Clock, JoinOutcome};

#[derive(Debug, Clone)]
pub struct JoinRoomCommand {
    pub session_id: SessionId,
    pub room_id: BreakoutRoomId,
}

#[derive(Debug, Clone)]
pub struct LeaveRoomCommand {
    pub session_id: SessionId,
    pub room_id: BreakoutRoomId,
}

async fn load_room(
    breakouts: &dyn BreakoutRepository,
    session_id: &SessionId,
    room_id: &BreakoutRoomId,
) -> Result<BreakoutRoom, ClassroomError> {
    breakouts
        .find_room(room_id)
        .await?
        .filter(|room| &room.session_id == session_id)
        .ok_or_else(|| ClassroomError::not_found("Breakout room", room_id))
}

pub struct JoinRoomHandler {
    breakouts: Arc<dyn BreakoutRepository>,
    locks: Arc<ParticipantLocks>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomHandler {
    pub fn new(
        breakouts: Arc<dyn BreakoutRepository>,
        locks: Arc<ParticipantLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            breakouts,
            locks,
            clock,
        }
    }

    /// Joining the room the user is already in is a no-op returning the
    /// existing row.
    pub async fn handle(
        &self,
        cmd: JoinRoomCommand,
        metadata: CommandMetadata,
    ) -> Result<BreakoutParticipant, ClassroomError> {
        let room = load_room(self.breakouts.as_ref(), &cmd.session_id, &cmd.room_id).await?;
        if !room.is_open() {
            return Err(ClassroomError::invalid_transition("This breakout room has ended"));
        }

        let _guard = self.locks.acquire(room.session_id, &metadata.user_id).await?;
        match self
            .breakouts
            .move_participant(&room, &metadata.user_id, self.clock.now())
            .await?
        {
            JoinOutcome::Joined {
                participant,
                left_room,
            } => {
                tracing::debug!(
                    room_id = %room.id,
                    user_id = %metadata.user_id,
                    left_room = ?left_room.map(|r| r.to_string()),
                    "joined breakout room"
                );
                Ok(participant)
            }
            JoinOutcome::AlreadyInRoom(participant) => Ok(participant),
        }
    }
}

pub struct LeaveRoomHandler {
    breakouts: Arc<dyn BreakoutRepository>,
    locks: Arc<ParticipantLocks>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomHandler {
    pub fn new(
        breakouts: Arc<dyn BreakoutRepository>,
        locks: Arc<ParticipantLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            breakouts,
            locks,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: LeaveRoomCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ClassroomError> {
        let room = load_room(self.breakouts.as_ref(), &cmd.session_id, &cmd.room_id).await?;

        let _guard = self.locks.acquire(room.session_id, &metadata.user_id).await?;
        if !self
            .breakouts
            .leave(&room.id, &metadata.user_id, self.clock.now())
            .await?
        {
            return Err(ClassroomError::not_found("Breakout room participant", &metadata.user_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::Fixture;
    use crate::domain::breakout::{plan_round, AssignmentMode, RoundRequest};
    use crate::domain::foundation::UserId;

    struct Setup {
        f: Fixture,
        session_id: SessionId,
        rooms: Vec<BreakoutRoom>,
        join: JoinRoomHandler,
        leave: LeaveRoomHandler,
    }

    async fn setup(room_count: usize) -> Setup {
        let f = Fixture::new();
        let session_id = SessionId::new();
        let round = plan_round(
            session_id,
            RoundRequest {
                room_count,
                names: vec![],
                mode: AssignmentMode::None,
            },
            &[],
            f.clock.now(),
        )
        .unwrap();
        f.store.open_round(&round).await.unwrap();
        let locks = Arc::new(ParticipantLocks::new());
        let join = JoinRoomHandler::new(f.store.clone(), locks.clone(), f.clock.clone());
        let leave = LeaveRoomHandler::new(f.store.clone(), locks, f.clock.clone());
        Setup {
            session_id,
            rooms: round.rooms,
            join,
            leave,
            f,
        }
    }

    fn join_cmd(s: &Setup, room: usize) -> JoinRoomCommand {
        JoinRoomCommand {
            session_id: s.session_id,
            room_id: s.rooms[room].id,
        }
    }

    #[tokio::test]
    async fn joining_another_room_moves_the_user() {
        let s = setup(2).await;
        let ana = CommandMetadata::student("ana");

        s.join.handle(join_cmd(&s, 0), ana.clone()).await.unwrap();
        s.join.handle(join_cmd(&s, 1), ana.clone()).await.unwrap();

        let open = s
            .f
            .store
            .open_participation(&s.session_id, &UserId::new("ana").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(open.room_id, s.rooms[1].id);
        assert!(s.f.store.open_participants(&s.rooms[0].id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejoining_same_room_is_a_no_op() {
        let s = setup(1).await;
        let ana = CommandMetadata::student("ana");

        let first = s.join.handle(join_cmd(&s, 0), ana.clone()).await.unwrap();
        let second = s.join.handle(join_cmd(&s, 0), ana).await.unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn concurrent_joins_leave_one_open_row() {
        let s = Arc::new(setup(4).await);
        let mut tasks = Vec::new();
        for room in 0..4 {
            let s = s.clone();
            tasks.push(tokio::spawn(async move {
                s.join
                    .handle(join_cmd(&s, room), CommandMetadata::student("ana"))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let mut open = 0;
        for room in &s.rooms {
            open += s.f.store.open_participants(&room.id).await.unwrap().len();
        }
        assert_eq!(open, 1);
    }

    #[tokio::test]
    async fn closed_room_cannot_be_joined() {
        let s = setup(1).await;
        s.f.store
            .close_room(&s.rooms[0].id, s.f.clock.now())
            .await
            .unwrap();

        let result = s.join.handle(join_cmd(&s, 0), CommandMetadata::student("ana")).await;

        assert!(matches!(result, Err(ClassroomError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn leaving_without_an_open_row_is_not_found() {
        let s = setup(1).await;
        let cmd = LeaveRoomCommand {
            session_id: s.session_id,
            room_id: s.rooms[0].id,
        };

        let result = s.leave.handle(cmd.clone(), CommandMetadata::student("ana")).await;
        assert!(matches!(result, Err(ClassroomError::NotFound { .. })));

        s.join.handle(join_cmd(&s, 0), CommandMetadata::student("ana")).await.unwrap();
        assert!(s.leave.handle(cmd, CommandMetadata::student("ana")).await.is_ok());
    }

    #[tokio::test]
    async fn room_from_another_session_is_not_found() {
        let s = setup(1).await;

        let result = s
            .join
            .handle(
                JoinRoomCommand {
                    session_id: SessionId::new(),
                    room_id: s.rooms[0].id,
                },
                CommandMetadata::student("ana"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::NotFound { .. })));
    }
}
