//! Wiring of application handlers from port implementations.

use std::sync::Arc;

use super::breakout::BreakoutHandlers;
use super::poll::PollHandlers;
use super::presence::PresenceHandlers;
use super::session::SessionHandlers;
use crate::adapters::memory::InMemoryStore;
use crate::application::{
    CloseAllRoomsHandler, CloseRoomHandler, CreatePollHandler, CreateSessionHandler,
    EndPollHandler, EndSessionHandler, GetPollHandler, GetPresenceHandler, GetRoomsHandler,
    GetSessionHandler, JoinRoomHandler, LeaveRoomHandler, ListActivitiesHandler,
    ListPollsHandler, ListSessionsHandler, OpenRoundHandler, ParticipantLocks,
    ReconcileSessionsHandler, RecordActivityHandler, RegisterHandler, RemoveSessionHandler,
    RespondToPollHandler, UpdateSessionHandler,
};
use crate::ports::{
    ActivityLog, BreakoutRepository, Clock, CourseCatalog, EventPublisher, PasswordHasher,
    PollRepository, RegistrationRepository, SessionRepository, UserDirectory,
};

/// Every port the classroom handlers depend on.
#[derive(Clone)]
pub struct ClassroomPorts {
    pub sessions: Arc<dyn SessionRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub activity_log: Arc<dyn ActivityLog>,
    pub breakouts: Arc<dyn BreakoutRepository>,
    pub polls: Arc<dyn PollRepository>,
    pub courses: Arc<dyn CourseCatalog>,
    pub users: Arc<dyn UserDirectory>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}

impl ClassroomPorts {
    /// All storage and lookups backed by one in-memory store.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        hasher: Arc<dyn PasswordHasher>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: store.clone(),
            registrations: store.clone(),
            activity_log: store.clone(),
            breakouts: store.clone(),
            polls: store.clone(),
            courses: store.clone(),
            users: store,
            hasher,
            publisher,
            clock,
        }
    }

    /// Reconciliation handler for the background worker.
    pub fn reconciler(&self, max_active_hours: i64) -> ReconcileSessionsHandler {
        ReconcileSessionsHandler::new(self.sessions.clone(), self.publisher.clone(), self.clock.clone())
            .with_max_active_hours(max_active_hours)
    }
}

/// Handler sets for each HTTP area.
#[derive(Clone)]
pub struct ApiHandlers {
    pub sessions: SessionHandlers,
    pub presence: PresenceHandlers,
    pub breakout: BreakoutHandlers,
    pub polls: PollHandlers,
}

impl ApiHandlers {
    pub fn new(p: &ClassroomPorts) -> Self {
        let locks = Arc::new(ParticipantLocks::new());

        let sessions = SessionHandlers {
            create: Arc::new(CreateSessionHandler::new(
                p.sessions.clone(),
                p.courses.clone(),
                p.hasher.clone(),
                p.publisher.clone(),
                p.clock.clone(),
            )),
            get: Arc::new(GetSessionHandler::new(
                p.sessions.clone(),
                p.registrations.clone(),
                p.users.clone(),
            )),
            list: Arc::new(ListSessionsHandler::new(p.sessions.clone(), p.registrations.clone())),
            update: Arc::new(UpdateSessionHandler::new(
                p.sessions.clone(),
                p.hasher.clone(),
                p.clock.clone(),
            )),
            end: Arc::new(EndSessionHandler::new(
                p.sessions.clone(),
                p.publisher.clone(),
                p.clock.clone(),
            )),
            remove: Arc::new(RemoveSessionHandler::new(
                p.sessions.clone(),
                p.publisher.clone(),
                p.clock.clone(),
            )),
            register: Arc::new(RegisterHandler::new(
                p.sessions.clone(),
                p.registrations.clone(),
                p.hasher.clone(),
                p.clock.clone(),
            )),
        };

        let presence = PresenceHandlers {
            record: Arc::new(RecordActivityHandler::new(
                p.activity_log.clone(),
                p.registrations.clone(),
                p.clock.clone(),
            )),
            list: Arc::new(ListActivitiesHandler::new(p.sessions.clone(), p.activity_log.clone())),
            presence: Arc::new(GetPresenceHandler::new(
                p.sessions.clone(),
                p.activity_log.clone(),
                p.users.clone(),
            )),
        };

        let breakout = BreakoutHandlers {
            open: Arc::new(OpenRoundHandler::new(
                p.sessions.clone(),
                p.activity_log.clone(),
                p.breakouts.clone(),
                p.users.clone(),
                p.clock.clone(),
            )),
            rooms: Arc::new(GetRoomsHandler::new(
                p.sessions.clone(),
                p.breakouts.clone(),
                p.users.clone(),
            )),
            join: Arc::new(JoinRoomHandler::new(p.breakouts.clone(), locks.clone(), p.clock.clone())),
            leave: Arc::new(LeaveRoomHandler::new(p.breakouts.clone(), locks, p.clock.clone())),
            close: Arc::new(CloseRoomHandler::new(
                p.sessions.clone(),
                p.breakouts.clone(),
                p.clock.clone(),
            )),
            close_all: Arc::new(CloseAllRoomsHandler::new(
                p.sessions.clone(),
                p.breakouts.clone(),
                p.clock.clone(),
            )),
        };

        let polls = PollHandlers {
            create: Arc::new(CreatePollHandler::new(
                p.sessions.clone(),
                p.polls.clone(),
                p.clock.clone(),
            )),
            list: Arc::new(ListPollsHandler::new(p.polls.clone())),
            get: Arc::new(GetPollHandler::new(p.polls.clone())),
            respond: Arc::new(RespondToPollHandler::new(
                p.sessions.clone(),
                p.registrations.clone(),
                p.polls.clone(),
                p.clock.clone(),
            )),
            end: Arc::new(EndPollHandler::new(p.polls.clone(), p.clock.clone())),
        };

        Self {
            sessions,
            presence,
            breakout,
            polls,
        }
    }
}
