//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change state and publish events after the write; query
//! handlers only read.

pub mod handlers;

pub use handlers::breakout::{
    BreakoutRoomsView, CloseAllRoomsCommand, CloseAllRoomsHandler, CloseRoomCommand,
    CloseRoomHandler, GetRoomsHandler, GetRoomsQuery, JoinRoomCommand, JoinRoomHandler,
    LeaveRoomCommand, LeaveRoomHandler, OpenRoundCommand, OpenRoundHandler, ParticipantLocks,
    RoomParticipantView, RoomView,
};
pub use handlers::poll::{
    CreatePollCommand, CreatePollHandler, EndPollCommand, EndPollHandler, GetPollHandler,
    GetPollQuery, ListPollsHandler, ListPollsQuery, PollView, RespondToPollCommand,
    RespondToPollHandler,
};
pub use handlers::presence::{
    ActiveParticipant, GetPresenceHandler, GetPresenceQuery, ListActivitiesHandler,
    ListActivitiesQuery, PresenceView, RecordActivityCommand, RecordActivityHandler,
    RecordOutcome,
};
pub use handlers::registration::{RegisterCommand, RegisterHandler, RegisterResult};
pub use handlers::session::{
    CreateSessionCommand, CreateSessionHandler, CreateSessionResult, EndSessionCommand,
    EndSessionHandler, GetSessionHandler, GetSessionQuery, ListSessionsHandler,
    ListSessionsQuery, ParticipantView, ReconcileReport, ReconcileSessionsHandler,
    RemoveSessionCommand, RemoveSessionHandler, SessionDetails, SessionSummary,
    UpdateSessionCommand, UpdateSessionHandler, DEFAULT_MAX_ACTIVE_HOURS,
};
