//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the live classroom domain.

mod auth;
mod command;
mod errors;
mod events;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use command::CommandMetadata;
pub use errors::{ClassroomError, DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{
    ActivityId, BreakoutParticipantId, BreakoutRoomId, CourseId, PollId, PollOptionId,
    PollResponseId, RegistrationId, RoomCode, SessionId, UserId,
};
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
