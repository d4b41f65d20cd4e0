//! Session domain module.
//!
//! Lifecycle of a live classroom session: creation (scheduled or started
//! immediately), owner edits, manual end, and the time-driven transitions
//! applied by reconciliation.
//!
//! # Events
//!
//! - `SessionCreated`, `SessionStarted`, `SessionCompleted`, `SessionDeleted`

mod aggregate;
mod events;
mod schedule;

pub use aggregate::{
    NewSession, PasswordChange, Session, SessionChanges, SessionSnapshot,
    DEFAULT_MAX_PARTICIPANTS, MAX_TITLE_LENGTH,
};
#[cfg(test)]
pub(crate) use aggregate::test_support;
pub use events::{CompletionReason, SessionCompleted, SessionCreated, SessionDeleted, SessionStarted};
pub use schedule::{parse_session_date, parse_time_of_day, Schedule};
