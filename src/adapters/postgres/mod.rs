//! PostgreSQL adapters - Database implementations for the repository ports.
//!
//! - `PostgresSessionRepository` - sessions, with compare-and-set status writes
//! - `PostgresRegistrationRepository` - one registration per (session, user)
//! - `PostgresActivityLog` - append-only presence log
//! - `PostgresBreakoutRepository` - rooms and participant rows
//! - `PostgresPollRepository` - polls, options and responses
//! - `PostgresDirectory` - course and user lookups

mod activity_log;
mod breakout_repository;
mod directory;
mod poll_repository;
mod registration_repository;
mod rows;
mod session_repository;

pub use activity_log::PostgresActivityLog;
pub use breakout_repository::PostgresBreakoutRepository;
pub use directory::PostgresDirectory;
pub use poll_repository::PostgresPollRepository;
pub use registration_repository::PostgresRegistrationRepository;
pub use session_repository::PostgresSessionRepository;
