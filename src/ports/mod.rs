//! Ports - interfaces between the classroom domain and the outside world.
//!
//! Adapters implement these traits; application handlers depend on them
//! only through `Arc<dyn ...>`.
//!
//! ## Storage
//!
//! - `SessionRepository`, `RegistrationRepository`
//! - `ActivityLog` - append-only presence records
//! - `BreakoutRepository`, `PollRepository`
//!
//! ## Platform lookups
//!
//! - `CourseCatalog`, `UserDirectory`
//!
//! ## Infrastructure
//!
//! - `Clock`, `PasswordHasher`, `EventPublisher`, `SessionValidator`

mod activity_log;
mod breakout_repository;
mod clock;
mod directory;
mod event_publisher;
mod password_hasher;
mod poll_repository;
mod registration_repository;
mod session_repository;
mod session_validator;

pub use activity_log::ActivityLog;
pub use breakout_repository::{BreakoutRepository, JoinOutcome};
pub use clock::Clock;
pub use directory::{CourseCatalog, UserDirectory};
pub use event_publisher::EventPublisher;
pub use password_hasher::PasswordHasher;
pub use poll_repository::PollRepository;
pub use registration_repository::RegistrationRepository;
pub use session_repository::{SessionFilter, SessionRepository, Timeframe};
pub use session_validator::SessionValidator;
