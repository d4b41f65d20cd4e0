//! Session lifecycle command and query handlers.

mod create_session;
mod end_session;
mod get_session;
mod list_sessions;
mod reconcile_sessions;
mod remove_session;
mod update_session;

pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use end_session::{EndSessionCommand, EndSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery, ParticipantView, SessionDetails};
pub use list_sessions::{ListSessionsHandler, ListSessionsQuery, SessionSummary};
pub use reconcile_sessions::{ReconcileReport, ReconcileSessionsHandler, DEFAULT_MAX_ACTIVE_HOURS};
pub use remove_session::{RemoveSessionCommand, RemoveSessionHandler};
pub use update_session::{UpdateSessionCommand, UpdateSessionHandler};
