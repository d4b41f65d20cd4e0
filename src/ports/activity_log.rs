//! Activity log port - append-only presence records.
//!
//! Implementations must never update or delete a stored record. The
//! per-participant summary should be served from an index on
//! `(session, user, occurred_at)` rather than a full scan.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, Timestamp, UserId};
use crate::domain::presence::{ActivityRecord, ParticipantActivity};

#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn append(&self, record: &ActivityRecord) -> Result<(), DomainError>;

    /// Timestamp of the user's most recent `join` in the session.
    async fn latest_join(&self, session_id: &SessionId, user_id: &UserId) -> Result<Option<Timestamp>, DomainError>;

    /// One summary per user with any record in the session. Ties on
    /// timestamp resolve to the record inserted last.
    async fn participant_summaries(&self, session_id: &SessionId) -> Result<Vec<ParticipantActivity>, DomainError>;

    /// Every record for the session in insertion order.
    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<ActivityRecord>, DomainError>;
}
