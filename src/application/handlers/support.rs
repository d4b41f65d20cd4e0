//! Helpers shared by the classroom handlers.

use std::collections::HashMap;

use crate::domain::foundation::{ClassroomError, CommandMetadata, EventEnvelope, SessionId, UserId};
use crate::domain::session::Session;
use crate::ports::{EventPublisher, SessionRepository, UserDirectory};

/// Shown when the user directory has no name for a participant.
pub const UNKNOWN_PARTICIPANT: &str = "Unknown";

pub(crate) async fn load_session(
    sessions: &dyn SessionRepository,
    session_id: &SessionId,
) -> Result<Session, ClassroomError> {
    sessions
        .find_by_id(session_id)
        .await?
        .ok_or_else(|| ClassroomError::not_found("Session", session_id))
}

/// Owner of the session, or any admin.
pub(crate) fn authorize_owner_or_admin(
    session: &Session,
    metadata: &CommandMetadata,
    action: &str,
) -> Result<(), ClassroomError> {
    if metadata.role.is_admin() {
        return Ok(());
    }
    session.authorize_owner(&metadata.user_id, action)
}

/// Resolves display names, falling back to `UNKNOWN_PARTICIPANT`.
pub(crate) async fn resolve_names(
    users: &dyn UserDirectory,
    ids: &[UserId],
) -> Result<HashMap<UserId, String>, ClassroomError> {
    let mut names = users.display_names(ids).await?;
    for id in ids {
        names
            .entry(id.clone())
            .or_insert_with(|| UNKNOWN_PARTICIPANT.to_string());
    }
    Ok(names)
}

/// Publishes an event after its state change is already stored. A failure
/// is logged and otherwise ignored.
pub(crate) async fn publish_logged(publisher: &dyn EventPublisher, envelope: EventEnvelope) {
    let event_type = envelope.event_type.clone();
    if let Err(err) = publisher.publish(envelope).await {
        tracing::warn!(%event_type, error = %err, "failed to publish domain event");
    }
}
