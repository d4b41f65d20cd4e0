//! RemoveSessionHandler - deletes a session that never went live.

use std::sync::Arc;

use crate::application::handlers::support::{load_session, publish_logged};
use crate::domain::foundation::{
    ClassroomError, CommandMetadata, EventId, SerializableDomainEvent, SessionId,
};
use crate::domain::session::SessionDeleted;
use crate::ports::{Clock, EventPublisher, SessionRepository};

#[derive(Debug, Clone)]
pub struct RemoveSessionCommand {
    pub session_id: SessionId,
}

pub struct RemoveSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl RemoveSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            publisher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: RemoveSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.authorize_owner(&metadata.user_id, "delete this session")?;
        session.ensure_deletable()?;

        if !self.sessions.delete_if_removable(session.id()).await? {
            return Err(ClassroomError::invalid_transition(
                "Session started before it could be deleted",
            ));
        }
        tracing::info!(session_id = %session.id(), "session deleted");

        let event = SessionDeleted {
            event_id: EventId::new(),
            session_id: *session.id(),
            deleted_by: metadata.user_id.clone(),
            deleted_at: self.clock.now(),
        };
        let envelope = event.to_envelope().caused_by(&metadata);
        publish_logged(self.publisher.as_ref(), envelope).await;

        Ok(())
    }
}
