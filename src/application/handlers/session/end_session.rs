//! EndSessionHandler - the instructor ends a live session.

use std::sync::Arc;

use crate::application::handlers::support::{load_session, publish_logged};
use crate::domain::foundation::{
    ClassroomError, CommandMetadata, EventId, SerializableDomainEvent, SessionId, SessionStatus,
};
use crate::domain::session::{CompletionReason, Session, SessionCompleted};
use crate::ports::{Clock, EventPublisher, SessionRepository};

#[derive(Debug, Clone)]
pub struct EndSessionCommand {
    pub session_id: SessionId,
}

pub struct EndSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl EndSessionHandler {
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
        cmd: EndSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, ClassroomError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.authorize_owner(&metadata.user_id, "end this session")?;

        let now = self.clock.now();
        session.complete(now)?;

        // Reconciliation may have completed it since we read it.
        if !self
            .sessions
            .transition(&session, SessionStatus::Active)
            .await?
        {
            return Err(ClassroomError::invalid_transition(
                "Session is no longer active",
            ));
        }
        tracing::info!(session_id = %session.id(), "session ended by instructor");

        let event = SessionCompleted {
            event_id: EventId::new(),
            session_id: *session.id(),
            reason: CompletionReason::EndedByInstructor,
            completed_at: now,
        };
        let envelope = event.to_envelope().caused_by(&metadata);
        publish_logged(self.publisher.as_ref(), envelope).await;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::{noon, Fixture};

    fn handler(f: &Fixture) -> EndSessionHandler {
        EndSessionHandler::new(f.store.clone(), f.bus.clone(), f.clock.clone())
    }

    #[tokio::test]
    async fn ends_active_session_and_stamps_end_time() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Active).await;

        let ended = handler(&f)
            .handle(
                EndSessionCommand {
                    session_id: *session.id(),
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await
            .unwrap();

        assert_eq!(ended.status(), SessionStatus::Completed);
        assert_eq!(ended.actual_end_time(), Some(noon()));
        let stored = f.store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Completed);
        assert!(f.bus.has_event("session.completed.v1"));
    }

    #[tokio::test]
    async fn ending_a_scheduled_session_is_an_invalid_transition() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Scheduled).await;

        let result = handler(&f)
            .handle(
                EndSessionCommand {
                    session_id: *session.id(),
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::InvalidTransition(_))));
        let stored = f.store.find_by_id(session.id()).await.unwrap().unwrap();
        assert!(stored.actual_end_time().is_none());
    }

    #[tokio::test]
    async fn non_owner_cannot_end() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Active).await;

        let result = handler(&f)
            .handle(
                EndSessionCommand {
                    session_id: *session.id(),
                },
                CommandMetadata::instructor("inst-2"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn losing_the_race_to_reconciliation_is_reported() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Active).await;
        let mut completed = session.clone();
        completed.complete(noon()).unwrap();
        f.store
            .transition(&completed, SessionStatus::Active)
            .await
            .unwrap();

        let result = handler(&f)
            .handle(
                EndSessionCommand {
                    session_id: *session.id(),
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::InvalidTransition(_))));
    }
}
