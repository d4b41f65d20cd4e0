//! UpdateSessionHandler - owner edits to a session.

use std::sync::Arc;

use crate::application::handlers::support::load_session;
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId};
use crate::domain::session::{parse_session_date, parse_time_of_day, PasswordChange, Session, SessionChanges};
use crate::ports::{Clock, PasswordHasher, SessionRepository};

/// Patch to a session. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub session_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_participants: Option<u32>,
    pub is_recorded: Option<bool>,
    pub recording_url: Option<String>,
    /// `Some("")` removes the password; any other value replaces it.
    pub password: Option<String>,
}

pub struct UpdateSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl UpdateSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            hasher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, ClassroomError> {
        let mut session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.authorize_owner(&metadata.user_id, "update this session")?;

        let password = match cmd.password {
            None => PasswordChange::Keep,
            Some(plain) if plain.is_empty() => PasswordChange::Clear,
            Some(plain) => PasswordChange::Set(self.hasher.hash(&plain)?),
        };
        let changes = SessionChanges {
            title: cmd.title,
            description: cmd.description,
            session_date: cmd
                .session_date
                .as_deref()
                .map(parse_session_date)
                .transpose()?,
            start_time: cmd
                .start_time
                .as_deref()
                .map(|raw| parse_time_of_day("start_time", raw))
                .transpose()?,
            end_time: cmd
                .end_time
                .as_deref()
                .map(|raw| parse_time_of_day("end_time", raw))
                .transpose()?,
            max_participants: cmd.max_participants,
            is_recorded: cmd.is_recorded,
            recording_url: cmd.recording_url,
            password,
        };

        session.apply_changes(changes, self.clock.now())?;
        self.sessions.update_details(&session).await?;
        tracing::debug!(session_id = %session.id(), "session updated");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::Fixture;
    use crate::domain::foundation::SessionStatus;

    fn handler(f: &Fixture) -> UpdateSessionHandler {
        UpdateSessionHandler::new(f.store.clone(), f.hasher.clone(), f.clock.clone())
    }

    #[tokio::test]
    async fn owner_can_retitle_and_set_password() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Scheduled).await;

        let updated = handler(&f)
            .handle(
                UpdateSessionCommand {
                    session_id: *session.id(),
                    title: Some("Exam prep".to_string()),
                    password: Some("pw".to_string()),
                    ..Default::default()
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await
            .unwrap();

        assert_eq!(updated.title(), "Exam prep");
        assert_eq!(updated.password_hash(), Some("plain$pw"));
    }

    #[tokio::test]
    async fn empty_password_clears_protection() {
        let f = Fixture::new();
        let session = f
            .session_with("inst-1", SessionStatus::Scheduled, |new| {
                new.password_hash = Some("plain$old".to_string())
            })
            .await;

        let updated = handler(&f)
            .handle(
                UpdateSessionCommand {
                    session_id: *session.id(),
                    password: Some(String::new()),
                    ..Default::default()
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await
            .unwrap();

        assert!(!updated.has_password());
    }

    #[tokio::test]
    async fn non_owner_is_denied() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Scheduled).await;

        let result = handler(&f)
            .handle(
                UpdateSessionCommand {
                    session_id: *session.id(),
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
                CommandMetadata::instructor("inst-2"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn rescheduling_an_active_session_is_rejected() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Active).await;

        let result = handler(&f)
            .handle(
                UpdateSessionCommand {
                    session_id: *session.id(),
                    start_time: Some("16:00".to_string()),
                    ..Default::default()
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn recording_url_can_be_attached_after_completion() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Completed).await;

        let updated = handler(&f)
            .handle(
                UpdateSessionCommand {
                    session_id: *session.id(),
                    recording_url: Some("https://media.example/rec/1".to_string()),
                    ..Default::default()
                },
                CommandMetadata::instructor("inst-1"),
            )
            .await
            .unwrap();

        assert_eq!(updated.recording_url(), Some("https://media.example/rec/1"));
        assert_eq!(updated.status(), SessionStatus::Completed);
    }
}
