//! GetSessionHandler - session details with its participants.

use serde::Serialize;
use std::sync::Arc;

use crate::application::handlers::support::{load_session, resolve_names};
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId, Timestamp, UserId};
use crate::domain::registration::RegistrationStatus;
use crate::domain::session::Session;
use crate::ports::{RegistrationRepository, SessionRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// A registered user as shown on the session page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    pub user_id: UserId,
    pub display_name: String,
    pub status: RegistrationStatus,
    pub registered_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct SessionDetails {
    pub session: Session,
    /// Registered plus attended.
    pub participant_count: u32,
    pub participants: Vec<ParticipantView>,
    /// The caller's own registration, if any.
    pub viewer_registration: Option<RegistrationStatus>,
}

pub struct GetSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    users: Arc<dyn UserDirectory>,
}

impl GetSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            sessions,
            registrations,
            users,
        }
    }

    pub async fn handle(
        &self,
        query: GetSessionQuery,
        metadata: CommandMetadata,
    ) -> Result<SessionDetails, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &query.session_id).await?;
        let registrations = self
            .registrations
            .list_for_session(&query.session_id)
            .await?;

        let seated: Vec<_> = registrations.iter().filter(|r| r.holds_seat()).collect();
        let ids: Vec<UserId> = seated.iter().map(|r| r.user_id.clone()).collect();
        let names = resolve_names(self.users.as_ref(), &ids).await?;

        let participants = seated
            .iter()
            .map(|r| ParticipantView {
                user_id: r.user_id.clone(),
                display_name: names.get(&r.user_id).cloned().unwrap_or_default(),
                status: r.status,
                registered_at: r.registered_at,
            })
            .collect::<Vec<_>>();
        let viewer_registration = registrations
            .iter()
            .find(|r| r.user_id == metadata.user_id)
            .map(|r| r.status);

        Ok(SessionDetails {
            session,
            participant_count: participants.len() as u32,
            participants,
            viewer_registration,
        })
    }
}
