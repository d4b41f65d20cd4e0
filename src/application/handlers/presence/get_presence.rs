//! GetPresenceHandler - who is in the session right now.

use serde::Serialize;
use std::sync::Arc;

use crate::application::handlers::support::{authorize_owner_or_admin, load_session, resolve_names};
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId, Timestamp, UserId};
use crate::domain::presence::{active_participants, PresenceMetrics};
use crate::ports::{ActivityLog, SessionRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct GetPresenceQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveParticipant {
    pub user_id: UserId,
    pub display_name: String,
    pub first_joined_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresenceView {
    /// Ordered by first join, then user id.
    pub active: Vec<ActiveParticipant>,
    /// Only for the session's instructor or an admin.
    pub metrics: Option<PresenceMetrics>,
}

pub struct GetPresenceHandler {
    sessions: Arc<dyn SessionRepository>,
    log: Arc<dyn ActivityLog>,
    users: Arc<dyn UserDirectory>,
}

impl GetPresenceHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        log: Arc<dyn ActivityLog>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            sessions,
            log,
            users,
        }
    }

    pub async fn handle(
        &self,
        query: GetPresenceQuery,
        metadata: CommandMetadata,
    ) -> Result<PresenceView, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &query.session_id).await?;

        let summaries = self.log.participant_summaries(&query.session_id).await?;
        let first_joins: std::collections::HashMap<UserId, Option<Timestamp>> = summaries
            .iter()
            .map(|s| (s.user_id.clone(), s.first_joined_at))
            .collect();
        let active_ids = active_participants(summaries);
        let names = resolve_names(self.users.as_ref(), &active_ids).await?;

        let active = active_ids
            .into_iter()
            .map(|user_id| ActiveParticipant {
                display_name: names.get(&user_id).cloned().unwrap_or_default(),
                first_joined_at: first_joins.get(&user_id).copied().flatten(),
                user_id,
            })
            .collect();

        let metrics = if authorize_owner_or_admin(&session, &metadata, "view presence metrics").is_ok() {
            let records = self.log.list_for_session(&query.session_id).await?;
            Some(PresenceMetrics::from_records(&records))
        } else {
            None
        };

        Ok(PresenceView { active, metrics })
    }
}
