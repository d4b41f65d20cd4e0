//! ListSessionsHandler - filtered session listing.

use std::sync::Arc;

use crate::domain::foundation::{ClassroomError, CommandMetadata, Role};
use crate::domain::session::Session;
use crate::ports::{RegistrationRepository, SessionFilter, SessionRepository};

#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    pub filter: SessionFilter,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session: Session,
    pub participant_count: u32,
}

pub struct ListSessionsHandler {
    sessions: Arc<dyn SessionRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl ListSessionsHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            sessions,
            registrations,
        }
    }

    /// Newest first. Instructors see only their own sessions unless they
    /// filter by instructor explicitly.
    pub async fn handle(
        &self,
        query: ListSessionsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<SessionSummary>, ClassroomError> {
        let mut filter = query.filter;
        if metadata.role == Role::Instructor && filter.instructor_id.is_none() {
            filter.instructor_id = Some(metadata.user_id.clone());
        }

        let sessions = self.sessions.list(&filter).await?;
        let mut summaries = Vec::with_capacity(sessions.len());
        for session in sessions {
            let participant_count = self.registrations.count_seated(session.id()).await?;
            summaries.push(SessionSummary {
                session,
                participant_count,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::Fixture;
    use crate::domain::foundation::SessionStatus;
    use crate::ports::Timeframe;

    #[tokio::test]
    async fn instructor_sees_only_own_sessions() {
        let f = Fixture::new();
        let mine = f.session("inst-1", SessionStatus::Scheduled).await;
        f.session("inst-2", SessionStatus::Scheduled).await;

        let handler = ListSessionsHandler::new(f.store.clone(), f.store.clone());
        let listed = handler
            .handle(ListSessionsQuery::default(), CommandMetadata::instructor("inst-1"))
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].session.id(), mine.id());
    }

    #[tokio::test]
    async fn past_filter_returns_completed_sessions() {
        let f = Fixture::new();
        f.session("inst-1", SessionStatus::Scheduled).await;
        let done = f.session("inst-1", SessionStatus::Completed).await;

        let handler = ListSessionsHandler::new(f.store.clone(), f.store.clone());
        let listed = handler
            .handle(
                ListSessionsQuery {
                    filter: SessionFilter {
                        timeframe: Some(Timeframe::Past),
                        ..Default::default()
                    },
                },
                CommandMetadata::student("stu-1"),
            )
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].session.id(), done.id());
    }
}
