//! ListActivitiesHandler - raw activity log for the session host.

use std::sync::Arc;

use crate::application::handlers::support::{authorize_owner_or_admin, load_session};
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId};
use crate::domain::presence::ActivityRecord;
use crate::ports::{ActivityLog, SessionRepository};

#[derive(Debug, Clone)]
pub struct ListActivitiesQuery {
    pub session_id: SessionId,
}

pub struct ListActivitiesHandler {
    sessions: Arc<dyn SessionRepository>,
    log: Arc<dyn ActivityLog>,
}

impl ListActivitiesHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>, log: Arc<dyn ActivityLog>) -> Self {
        Self { sessions, log }
    }

    /// Newest first.
    pub async fn handle(
        &self,
        query: ListActivitiesQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<ActivityRecord>, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &query.session_id).await?;
        authorize_owner_or_admin(&session, &metadata, "view the activity log")?;

        let mut records = self.log.list_for_session(&query.session_id).await?;
        records.reverse();
        // stable: same-instant records stay newest-inserted first
        records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(records)
    }
}
