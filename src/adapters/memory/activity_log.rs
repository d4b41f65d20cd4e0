use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::foundation::{DomainError, SessionId, Timestamp, UserId};
use crate::domain::presence::{derive_roster, ActivityAction, ActivityRecord, ParticipantActivity};
use crate::ports::ActivityLog;

#[async_trait]
impl ActivityLog for InMemoryStore {
    async fn append(&self, record: &ActivityRecord) -> Result<(), DomainError> {
        self.lock()?.activities.push(record.clone());
        Ok(())
    }

    async fn latest_join(&self, session_id: &SessionId, user_id: &UserId) -> Result<Option<Timestamp>, DomainError> {
        Ok(self
            .lock()?
            .activities
            .iter()
            .filter(|a| {
                &a.session_id == session_id && &a.user_id == user_id && a.action == ActivityAction::Join
            })
            .map(|a| a.occurred_at)
            .max())
    }

    async fn participant_summaries(&self, session_id: &SessionId) -> Result<Vec<ParticipantActivity>, DomainError> {
        let records = self.list_for_session(session_id).await?;
        Ok(derive_roster(&records))
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<ActivityRecord>, DomainError> {
        Ok(self
            .lock()?
            .activities
            .iter()
            .filter(|a| &a.session_id == session_id)
            .cloned()
            .collect())
    }
}
