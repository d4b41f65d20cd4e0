use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::registration::{Registration, RegistrationStatus};
use crate::ports::RegistrationRepository;

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn find(&self, session_id: &SessionId, user_id: &UserId) -> Result<Option<Registration>, DomainError> {
        Ok(self
            .lock()?
            .registrations
            .iter()
            .find(|r| &r.session_id == session_id && &r.user_id == user_id)
            .cloned())
    }

    async fn insert_if_absent(&self, registration: &Registration) -> Result<Registration, DomainError> {
        let mut state = self.lock()?;
        if let Some(existing) = state
            .registrations
            .iter()
            .find(|r| r.session_id == registration.session_id && r.user_id == registration.user_id)
        {
            return Ok(existing.clone());
        }
        state.registrations.push(registration.clone());
        Ok(registration.clone())
    }

    async fn count_seated(&self, session_id: &SessionId) -> Result<u32, DomainError> {
        let count = self
            .lock()?
            .registrations
            .iter()
            .filter(|r| &r.session_id == session_id && r.holds_seat())
            .count();
        Ok(count as u32)
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<Registration>, DomainError> {
        Ok(self
            .lock()?
            .registrations
            .iter()
            .filter(|r| &r.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn mark_attended(&self, session_id: &SessionId, user_id: &UserId) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let row = state.registrations.iter_mut().find(|r| {
            &r.session_id == session_id
                && &r.user_id == user_id
                && r.status == RegistrationStatus::Registered
        });
        Ok(match row {
            Some(row) => {
                row.status = RegistrationStatus::Attended;
                true
            }
            None => false,
        })
    }
}
