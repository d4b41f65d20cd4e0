use async_trait::async_trait;

use super::InMemoryStore;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus};
use crate::domain::session::Session;
use crate::ports::{SessionFilter, SessionRepository};

fn not_found(id: &SessionId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
        .with_detail("id", id.to_string())
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        if state.sessions.iter().any(|s| s.id() == session.id()) {
            return Err(DomainError::new(ErrorCode::Conflict, "Session already exists"));
        }
        state.sessions.push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.lock()?.sessions.iter().find(|s| s.id() == id).cloned())
    }

    async fn update_details(&self, session: &Session) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let stored = state
            .sessions
            .iter_mut()
            .find(|s| s.id() == session.id())
            .ok_or_else(|| not_found(session.id()))?;

        let current = stored.snapshot();
        let mut edited = session.snapshot();
        edited.status = current.status;
        edited.actual_start_time = current.actual_start_time;
        edited.actual_end_time = current.actual_end_time;
        edited.room_code = current.room_code;
        edited.created_at = current.created_at;
        *stored = Session::reconstitute(edited);
        Ok(())
    }

    async fn transition(&self, session: &Session, expected: SessionStatus) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let Some(stored) = state.sessions.iter_mut().find(|s| s.id() == session.id()) else {
            return Ok(false);
        };
        if stored.status() != expected {
            return Ok(false);
        }

        let mut next = stored.snapshot();
        next.status = session.status();
        next.actual_start_time = session.actual_start_time();
        next.actual_end_time = session.actual_end_time();
        next.updated_at = *session.updated_at();
        *stored = Session::reconstitute(next);
        Ok(true)
    }

    async fn delete_if_removable(&self, id: &SessionId) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let removable = state
            .sessions
            .iter()
            .find(|s| s.id() == id)
            .is_some_and(|s| s.status().is_deletable());
        if !removable {
            return Ok(false);
        }

        state.sessions.retain(|s| s.id() != id);
        state.registrations.retain(|r| &r.session_id != id);
        state.activities.retain(|a| &a.session_id != id);
        state.breakout_participants.retain(|p| &p.session_id != id);
        state.rooms.retain(|r| &r.session_id != id);
        let poll_ids: Vec<_> = state
            .polls
            .iter()
            .filter(|p| &p.session_id == id)
            .map(|p| p.id)
            .collect();
        state.responses.retain(|r| !poll_ids.contains(&r.poll_id));
        state.polls.retain(|p| &p.session_id != id);
        Ok(true)
    }

    async fn find_by_status(&self, status: SessionStatus) -> Result<Vec<Session>, DomainError> {
        Ok(self
            .lock()?
            .sessions
            .iter()
            .filter(|s| s.status() == status)
            .cloned()
            .collect())
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<Session>, DomainError> {
        let state = self.lock()?;
        // newest first; equal creation times fall back to reverse insertion
        let mut sessions: Vec<Session> = state
            .sessions
            .iter()
            .rev()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::session::{test_support::new_session, Schedule, SessionChanges};

    fn scheduled(now: Timestamp) -> Session {
        Session::scheduled(
            SessionId::new(),
            new_session("inst-1"),
            Schedule::parse("2030-01-01", "10:00", None).unwrap(),
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn transition_is_compare_and_set() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let mut session = scheduled(now);
        store.save(&session).await.unwrap();

        session.start(now).unwrap();
        assert!(store.transition(&session, SessionStatus::Scheduled).await.unwrap());
        assert!(!store.transition(&session, SessionStatus::Scheduled).await.unwrap());

        let stored = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Active);
        assert_eq!(stored.actual_start_time(), Some(now));
    }

    #[tokio::test]
    async fn stale_edit_does_not_revert_status() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let session = scheduled(now);
        store.save(&session).await.unwrap();

        let mut edited = session.clone();
        edited
            .apply_changes(
                SessionChanges {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
                now,
            )
            .unwrap();

        let mut started = session.clone();
        started.start(now).unwrap();
        store.transition(&started, SessionStatus::Scheduled).await.unwrap();
        store.update_details(&edited).await.unwrap();

        let stored = store.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.title(), "Renamed");
        assert_eq!(stored.status(), SessionStatus::Active);
        assert!(stored.actual_start_time().is_some());
    }

    #[tokio::test]
    async fn active_sessions_are_not_deleted() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let mut session = scheduled(now);
        store.save(&session).await.unwrap();
        session.start(now).unwrap();
        store.transition(&session, SessionStatus::Scheduled).await.unwrap();

        assert!(!store.delete_if_removable(session.id()).await.unwrap());
        assert!(store.find_by_id(session.id()).await.unwrap().is_some());
    }
}
