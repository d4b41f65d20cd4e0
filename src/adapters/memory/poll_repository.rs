use async_trait::async_trait;
use std::collections::HashMap;

use super::InMemoryStore;
use crate::domain::foundation::{DomainError, ErrorCode, PollId, PollOptionId, SessionId, Timestamp, UserId};
use crate::domain::poll::{Poll, PollResponse};
use crate::ports::PollRepository;

fn poll_not_found(id: &PollId) -> DomainError {
    DomainError::new(ErrorCode::PollNotFound, format!("Poll not found: {}", id)).with_detail("id", id.to_string())
}

#[async_trait]
impl PollRepository for InMemoryStore {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        self.lock()?.polls.push(poll.clone());
        Ok(())
    }

    async fn find_by_id(&self, poll_id: &PollId) -> Result<Option<Poll>, DomainError> {
        Ok(self.lock()?.polls.iter().find(|p| &p.id == poll_id).cloned())
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<Poll>, DomainError> {
        let mut polls: Vec<Poll> = self
            .lock()?
            .polls
            .iter()
            .rev()
            .filter(|p| &p.session_id == session_id)
            .cloned()
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    async fn selected_options(&self, poll_id: &PollId, user_id: &UserId) -> Result<Vec<PollOptionId>, DomainError> {
        Ok(self
            .lock()?
            .responses
            .iter()
            .filter(|r| &r.poll_id == poll_id && &r.user_id == user_id)
            .map(|r| r.option_id)
            .collect())
    }

    async fn record_response(&self, response: &PollResponse) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let poll = state
            .polls
            .iter()
            .find(|p| p.id == response.poll_id)
            .ok_or_else(|| poll_not_found(&response.poll_id))?;

        if !poll.is_open() {
            return Err(DomainError::new(ErrorCode::InvalidStateTransition, "This poll has ended"));
        }
        if poll.option(&response.option_id).is_none() {
            return Err(
                DomainError::new(ErrorCode::PollOptionNotFound, "Poll option not found")
                    .with_detail("id", response.option_id.to_string()),
            );
        }
        let multiple_choice = poll.is_multiple_choice;
        let duplicate = state.responses.iter().any(|r| {
            r.poll_id == response.poll_id
                && r.user_id == response.user_id
                && (!multiple_choice || r.option_id == response.option_id)
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::DuplicateResponse,
                "You have already responded to this poll",
            ));
        }

        state.responses.push(response.clone());
        Ok(())
    }

    async fn response_counts(&self, poll_id: &PollId) -> Result<HashMap<PollOptionId, u64>, DomainError> {
        let mut counts = HashMap::new();
        for response in self.lock()?.responses.iter().filter(|r| &r.poll_id == poll_id) {
            *counts.entry(response.option_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn end(&self, poll_id: &PollId, ended_at: Timestamp) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        let poll = state
            .polls
            .iter_mut()
            .find(|p| &p.id == poll_id)
            .ok_or_else(|| poll_not_found(poll_id))?;
        if poll.ended_at.is_some() {
            return Ok(false);
        }
        poll.ended_at = Some(ended_at);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::poll::test_support::draft;

    #[tokio::test]
    async fn single_choice_rejects_second_option_at_write_time() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let poll = Poll::create(draft("inst", false, &["A", "B"]), now).unwrap();
        store.save(&poll).await.unwrap();
        let user = UserId::new("s-1").unwrap();

        store
            .record_response(&PollResponse::new(poll.id, user.clone(), poll.options[0].id, now))
            .await
            .unwrap();
        let err = store
            .record_response(&PollResponse::new(poll.id, user, poll.options[1].id, now))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DuplicateResponse);
        assert_eq!(store.response_counts(&poll.id).await.unwrap().values().sum::<u64>(), 1);
    }

    #[tokio::test]
    async fn ending_twice_keeps_first_time() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let poll = Poll::create(draft("inst", true, &["A"]), now).unwrap();
        store.save(&poll).await.unwrap();

        assert!(store.end(&poll.id, now).await.unwrap());
        assert!(!store.end(&poll.id, now.plus_secs(60)).await.unwrap());
        let stored = store.find_by_id(&poll.id).await.unwrap().unwrap();
        assert_eq!(stored.ended_at, Some(now));
    }
}
