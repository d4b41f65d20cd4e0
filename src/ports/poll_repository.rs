//! Poll repository port.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, PollId, PollOptionId, SessionId, Timestamp, UserId};
use crate::domain::poll::{Poll, PollResponse};

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Stores a new poll together with its options.
    async fn save(&self, poll: &Poll) -> Result<(), DomainError>;

    async fn find_by_id(&self, poll_id: &PollId) -> Result<Option<Poll>, DomainError>;

    /// Polls of a session, newest first.
    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<Poll>, DomainError>;

    /// Options the user has selected in the poll.
    async fn selected_options(&self, poll_id: &PollId, user_id: &UserId) -> Result<Vec<PollOptionId>, DomainError>;

    /// Stores a response after re-checking, atomically with the insert,
    /// that the poll is still open and that the single- or multiple-choice
    /// rule still allows it.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the poll ended
    /// - `DuplicateResponse` if the uniqueness rule rejects the row
    async fn record_response(&self, response: &PollResponse) -> Result<(), DomainError>;

    /// Response rows per option, counted at read time.
    async fn response_counts(&self, poll_id: &PollId) -> Result<HashMap<PollOptionId, u64>, DomainError>;

    /// Sets `ended_at` if it is unset. Returns `false` if already ended.
    async fn end(&self, poll_id: &PollId, ended_at: Timestamp) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PollRepository) {}
    }
}
