//! EndPollHandler - the poll's creator closes it to further answers.

use std::sync::Arc;

use super::respond_to_poll::load_poll;
use crate::domain::foundation::{ClassroomError, CommandMetadata, PollId, SessionId};
use crate::domain::poll::Poll;
use crate::ports::{Clock, PollRepository};

#[derive(Debug, Clone)]
pub struct EndPollCommand {
    pub session_id: SessionId,
    pub poll_id: PollId,
}

pub struct EndPollHandler {
    polls: Arc<dyn PollRepository>,
    clock: Arc<dyn Clock>,
}

impl EndPollHandler {
    pub fn new(polls: Arc<dyn PollRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { polls, clock }
    }

    /// Ending an ended poll returns it unchanged with its first `ended_at`.
    pub async fn handle(
        &self,
        cmd: EndPollCommand,
        metadata: CommandMetadata,
    ) -> Result<Poll, ClassroomError> {
        let mut poll = load_poll(self.polls.as_ref(), &cmd.session_id, &cmd.poll_id).await?;
        let now = self.clock.now();

        if !poll.end(&metadata.user_id, now)? {
            tracing::debug!(poll_id = %poll.id, "poll already ended");
            return Ok(poll);
        }
        if !self.polls.end(&poll.id, now).await? {
            // Lost a race with another end; report the stored state.
            return load_poll(self.polls.as_ref(), &cmd.session_id, &cmd.poll_id).await;
        }

        tracing::info!(poll_id = %poll.id, "poll ended");
        Ok(poll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::Fixture;
    use crate::domain::poll::test_support::draft;

    async fn stored_poll(f: &Fixture) -> Poll {
        let mut d = draft("inst-1", false, &["A", "B"]);
        d.session_id = SessionId::new();
        let poll = Poll::create(d, f.clock.now()).unwrap();
        f.store.save(&poll).await.unwrap();
        poll
    }

    #[tokio::test]
    async fn creator_ends_poll_once() {
        let f = Fixture::new();
        let poll = stored_poll(&f).await;
        let h = EndPollHandler::new(f.store.clone(), f.clock.clone());
        let cmd = EndPollCommand {
            session_id: poll.session_id,
            poll_id: poll.id,
        };

        let first = h.handle(cmd.clone(), CommandMetadata::instructor("inst-1")).await.unwrap();
        f.clock.advance_secs(30);
        let second = h.handle(cmd, CommandMetadata::instructor("inst-1")).await.unwrap();

        assert!(first.ended_at.is_some());
        assert_eq!(first.ended_at, second.ended_at);
    }

    #[tokio::test]
    async fn only_creator_may_end() {
        let f = Fixture::new();
        let poll = stored_poll(&f).await;
        let h = EndPollHandler::new(f.store.clone(), f.clock.clone());

        let result = h
            .handle(
                EndPollCommand {
                    session_id: poll.session_id,
                    poll_id: poll.id,
                },
                CommandMetadata::instructor("inst-2"),
            )
            .await;

        assert!(matches!(result, Err(ClassroomError::PermissionDenied(_))));
    }
}
