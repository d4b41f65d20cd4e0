//! CreatePollHandler - the session's instructor opens a poll.

use std::sync::Arc;

use crate::application::handlers::support::load_session;
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId};
use crate::domain::poll::{OptionDraft, Poll, PollDraft};
use crate::ports::{Clock, PollRepository, SessionRepository};

#[derive(Debug, Clone, Default)]
pub struct CreatePollCommand {
    pub session_id: SessionId,
    pub question: String,
    pub options: Vec<OptionDraft>,
    pub is_anonymous: bool,
    pub is_multiple_choice: bool,
}

pub struct CreatePollHandler {
    sessions: Arc<dyn SessionRepository>,
    polls: Arc<dyn PollRepository>,
    clock: Arc<dyn Clock>,
}

impl CreatePollHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        polls: Arc<dyn PollRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            polls,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePollCommand,
        metadata: CommandMetadata,
    ) -> Result<Poll, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        session.authorize_owner(&metadata.user_id, "create polls")?;

        let poll = Poll::create(
            PollDraft {
                session_id: cmd.session_id,
                creator_id: metadata.user_id.clone(),
                question: cmd.question,
                options: cmd.options,
                is_anonymous: cmd.is_anonymous,
                is_multiple_choice: cmd.is_multiple_choice,
            },
            self.clock.now(),
        )?;
        self.polls.save(&poll).await?;

        tracing::info!(session_id = %cmd.session_id, poll_id = %poll.id, "poll created");
        Ok(poll)
    }
}
