//! RespondToPollHandler - a participant answers a poll.

use std::sync::Arc;

use crate::application::handlers::support::load_session;
use crate::domain::foundation::{ClassroomError, CommandMetadata, PollId, PollOptionId, SessionId};
use crate::domain::poll::{Poll, PollResponse};
use crate::ports::{Clock, PollRepository, RegistrationRepository, SessionRepository};

#[derive(Debug, Clone)]
pub struct RespondToPollCommand {
    pub session_id: SessionId,
    pub poll_id: PollId,
    pub option_id: PollOptionId,
}

pub struct RespondToPollHandler {
    sessions: Arc<dyn SessionRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    polls: Arc<dyn PollRepository>,
    clock: Arc<dyn Clock>,
}

pub(super) async fn load_poll(
    polls: &dyn PollRepository,
    session_id: &SessionId,
    poll_id: &PollId,
) -> Result<Poll, ClassroomError> {
    polls
        .find_by_id(poll_id)
        .await?
        .filter(|poll| &poll.session_id == session_id)
        .ok_or_else(|| ClassroomError::not_found("Poll", poll_id))
}

impl RespondToPollHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        polls: Arc<dyn PollRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            registrations,
            polls,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: RespondToPollCommand,
        metadata: CommandMetadata,
    ) -> Result<PollResponse, ClassroomError> {
        let poll = load_poll(self.polls.as_ref(), &cmd.session_id, &cmd.poll_id).await?;
        let session = load_session(self.sessions.as_ref(), &poll.session_id).await?;

        if session.instructor_id() != &metadata.user_id {
            let seated = self
                .registrations
                .find(&poll.session_id, &metadata.user_id)
                .await?
                .is_some_and(|r| r.holds_seat());
            if !seated {
                return Err(ClassroomError::permission_denied(
                    "You must be registered for this session to respond to polls",
                ));
            }
        }

        let selected = self
            .polls
            .selected_options(&poll.id, &metadata.user_id)
            .await?;
        poll.accept_response(&cmd.option_id, &selected)?;

        let response = PollResponse::new(
            poll.id,
            metadata.user_id.clone(),
            cmd.option_id,
            self.clock.now(),
        );
        // A concurrent answer can still lose here; the store re-checks.
        self.polls.record_response(&response).await?;
        tracing::debug!(poll_id = %poll.id, user_id = %metadata.user_id, "poll response recorded");
        Ok(response)
    }
}
