//! ListPollsHandler / GetPollHandler - polls with live tallies.

use std::sync::Arc;

use serde::Serialize;

use super::respond_to_poll::load_poll;
use crate::domain::foundation::{ClassroomError, CommandMetadata, PollId, PollOptionId, SessionId};
use crate::domain::poll::{Poll, PollTally};
use crate::ports::PollRepository;

/// A poll's tally plus the options the viewer picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollView {
    #[serde(flatten)]
    pub tally: PollTally,
    pub my_selections: Vec<PollOptionId>,
}

#[derive(Debug, Clone)]
pub struct ListPollsQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct GetPollQuery {
    pub session_id: SessionId,
    pub poll_id: PollId,
}

async fn view(
    polls: &dyn PollRepository,
    poll: Poll,
    metadata: &CommandMetadata,
) -> Result<PollView, ClassroomError> {
    let counts = polls.response_counts(&poll.id).await?;
    let my_selections = polls.selected_options(&poll.id, &metadata.user_id).await?;
    Ok(PollView {
        tally: PollTally::count(poll, &counts),
        my_selections,
    })
}

pub struct ListPollsHandler {
    polls: Arc<dyn PollRepository>,
}

impl ListPollsHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    /// Newest first.
    pub async fn handle(
        &self,
        query: ListPollsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<PollView>, ClassroomError> {
        let polls = self.polls.list_for_session(&query.session_id).await?;
        let mut views = Vec::with_capacity(polls.len());
        for poll in polls {
            views.push(view(self.polls.as_ref(), poll, &metadata).await?);
        }
        Ok(views)
    }
}

pub struct GetPollHandler {
    polls: Arc<dyn PollRepository>,
}

impl GetPollHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    pub async fn handle(
        &self,
        query: GetPollQuery,
        metadata: CommandMetadata,
    ) -> Result<PollView, ClassroomError> {
        let poll = load_poll(self.polls.as_ref(), &query.session_id, &query.poll_id).await?;
        view(self.polls.as_ref(), poll, &metadata).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::Fixture;
    use crate::domain::foundation::UserId;
    use crate::domain::poll::{test_support::draft, PollResponse};
    use crate::ports::Clock;

    #[tokio::test]
    async fn tallies_count_rows_and_show_own_selection() {
        let f = Fixture::new();
        let poll = Poll::create(draft("inst-1", false, &["A", "B"]), f.clock.now()).unwrap();
        f.store.save(&poll).await.unwrap();
        for (user, option) in [("ana", 0), ("bob", 1), ("cal", 1)] {
            f.store
                .record_response(&PollResponse::new(
                    poll.id,
                    UserId::new(user).unwrap(),
                    poll.options[option].id,
                    f.clock.now(),
                ))
                .await
                .unwrap();
        }

        let view = GetPollHandler::new(f.store.clone())
            .handle(
                GetPollQuery {
                    session_id: poll.session_id,
                    poll_id: poll.id,
                },
                CommandMetadata::student("bob"),
            )
            .await
            .unwrap();

        let counts: Vec<u64> = view.tally.options.iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![1, 2]);
        assert_eq!(view.tally.total_responses, 3);
        assert_eq!(view.my_selections, vec![poll.options[1].id]);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let f = Fixture::new();
        let mut first = draft("inst-1", false, &["A"]);
        let session_id = first.session_id;
        first.question = "First".to_string();
        let mut second = draft("inst-1", false, &["A"]);
        second.session_id = session_id;
        second.question = "Second".to_string();

        f.store.save(&Poll::create(first, f.clock.now()).unwrap()).await.unwrap();
        f.clock.advance_secs(5);
        f.store.save(&Poll::create(second, f.clock.now()).unwrap()).await.unwrap();

        let views = ListPollsHandler::new(f.store.clone())
            .handle(ListPollsQuery { session_id }, CommandMetadata::student("ana"))
            .await
            .unwrap();

        let questions: Vec<_> = views.iter().map(|v| v.tally.poll.question.as_str()).collect();
        assert_eq!(questions, vec!["Second", "First"]);
    }
}
