//! Poll aggregate, its options, and response rows.

use serde::Serialize;

use crate::domain::foundation::{
    ClassroomError, PollId, PollOptionId, PollResponseId, SessionId, Timestamp, UserId,
};

/// Maximum length for a poll question.
pub const MAX_QUESTION_LENGTH: usize = 500;

/// Option as supplied by the poll creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDraft {
    pub text: String,
    /// Falls back to the option's position in the list.
    pub order_index: Option<i32>,
}

/// Creator input for a new poll.
#[derive(Debug, Clone)]
pub struct PollDraft {
    pub session_id: SessionId,
    pub creator_id: UserId,
    pub question: String,
    pub options: Vec<OptionDraft>,
    pub is_anonymous: bool,
    pub is_multiple_choice: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOption {
    pub id: PollOptionId,
    pub poll_id: PollId,
    pub text: String,
    pub order_index: i32,
}

/// One selected option by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollResponse {
    pub id: PollResponseId,
    pub poll_id: PollId,
    pub user_id: UserId,
    pub option_id: PollOptionId,
    pub created_at: Timestamp,
}

impl PollResponse {
    pub fn new(poll_id: PollId, user_id: UserId, option_id: PollOptionId, now: Timestamp) -> Self {
        Self {
            id: PollResponseId::new(),
            poll_id,
            user_id,
            option_id,
            created_at: now,
        }
    }
}

/// A live poll.
///
/// # Invariants
///
/// - at least one option, options sorted by `order_index`
/// - single-choice: a user holds at most one response row in the poll
/// - multiple-choice: a user holds at most one row per option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    pub id: PollId,
    pub session_id: SessionId,
    pub creator_id: UserId,
    pub question: String,
    pub is_anonymous: bool,
    pub is_multiple_choice: bool,
    pub created_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub options: Vec<PollOption>,
}

impl Poll {
    /// Validates a draft and builds the poll with its options.
    pub fn create(draft: PollDraft, now: Timestamp) -> Result<Self, ClassroomError> {
        let question = draft.question.trim().to_string();
        if question.is_empty() {
            return Err(ClassroomError::validation("question", "Question cannot be empty"));
        }
        if question.chars().count() > MAX_QUESTION_LENGTH {
            return Err(ClassroomError::validation(
                "question",
                format!("Question cannot exceed {} characters", MAX_QUESTION_LENGTH),
            ));
        }
        if draft.options.is_empty() {
            return Err(ClassroomError::validation(
                "options",
                "A poll needs at least one option",
            ));
        }

        let id = PollId::new();
        let mut options = Vec::with_capacity(draft.options.len());
        for (position, option) in draft.options.into_iter().enumerate() {
            let text = option.text.trim().to_string();
            if text.is_empty() {
                return Err(ClassroomError::validation(
                    "options",
                    format!("Option {} has no text", position + 1),
                ));
            }
            options.push(PollOption {
                id: PollOptionId::new(),
                poll_id: id,
                text,
                order_index: option.order_index.unwrap_or(position as i32),
            });
        }
        options.sort_by_key(|o| o.order_index);

        Ok(Self {
            id,
            session_id: draft.session_id,
            creator_id: draft.creator_id,
            question,
            is_anonymous: draft.is_anonymous,
            is_multiple_choice: draft.is_multiple_choice,
            created_at: now,
            ended_at: None,
            options,
        })
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn option(&self, option_id: &PollOptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }

    /// Checks that a response can be accepted, given the options the user
    /// already selected in this poll.
    ///
    /// Errors come in order: ended poll, unknown option, duplicate.
    pub fn accept_response(
        &self,
        option_id: &PollOptionId,
        already_selected: &[PollOptionId],
    ) -> Result<(), ClassroomError> {
        if !self.is_open() {
            return Err(ClassroomError::invalid_transition("This poll has ended"));
        }
        if self.option(option_id).is_none() {
            return Err(ClassroomError::not_found("Poll option", option_id));
        }
        let duplicate = if self.is_multiple_choice {
            already_selected.contains(option_id)
        } else {
            !already_selected.is_empty()
        };
        if duplicate {
            return Err(ClassroomError::DuplicateResponse);
        }
        Ok(())
    }

    /// Ends the poll. Returns `false` if it had already ended, in which
    /// case the original end time is kept.
    pub fn end(&mut self, by: &UserId, now: Timestamp) -> Result<bool, ClassroomError> {
        if &self.creator_id != by {
            return Err(ClassroomError::permission_denied(
                "Only the poll creator can end this poll",
            ));
        }
        if self.ended_at.is_some() {
            return Ok(false);
        }
        self.ended_at = Some(now);
        Ok(true)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::draft;
    use super::*;

    #[test]
    fn options_default_to_list_position() {
        let poll = Poll::create(draft("inst", false, &["A", "B", "C"]), Timestamp::now()).unwrap();
        let order: Vec<_> = poll.options.iter().map(|o| (o.text.as_str(), o.order_index)).collect();
        assert_eq!(order, vec![("A", 0), ("B", 1), ("C", 2)]);
    }

    #[test]
    fn explicit_order_index_sorts_options() {
        let mut d = draft("inst", false, &["A", "B"]);
        d.options[0].order_index = Some(5);
        d.options[1].order_index = Some(1);
        let poll = Poll::create(d, Timestamp::now()).unwrap();
        assert_eq!(poll.options[0].text, "B");
        assert_eq!(poll.options[1].text, "A");
    }

    #[test]
    fn empty_options_are_rejected() {
        let result = Poll::create(draft("inst", false, &[]), Timestamp::now());
        assert!(matches!(result, Err(ClassroomError::ValidationFailed { field, .. }) if field == "options"));
    }

    #[test]
    fn blank_question_or_option_is_rejected() {
        let mut d = draft("inst", false, &["A"]);
        d.question = " ".to_string();
        assert!(Poll::create(d, Timestamp::now()).is_err());
        assert!(Poll::create(draft("inst", false, &["A", ""]), Timestamp::now()).is_err());
    }

    #[test]
    fn single_choice_rejects_any_second_answer() {
        let poll = Poll::create(draft("inst", false, &["A", "B"]), Timestamp::now()).unwrap();
        let (a, b) = (poll.options[0].id, poll.options[1].id);
        assert!(poll.accept_response(&a, &[]).is_ok());
        assert_eq!(poll.accept_response(&b, &[a]), Err(ClassroomError::DuplicateResponse));
    }

    #[test]
    fn multiple_choice_rejects_only_the_same_option() {
        let poll = Poll::create(draft("inst", true, &["A", "B"]), Timestamp::now()).unwrap();
        let (a, b) = (poll.options[0].id, poll.options[1].id);
        assert!(poll.accept_response(&b, &[a]).is_ok());
        assert_eq!(poll.accept_response(&a, &[a]), Err(ClassroomError::DuplicateResponse));
    }

    #[test]
    fn option_from_another_poll_is_not_found() {
        let poll = Poll::create(draft("inst", false, &["A"]), Timestamp::now()).unwrap();
        assert!(matches!(
            poll.accept_response(&PollOptionId::new(), &[]),
            Err(ClassroomError::NotFound { .. })
        ));
    }

    #[test]
    fn ended_poll_rejects_responses_before_other_checks() {
        let mut poll = Poll::create(draft("inst", false, &["A"]), Timestamp::now()).unwrap();
        poll.end(&UserId::new("inst").unwrap(), Timestamp::now()).unwrap();
        assert!(matches!(
            poll.accept_response(&PollOptionId::new(), &[]),
            Err(ClassroomError::InvalidTransition(_))
        ));
    }

    #[test]
    fn only_creator_can_end_and_repeat_end_keeps_first_time() {
        let mut poll = Poll::create(draft("inst", false, &["A"]), Timestamp::now()).unwrap();
        let first = Timestamp::now();

        assert!(matches!(
            poll.end(&UserId::new("student").unwrap(), first),
            Err(ClassroomError::PermissionDenied(_))
        ));
        assert_eq!(poll.end(&UserId::new("inst").unwrap(), first), Ok(true));
        assert_eq!(poll.end(&UserId::new("inst").unwrap(), first.plus_secs(60)), Ok(false));
        assert_eq!(poll.ended_at, Some(first));
    }
}
