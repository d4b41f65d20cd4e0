//! Poll domain module.
//!
//! Polls belong to a session and carry ordered options. Responses are
//! stored one row per (poll, user, option); tallies are always counted
//! from those rows at read time.

mod aggregate;
mod tally;

pub use aggregate::{OptionDraft, Poll, PollDraft, PollOption, PollResponse, MAX_QUESTION_LENGTH};
#[cfg(test)]
pub(crate) use aggregate::test_support;
pub use tally::{OptionTally, PollTally};
