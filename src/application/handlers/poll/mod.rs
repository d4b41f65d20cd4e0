//! Poll handlers.

mod create_poll;
mod end_poll;
mod get_polls;
mod respond_to_poll;

pub use create_poll::{CreatePollCommand, CreatePollHandler};
pub use end_poll::{EndPollCommand, EndPollHandler};
pub use get_polls::{GetPollHandler, GetPollQuery, ListPollsHandler, ListPollsQuery, PollView};
pub use respond_to_poll::{RespondToPollCommand, RespondToPollHandler};
