//! HTTP adapter for live polls.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreatePollRequest, OptionRequest, PollListResponse, RespondRequest};
pub use handlers::PollHandlers;
pub use routes::poll_routes;
