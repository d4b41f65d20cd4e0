//! Routes for poll endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_poll, end_poll, get_poll, list_polls, respond, PollHandlers};

pub fn poll_routes(handlers: PollHandlers) -> Router {
    Router::new()
        .route("/sessions/:id/polls", post(create_poll).get(list_polls))
        .route("/sessions/:id/polls/:poll_id", get(get_poll))
        .route("/sessions/:id/polls/:poll_id/responses", post(respond))
        .route("/sessions/:id/polls/:poll_id/end", post(end_poll))
        .with_state(handlers)
}
