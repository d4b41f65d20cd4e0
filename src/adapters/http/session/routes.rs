//! Routes for session and registration endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_session, end_session, get_session, list_sessions, register, remove_session,
    update_session, SessionHandlers,
};

pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route(
            "/sessions/:id",
            get(get_session).put(update_session).delete(remove_session),
        )
        .route("/sessions/:id/end", post(end_session))
        .route("/sessions/:id/register", post(register))
        .with_state(handlers)
}
