//! Routes for presence endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_presence, list_activities, record_activity, PresenceHandlers};

pub fn presence_routes(handlers: PresenceHandlers) -> Router {
    Router::new()
        .route(
            "/sessions/:id/activities",
            post(record_activity).get(list_activities),
        )
        .route("/sessions/:id/presence", get(get_presence))
        .with_state(handlers)
}
