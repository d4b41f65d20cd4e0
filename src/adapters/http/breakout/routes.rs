//! Routes for breakout room endpoints.

use axum::{
    routing::post,
    Router,
};

use super::handlers::{
    close_all_rooms, close_room, get_rooms, join_room, leave_room, open_round, BreakoutHandlers,
};

pub fn breakout_routes(handlers: BreakoutHandlers) -> Router {
    Router::new()
        .route(
            "/sessions/:id/breakout-rooms",
            post(open_round).get(get_rooms),
        )
        .route("/sessions/:id/breakout-rooms/close-all", post(close_all_rooms))
        .route("/sessions/:id/breakout-rooms/:room_id/close", post(close_room))
        .route("/sessions/:id/breakout-rooms/:room_id/join", post(join_room))
        .route("/sessions/:id/breakout-rooms/:room_id/leave", post(leave_room))
        .with_state(handlers)
}
