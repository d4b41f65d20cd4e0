//! HTTP adapter for breakout rooms.

mod dto;
mod handlers;
mod routes;

pub use dto::{CloseAllResponse, OpenRoundRequest, RoomListResponse};
pub use handlers::BreakoutHandlers;
pub use routes::breakout_routes;
