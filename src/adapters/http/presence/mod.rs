//! HTTP adapter for presence tracking.

mod dto;
mod handlers;
mod routes;

pub use dto::{AcceptedResponse, ActivityListResponse, RecordActivityRequest};
pub use handlers::PresenceHandlers;
pub use routes::presence_routes;
