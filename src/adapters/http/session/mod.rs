//! HTTP adapter for sessions and registration.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateSessionRequest, ListSessionsParams, RegisterRequest, RegisterResponse,
    SessionDetailsResponse, SessionListResponse, SessionResponse, SessionSummaryResponse,
    UpdateSessionRequest,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
