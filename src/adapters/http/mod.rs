//! HTTP adapter - the classroom REST API on axum.
//!
//! One module per area (`session`, `presence`, `breakout`, `poll`), each
//! with its DTOs, handlers and routes. `build_router` assembles them under
//! `/api/v1` behind the auth middleware.

pub mod breakout;
pub mod context;
pub mod error;
pub mod middleware;
pub mod poll;
pub mod presence;
mod router;
pub mod session;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::{build_router, HttpSettings};
pub use state::{ApiHandlers, ClassroomPorts};
