//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, grouped
//! by the part of the classroom they manage.

pub mod breakout;
pub mod poll;
pub mod presence;
pub mod registration;
pub mod session;
pub(crate) mod support;

pub use support::UNKNOWN_PARTICIPANT;
