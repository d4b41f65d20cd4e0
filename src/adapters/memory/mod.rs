//! In-memory adapters.
//!
//! `InMemoryStore` implements every repository port over a single mutex so
//! cascades (session deletion) and the atomic breakout/poll writes behave
//! the same way the PostgreSQL adapters do. Used by tests and the HTTP test
//! harness.

mod activity_log;
mod breakout_repository;
mod clock;
mod directory;
mod poll_repository;
mod registration_repository;
mod session_repository;
mod store;

pub use clock::{ManualClock, SystemClock};
pub use store::InMemoryStore;
