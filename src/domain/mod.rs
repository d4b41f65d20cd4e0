//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `session` - Session lifecycle, schedule parsing and events
//! - `registration` - Seats in a session
//! - `presence` - Append-only activity log and derived presence
//! - `breakout` - Breakout rounds, rooms and assignment
//! - `poll` - Live polls, responses and tallies

pub mod breakout;
pub mod foundation;
pub mod poll;
pub mod presence;
pub mod registration;
pub mod session;
