//! Breakout domain module.
//!
//! A breakout round is the set of rooms currently open in a session. At
//! most one round is open at a time, and a user holds at most one open
//! participant row per session.

mod assignment;
mod room;

pub use assignment::{plan_round, AssignmentMode, BreakoutRound, RoundRequest, MAX_ROOMS_PER_ROUND};
pub use room::{BreakoutParticipant, BreakoutRoom};
