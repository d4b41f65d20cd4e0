//! Presence domain module.
//!
//! Presence is derived from an append-only activity log. Nothing here is
//! mutated after insert; the active-participant view and the metrics are
//! computed from the records on every read.

mod activity;
mod metrics;
mod roster;

pub use activity::{ActivityAction, ActivityRecord, NewActivity};
pub use metrics::{PresenceMetrics, TimelineEntry};
pub use roster::{active_participants, derive_roster, ParticipantActivity};
