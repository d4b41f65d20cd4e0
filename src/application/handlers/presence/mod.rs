//! Presence handlers: recording activity and reading the derived views.

mod get_presence;
mod list_activities;
mod record_activity;

pub use get_presence::{ActiveParticipant, GetPresenceHandler, GetPresenceQuery, PresenceView};
pub use list_activities::{ListActivitiesHandler, ListActivitiesQuery};
pub use record_activity::{RecordActivityCommand, RecordActivityHandler, RecordOutcome};
