//! Activity records: one fact per participant action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ActivityId, SessionId, Timestamp, UserId, ValidationError};

/// Participant action captured in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Join,
    Leave,
    ScreenShare,
    Chat,
    HandRaise,
    Microphone,
    Camera,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Join => "join",
            ActivityAction::Leave => "leave",
            ActivityAction::ScreenShare => "screen_share",
            ActivityAction::Chat => "chat",
            ActivityAction::HandRaise => "hand_raise",
            ActivityAction::Microphone => "microphone",
            ActivityAction::Camera => "camera",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(ActivityAction::Join),
            "leave" => Ok(ActivityAction::Leave),
            // older clients send camelCase
            "screen_share" | "screenShare" => Ok(ActivityAction::ScreenShare),
            "chat" => Ok(ActivityAction::Chat),
            "hand_raise" => Ok(ActivityAction::HandRaise),
            "microphone" => Ok(ActivityAction::Microphone),
            "camera" => Ok(ActivityAction::Camera),
            other => Err(ValidationError::invalid_format(
                "action",
                format!("unknown activity '{}'", other),
            )),
        }
    }
}

/// Client-reported action before it is stamped and stored.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub action: ActivityAction,
    pub action_value: Option<String>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

/// Immutable entry in a session's activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub action: ActivityAction,
    pub action_value: Option<String>,
    /// Only set on `leave` records that have a prior `join`.
    pub duration_seconds: Option<i64>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub occurred_at: Timestamp,
}

impl ActivityRecord {
    /// Stamps an activity. `last_join` is the user's most recent join in
    /// the session and is only consulted for `leave`.
    pub fn record(activity: NewActivity, last_join: Option<Timestamp>, now: Timestamp) -> Self {
        let duration_seconds = match activity.action {
            ActivityAction::Leave => last_join.map(|joined| Self::seconds_between(joined, now)),
            _ => None,
        };

        Self {
            id: ActivityId::new(),
            session_id: activity.session_id,
            user_id: activity.user_id,
            action: activity.action,
            action_value: activity.action_value,
            duration_seconds,
            device_info: activity.device_info,
            ip_address: activity.ip_address,
            occurred_at: now,
        }
    }

    /// Whole seconds from `from` to `to`, never negative.
    fn seconds_between(from: Timestamp, to: Timestamp) -> i64 {
        to.duration_since(&from).num_seconds().max(0)
    }
}
