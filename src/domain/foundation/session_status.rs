//! SessionStatus enum for the lifecycle of a live classroom session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Lifecycle status of a live session.
///
/// `Cancelled` exists in stored data but nothing transitions into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Returns true while new registrations are accepted.
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, SessionStatus::Scheduled | SessionStatus::Active)
    }

    /// Returns true if the session may be deleted.
    ///
    /// Active and completed sessions are kept as historical record.
    pub fn is_deletable(&self) -> bool {
        !matches!(self, SessionStatus::Active | SessionStatus::Completed)
    }

    /// Returns true if the schedule (date, start, end) may still be edited.
    pub fn allows_rescheduling(&self) -> bool {
        matches!(self, SessionStatus::Scheduled)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Scheduled, Active) | (Active, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Scheduled => vec![Active],
            Active => vec![Completed],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown session status '{}'", other),
            )),
        }
    }
}
