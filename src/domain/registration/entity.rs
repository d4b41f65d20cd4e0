//! Registration entity and status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{RegistrationId, SessionId, Timestamp, UserId, ValidationError};

/// Status of a user's seat in a session.
///
/// `Cancelled` and `Absent` can be stored but are never assigned here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Attended,
    Cancelled,
    Absent,
}

impl RegistrationStatus {
    /// Seats that count toward capacity and allow poll responses.
    pub fn holds_seat(&self) -> bool {
        matches!(self, RegistrationStatus::Registered | RegistrationStatus::Attended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Attended => "attended",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Absent => "absent",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(RegistrationStatus::Registered),
            "attended" => Ok(RegistrationStatus::Attended),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            "absent" => Ok(RegistrationStatus::Absent),
            other => Err(ValidationError::invalid_format(
                "registration_status",
                format!("unknown registration status '{}'", other),
            )),
        }
    }
}

/// A user's registration for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub status: RegistrationStatus,
    pub registered_at: Timestamp,
}

impl Registration {
    /// Creates a fresh `Registered` seat.
    pub fn new(session_id: SessionId, user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: RegistrationId::new(),
            session_id,
            user_id,
            status: RegistrationStatus::Registered,
            registered_at: now,
        }
    }

    pub fn holds_seat(&self) -> bool {
        self.status.holds_seat()
    }
}
