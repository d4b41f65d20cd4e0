//! Request and response bodies for session endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{
    CreateSessionCommand, ParticipantView, RegisterResult, SessionDetails, SessionSummary,
    UpdateSessionCommand,
};
use crate::domain::foundation::{CourseId, SessionId, SessionStatus, UserId};
use crate::domain::registration::{Registration, RegistrationStatus};
use crate::domain::session::Session;
use crate::ports::{SessionFilter, Timeframe};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub course_id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD`; required unless `start_now`.
    #[serde(default)]
    pub session_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub start_now: bool,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub is_recorded: Option<bool>,
    #[serde(default)]
    pub password: Option<String>,
}

impl From<CreateSessionRequest> for CreateSessionCommand {
    fn from(req: CreateSessionRequest) -> Self {
        Self {
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            session_date: req.session_date,
            start_time: req.start_time,
            end_time: req.end_time,
            start_now: req.start_now,
            max_participants: req.max_participants,
            is_recorded: req.is_recorded,
            password: req.password,
        }
    }
}

/// Partial update; omitted fields are unchanged. An empty `password`
/// removes the room password.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub session_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_participants: Option<u32>,
    pub is_recorded: Option<bool>,
    pub recording_url: Option<String>,
    pub password: Option<String>,
}

impl UpdateSessionRequest {
    pub fn into_command(self, session_id: SessionId) -> UpdateSessionCommand {
        UpdateSessionCommand {
            session_id,
            title: self.title,
            description: self.description,
            session_date: self.session_date,
            start_time: self.start_time,
            end_time: self.end_time,
            max_participants: self.max_participants,
            is_recorded: self.is_recorded,
            recording_url: self.recording_url,
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeParam {
    Upcoming,
    Past,
}

/// Query string of `GET /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListSessionsParams {
    pub status: Option<SessionStatus>,
    pub course_id: Option<CourseId>,
    pub instructor_id: Option<String>,
    pub timeframe: Option<TimeframeParam>,
}

impl ListSessionsParams {
    pub fn into_filter(self) -> SessionFilter {
        SessionFilter {
            status: self.status,
            course_id: self.course_id,
            instructor_id: self.instructor_id.and_then(|id| UserId::new(id).ok()),
            timeframe: self.timeframe.map(|t| match t {
                TimeframeParam::Upcoming => Timeframe::Upcoming,
                TimeframeParam::Past => Timeframe::Past,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub password: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: Session,
    pub has_password: bool,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            has_password: session.has_password(),
            session,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub participant_count: u32,
}

impl From<SessionSummary> for SessionSummaryResponse {
    fn from(summary: SessionSummary) -> Self {
        Self {
            session: summary.session.into(),
            participant_count: summary.participant_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummaryResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailsResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub participant_count: u32,
    pub participants: Vec<ParticipantView>,
    pub my_registration: Option<RegistrationStatus>,
}

impl From<SessionDetails> for SessionDetailsResponse {
    fn from(details: SessionDetails) -> Self {
        Self {
            session: details.session.into(),
            participant_count: details.participant_count,
            participants: details.participants,
            my_registration: details.viewer_registration,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub registration: Registration,
    pub already_registered: bool,
}

impl From<RegisterResult> for RegisterResponse {
    fn from(result: RegisterResult) -> Self {
        Self {
            registration: result.registration,
            already_registered: result.already_registered,
        }
    }
}
