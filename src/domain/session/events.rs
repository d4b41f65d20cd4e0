//! Session domain events.
//!
//! - `SessionCreated` - New session scheduled or started immediately
//! - `SessionStarted` - Session went live
//! - `SessionCompleted` - Session ended, manually or by reconciliation
//! - `SessionDeleted` - Scheduled session removed by its instructor

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CourseId, EventId, SessionId, SessionStatus, Timestamp, UserId,
};

// ════════════════════════════════════════════════════════════════════════════
// SessionCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    /// Scheduled, or Active for start-now sessions.
    pub status: SessionStatus,
    pub scheduled_start: Timestamp,
    pub created_at: Timestamp,
}

domain_event!(
    SessionCreated,
    event_type = "session.created.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionStarted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a scheduled session is moved to Active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub started_at: Timestamp,
}

domain_event!(
    SessionStarted,
    event_type = "session.started.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = started_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Why a session was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The instructor ended it.
    EndedByInstructor,
    /// Its scheduled end time passed.
    EndTimeReached,
    /// It stayed active past the maximum allowed duration.
    MaxDurationExceeded,
}

/// Published when a session is moved to Completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub reason: CompletionReason,
    pub completed_at: Timestamp,
}

domain_event!(
    SessionCompleted,
    event_type = "session.completed.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionDeleted
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDeleted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub deleted_by: UserId,
    pub deleted_at: Timestamp,
}

domain_event!(
    SessionDeleted,
    event_type = "session.deleted.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = deleted_at,
    event_id = event_id
);
