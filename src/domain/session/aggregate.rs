//! Session aggregate entity.
//!
//! A session is a time-boxed live meeting tied to a course and owned by one
//! instructor. Status only moves forward: Scheduled -> Active -> Completed.
//!
//! # Invariants
//!
//! - `actual_start_time` is set iff the session has reached Active
//! - `actual_end_time` is set iff the session is Completed
//! - the join password is only ever held as a one-way hash

use serde::Serialize;

use super::Schedule;
use crate::domain::foundation::{
    ClassroomError, CourseId, RoomCode, SessionId, SessionStatus, StateMachine, Timestamp, UserId,
};

/// Maximum length for session title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Participant limit applied when the creator does not give one.
pub const DEFAULT_MAX_PARTICIPANTS: u32 = 30;

/// Largest participant limit a session may carry; storage keeps it as a signed 32-bit column.
pub const MAX_PARTICIPANTS_LIMIT: u32 = i32::MAX as u32;

/// Session aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    id: SessionId,
    course_id: CourseId,
    instructor_id: UserId,
    title: String,
    description: Option<String>,
    room_code: RoomCode,
    schedule: Schedule,
    actual_start_time: Option<Timestamp>,
    actual_end_time: Option<Timestamp>,
    #[serde(skip)]
    password_hash: Option<String>,
    /// Zero means unlimited.
    max_participants: u32,
    is_recorded: bool,
    recording_url: Option<String>,
    status: SessionStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Creator-supplied attributes of a new session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub max_participants: Option<u32>,
    pub is_recorded: Option<bool>,
    pub password_hash: Option<String>,
}

/// Persisted form of a session, used to rebuild the aggregate.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub room_code: RoomCode,
    pub schedule: Schedule,
    pub actual_start_time: Option<Timestamp>,
    pub actual_end_time: Option<Timestamp>,
    pub password_hash: Option<String>,
    pub max_participants: u32,
    pub is_recorded: bool,
    pub recording_url: Option<String>,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// How an update treats the join password.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PasswordChange {
    #[default]
    Keep,
    Clear,
    /// Replace with an already-hashed password.
    Set(String),
}

/// Owner edits. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub session_date: Option<chrono::NaiveDate>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub max_participants: Option<u32>,
    pub is_recorded: Option<bool>,
    pub recording_url: Option<String>,
    pub password: PasswordChange,
}

impl SessionChanges {
    fn touches_schedule(&self) -> bool {
        self.session_date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

impl Session {
    /// Creates a session waiting for its scheduled start.
    pub fn scheduled(
        id: SessionId,
        new: NewSession,
        schedule: Schedule,
        now: Timestamp,
    ) -> Result<Self, ClassroomError> {
        Self::build(id, new, schedule, SessionStatus::Scheduled, None, now)
    }

    /// Creates a session that is live immediately.
    pub fn start_now(
        id: SessionId,
        new: NewSession,
        end_time: Option<chrono::NaiveTime>,
        now: Timestamp,
    ) -> Result<Self, ClassroomError> {
        let schedule = Schedule::starting_at(now, end_time)?;
        Self::build(id, new, schedule, SessionStatus::Active, Some(now), now)
    }

    fn build(
        id: SessionId,
        new: NewSession,
        schedule: Schedule,
        status: SessionStatus,
        actual_start_time: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<Self, ClassroomError> {
        let title = Self::validate_title(new.title)?;
        let max_participants =
            Self::validate_max_participants(new.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS))?;
        Ok(Self {
            id,
            course_id: new.course_id,
            instructor_id: new.instructor_id,
            title,
            description: new.description.filter(|d| !d.trim().is_empty()),
            room_code: RoomCode::generate(),
            schedule,
            actual_start_time,
            actual_end_time: None,
            password_hash: new.password_hash,
            max_participants,
            is_recorded: new.is_recorded.unwrap_or(true),
            recording_url: None,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(snapshot: SessionSnapshot) -> Self {
        Self {
            id: snapshot.id,
            course_id: snapshot.course_id,
            instructor_id: snapshot.instructor_id,
            title: snapshot.title,
            description: snapshot.description,
            room_code: snapshot.room_code,
            schedule: snapshot.schedule,
            actual_start_time: snapshot.actual_start_time,
            actual_end_time: snapshot.actual_end_time,
            password_hash: snapshot.password_hash,
            max_participants: snapshot.max_participants,
            is_recorded: snapshot.is_recorded,
            recording_url: snapshot.recording_url,
            status: snapshot.status,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    /// Persisted form of this session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            course_id: self.course_id,
            instructor_id: self.instructor_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            room_code: self.room_code.clone(),
            schedule: self.schedule,
            actual_start_time: self.actual_start_time,
            actual_end_time: self.actual_end_time,
            password_hash: self.password_hash.clone(),
            max_participants: self.max_participants,
            is_recorded: self.is_recorded,
            recording_url: self.recording_url.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn instructor_id(&self) -> &UserId {
        &self.instructor_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn actual_start_time(&self) -> Option<Timestamp> {
        self.actual_start_time
    }

    pub fn actual_end_time(&self) -> Option<Timestamp> {
        self.actual_end_time
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn max_participants(&self) -> u32 {
        self.max_participants
    }

    /// Returns the participant limit, or `None` if unlimited.
    pub fn capacity(&self) -> Option<u32> {
        (self.max_participants > 0).then_some(self.max_participants)
    }

    pub fn is_recorded(&self) -> bool {
        self.is_recorded
    }

    pub fn recording_url(&self) -> Option<&str> {
        self.recording_url.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user is the owning instructor.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.instructor_id == user_id
    }

    /// Fails with `PermissionDenied` unless the user owns this session.
    pub fn authorize_owner(&self, user_id: &UserId, action: &str) -> Result<(), ClassroomError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(ClassroomError::permission_denied(format!(
                "Only the session instructor can {}",
                action
            )))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Scheduled -> Active, stamping the actual start time.
    pub fn start(&mut self, now: Timestamp) -> Result<(), ClassroomError> {
        self.transition(SessionStatus::Active, now)?;
        self.actual_start_time = Some(now);
        Ok(())
    }

    /// Active -> Completed, stamping the actual end time.
    pub fn complete(&mut self, now: Timestamp) -> Result<(), ClassroomError> {
        self.transition(SessionStatus::Completed, now)?;
        self.actual_end_time = Some(now);
        Ok(())
    }

    fn transition(&mut self, target: SessionStatus, now: Timestamp) -> Result<(), ClassroomError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            ClassroomError::invalid_transition(format!(
                "Cannot move session from {} to {}",
                self.status, target
            ))
        })?;
        self.updated_at = now;
        Ok(())
    }

    /// Fails with `InvalidTransition` if the session must be kept.
    pub fn ensure_deletable(&self) -> Result<(), ClassroomError> {
        if self.status.is_deletable() {
            Ok(())
        } else {
            Err(ClassroomError::invalid_transition(format!(
                "Cannot delete a session that is {}",
                self.status
            )))
        }
    }

    /// Fails with `InvalidTransition` unless the session is live.
    pub fn ensure_active(&self, action: &str) -> Result<(), ClassroomError> {
        if self.status == SessionStatus::Active {
            Ok(())
        } else {
            Err(ClassroomError::invalid_transition(format!(
                "Cannot {} while the session is {}",
                action, self.status
            )))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Time checks used by reconciliation
    // ─────────────────────────────────────────────────────────────────────────

    /// Scheduled and the scheduled start is at or before `now`.
    pub fn is_due_to_start(&self, now: Timestamp) -> bool {
        self.status == SessionStatus::Scheduled && !self.schedule.starts_at().is_after(&now)
    }

    /// Active with an end time at or before `now`.
    pub fn is_past_end(&self, now: Timestamp) -> bool {
        self.status == SessionStatus::Active
            && self
                .schedule
                .ends_at()
                .is_some_and(|end| !end.is_after(&now))
    }

    /// Active and started more than `max_hours` ago.
    pub fn has_run_longer_than(&self, max_hours: i64, now: Timestamp) -> bool {
        self.status == SessionStatus::Active
            && self
                .actual_start_time
                .is_some_and(|started| started.is_before(&now.minus_hours(max_hours)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies owner edits. Never touches status or the actual start/end times.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the schedule changes after the session started
    /// - `ValidationFailed` for an empty title, an end time before the start,
    ///   or a participant limit above [`MAX_PARTICIPANTS_LIMIT`]
    pub fn apply_changes(&mut self, changes: SessionChanges, now: Timestamp) -> Result<(), ClassroomError> {
        if changes.touches_schedule() {
            if !self.status.allows_rescheduling() {
                return Err(ClassroomError::invalid_transition(format!(
                    "Cannot reschedule a session that is {}",
                    self.status
                )));
            }
            self.schedule = self.schedule.with_changes(
                changes.session_date,
                changes.start_time,
                changes.end_time,
            )?;
        }

        if let Some(title) = changes.title {
            self.title = Self::validate_title(title)?;
        }
        if let Some(description) = changes.description {
            self.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(max) = changes.max_participants {
            self.max_participants = Self::validate_max_participants(max)?;
        }
        if let Some(is_recorded) = changes.is_recorded {
            self.is_recorded = is_recorded;
        }
        if let Some(url) = changes.recording_url {
            self.recording_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        match changes.password {
            PasswordChange::Keep => {}
            PasswordChange::Clear => self.password_hash = None,
            PasswordChange::Set(hash) => self.password_hash = Some(hash),
        }

        self.updated_at = now;
        Ok(())
    }

    fn validate_title(title: String) -> Result<String, ClassroomError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ClassroomError::validation("title", "Title cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(ClassroomError::validation(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }

    fn validate_max_participants(max: u32) -> Result<u32, ClassroomError> {
        if max > MAX_PARTICIPANTS_LIMIT {
            return Err(ClassroomError::validation(
                "max_participants",
                format!("Participant limit cannot exceed {}", MAX_PARTICIPANTS_LIMIT),
            ));
        }
        Ok(max)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn new_session(instructor: &str) -> NewSession {
        NewSession {
            course_id: CourseId::new(),
            instructor_id: UserId::new(instructor).unwrap(),
            title: "Linear Algebra Office Hours".to_string(),
            description: None,
            max_participants: None,
            is_recorded: None,
            password_hash: None,
        }
    }
}
