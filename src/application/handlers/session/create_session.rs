//! CreateSessionHandler - schedules a session or starts one immediately.

use std::sync::Arc;

use crate::application::handlers::support::publish_logged;
use crate::domain::foundation::{
    ClassroomError, CommandMetadata, CourseId, EventId, Role, SerializableDomainEvent, SessionId,
};
use crate::domain::session::{parse_time_of_day, NewSession, Schedule, Session, SessionCreated};
use crate::ports::{Clock, CourseCatalog, EventPublisher, PasswordHasher, SessionRepository};

/// Command to create a new session.
///
/// Date and time fields are raw client strings; see `Schedule::parse` for
/// the accepted formats.
#[derive(Debug, Clone, Default)]
pub struct CreateSessionCommand {
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub session_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_now: bool,
    pub max_participants: Option<u32>,
    pub is_recorded: Option<bool>,
    /// Plaintext join password; blank means none.
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: Session,
}

pub struct CreateSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    courses: Arc<dyn CourseCatalog>,
    hasher: Arc<dyn PasswordHasher>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl CreateSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        courses: Arc<dyn CourseCatalog>,
        hasher: Arc<dyn PasswordHasher>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            courses,
            hasher,
            publisher,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, ClassroomError> {
        // 1. Role and course gating
        if !metadata.role.can_host() {
            return Err(ClassroomError::permission_denied(
                "Only instructors can create sessions",
            ));
        }
        if !self.courses.course_exists(&cmd.course_id).await? {
            return Err(ClassroomError::not_found("Course", cmd.course_id));
        }
        if metadata.role == Role::Instructor
            && !self
                .courses
                .is_course_instructor(&cmd.course_id, &metadata.user_id)
                .await?
        {
            return Err(ClassroomError::permission_denied(
                "You are not an instructor of this course",
            ));
        }

        // 2. Build the aggregate
        let password_hash = match cmd.password.as_deref() {
            Some(plain) if !plain.is_empty() => Some(self.hasher.hash(plain)?),
            _ => None,
        };
        let new = NewSession {
            course_id: cmd.course_id,
            instructor_id: metadata.user_id.clone(),
            title: cmd.title,
            description: cmd.description,
            max_participants: cmd.max_participants,
            is_recorded: cmd.is_recorded,
            password_hash,
        };

        let now = self.clock.now();
        let session = if cmd.start_now {
            let end_time = match non_blank(&cmd.end_time) {
                Some(raw) => Some(parse_time_of_day("end_time", raw)?),
                None => None,
            };
            Session::start_now(SessionId::new(), new, end_time, now)?
        } else {
            let date = non_blank(&cmd.session_date).ok_or_else(|| {
                ClassroomError::validation("session_date", "A date is required unless starting now")
            })?;
            let start = non_blank(&cmd.start_time).ok_or_else(|| {
                ClassroomError::validation("start_time", "A start time is required unless starting now")
            })?;
            let schedule = Schedule::parse(date, start, non_blank(&cmd.end_time))?;
            Session::scheduled(SessionId::new(), new, schedule, now)?
        };

        // 3. Persist
        self.sessions.save(&session).await?;
        tracing::info!(
            session_id = %session.id(),
            status = %session.status(),
            "session created"
        );

        // 4. Announce
        let event = SessionCreated {
            event_id: EventId::new(),
            session_id: *session.id(),
            course_id: *session.course_id(),
            instructor_id: session.instructor_id().clone(),
            title: session.title().to_string(),
            status: session.status(),
            scheduled_start: session.schedule().starts_at(),
            created_at: *session.created_at(),
        };
        let envelope = event.to_envelope().caused_by(&metadata);
        publish_logged(self.publisher.as_ref(), envelope).await;

        Ok(CreateSessionResult { session })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
