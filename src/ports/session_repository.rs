//! Session repository port.
//!
//! Lifecycle writes are split from owner edits so that an edit can never
//! undo a concurrent status transition:
//!
//! - `update_details` writes only owner-editable columns
//! - `transition` writes status and the actual start/end stamps, guarded by
//!   the status the caller last observed

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, SessionId, SessionStatus, UserId};
use crate::domain::session::Session;

/// Coarse time filter for session listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// Scheduled or active sessions.
    Upcoming,
    /// Completed or cancelled sessions.
    Past,
}

/// Listing filter. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub course_id: Option<CourseId>,
    pub instructor_id: Option<UserId>,
    pub timeframe: Option<Timeframe>,
}

impl SessionFilter {
    /// Applies the filter to an in-memory session.
    pub fn matches(&self, session: &Session) -> bool {
        self.status.map_or(true, |s| session.status() == s)
            && self.course_id.map_or(true, |c| session.course_id() == &c)
            && self
                .instructor_id
                .as_ref()
                .map_or(true, |i| session.instructor_id() == i)
            && self.timeframe.map_or(true, |t| match t {
                Timeframe::Upcoming => matches!(
                    session.status(),
                    SessionStatus::Scheduled | SessionStatus::Active
                ),
                Timeframe::Past => matches!(
                    session.status(),
                    SessionStatus::Completed | SessionStatus::Cancelled
                ),
            })
    }
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session.
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Persist owner-editable fields (title, description, schedule,
    /// capacity, recording, password hash). Never writes status or the
    /// actual start/end times.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    async fn update_details(&self, session: &Session) -> Result<(), DomainError>;

    /// Compare-and-set write of status and actual start/end times.
    ///
    /// Returns `false` without writing if the stored status is no longer
    /// `expected`.
    async fn transition(&self, session: &Session, expected: SessionStatus) -> Result<bool, DomainError>;

    /// Delete the session (and its dependent rows) unless it is active or
    /// completed at write time. Returns `false` if nothing was deleted.
    async fn delete_if_removable(&self, id: &SessionId) -> Result<bool, DomainError>;

    /// All sessions currently in `status`, for the reconciliation scan.
    async fn find_by_status(&self, status: SessionStatus) -> Result<Vec<Session>, DomainError>;

    /// Sessions matching the filter, newest first.
    async fn list(&self, filter: &SessionFilter) -> Result<Vec<Session>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::session::{test_support::new_session, Schedule};

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }

    #[test]
    fn filter_matches_on_every_set_field() {
        let new = new_session("inst-1");
        let course = new.course_id;
        let session = Session::scheduled(
            SessionId::new(),
            new,
            Schedule::parse("2030-01-01", "10:00", None).unwrap(),
            Timestamp::now(),
        )
        .unwrap();

        assert!(SessionFilter::default().matches(&session));
        assert!(SessionFilter {
            course_id: Some(course),
            timeframe: Some(Timeframe::Upcoming),
            ..Default::default()
        }
        .matches(&session));
        assert!(!SessionFilter {
            timeframe: Some(Timeframe::Past),
            ..Default::default()
        }
        .matches(&session));
        assert!(!SessionFilter {
            instructor_id: Some(UserId::new("someone-else").unwrap()),
            ..Default::default()
        }
        .matches(&session));
    }
}
