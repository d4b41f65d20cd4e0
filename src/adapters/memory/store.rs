use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::domain::breakout::{BreakoutParticipant, BreakoutRoom};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId};
use crate::domain::poll::{Poll, PollResponse};
use crate::domain::presence::ActivityRecord;
use crate::domain::registration::Registration;
use crate::domain::session::Session;

/// Rows held by the store. Vectors keep insertion order, which several
/// queries depend on.
#[derive(Default)]
pub(super) struct State {
    pub sessions: Vec<Session>,
    pub registrations: Vec<Registration>,
    pub activities: Vec<ActivityRecord>,
    pub rooms: Vec<BreakoutRoom>,
    pub breakout_participants: Vec<BreakoutParticipant>,
    pub polls: Vec<Poll>,
    pub responses: Vec<PollResponse>,
    /// Course id to its instructors.
    pub courses: HashMap<CourseId, HashSet<UserId>>,
    pub display_names: HashMap<UserId, String>,
}

/// Shared in-memory backing for all repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a course with its instructors.
    pub fn add_course(&self, course_id: CourseId, instructors: impl IntoIterator<Item = UserId>) {
        if let Ok(mut state) = self.state.lock() {
            state
                .courses
                .entry(course_id)
                .or_default()
                .extend(instructors);
        }
    }

    /// Registers a user's display name.
    pub fn add_user(&self, user_id: UserId, display_name: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.display_names.insert(user_id, display_name.into());
        }
    }

    pub(super) fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned"))
    }
}
