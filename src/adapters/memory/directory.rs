use async_trait::async_trait;
use std::collections::HashMap;

use super::InMemoryStore;
use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::ports::{CourseCatalog, UserDirectory};

#[async_trait]
impl CourseCatalog for InMemoryStore {
    async fn course_exists(&self, course_id: &CourseId) -> Result<bool, DomainError> {
        Ok(self.lock()?.courses.contains_key(course_id))
    }

    async fn is_course_instructor(&self, course_id: &CourseId, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self
            .lock()?
            .courses
            .get(course_id)
            .is_some_and(|instructors| instructors.contains(user_id)))
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn display_names(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, String>, DomainError> {
        let state = self.lock()?;
        Ok(user_ids
            .iter()
            .filter_map(|id| {
                state
                    .display_names
                    .get(id)
                    .map(|name| (id.clone(), name.clone()))
            })
            .collect())
    }
}
