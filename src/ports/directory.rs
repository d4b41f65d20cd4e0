//! Read-only lookups into the wider platform: courses and user profiles.
//!
//! Both are owned by other services; this crate only reads them.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::foundation::{CourseId, DomainError, UserId};

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn course_exists(&self, course_id: &CourseId) -> Result<bool, DomainError>;

    /// Whether the user is listed as an instructor of the course.
    async fn is_course_instructor(&self, course_id: &CourseId, user_id: &UserId) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Display names for the given users. Unknown users are simply absent
    /// from the map.
    async fn display_names(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, String>, DomainError>;
}
