//! PostgreSQL lookups against the course and user tables.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::db_error;
use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::ports::{CourseCatalog, UserDirectory};

#[derive(Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseCatalog for PostgresDirectory {
    async fn course_exists(&self, course_id: &CourseId) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)")
            .bind(course_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check course"))?;
        Ok(exists)
    }

    async fn is_course_instructor(&self, course_id: &CourseId, user_id: &UserId) -> Result<bool, DomainError> {
        let (teaches,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM course_instructors WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("check course instructor"))?;
        Ok(teaches)
    }
}

#[async_trait]
impl UserDirectory for PostgresDirectory {
    async fn display_names(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, String>, DomainError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<&str> = user_ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, display_name FROM users WHERE id = ANY($1)")
                .bind(&ids)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("fetch display names"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, name)| UserId::new(id).ok().map(|id| (id, name)))
            .collect())
    }
}
