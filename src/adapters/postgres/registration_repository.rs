//! PostgreSQL implementation of RegistrationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::rows::{column, db_error, parsed_column, user_column};
use crate::domain::foundation::{DomainError, RegistrationId, SessionId, Timestamp, UserId};
use crate::domain::registration::Registration;
use crate::ports::RegistrationRepository;

#[derive(Clone)]
pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn find(&self, session_id: &SessionId, user_id: &UserId) -> Result<Option<Registration>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, user_id, status, registered_at
            FROM session_registrations
            WHERE session_id = $1 AND user_id = $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch registration"))?;

        row.as_ref().map(row_to_registration).transpose()
    }

    async fn insert_if_absent(&self, registration: &Registration) -> Result<Registration, DomainError> {
        // The no-op DO UPDATE makes RETURNING yield the existing row.
        let row = sqlx::query(
            r#"
            INSERT INTO session_registrations (id, session_id, user_id, status, registered_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (session_id, user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, session_id, user_id, status, registered_at
            "#,
        )
        .bind(registration.id.as_uuid())
        .bind(registration.session_id.as_uuid())
        .bind(registration.user_id.as_str())
        .bind(registration.status.as_str())
        .bind(registration.registered_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("insert registration"))?;

        row_to_registration(&row)
    }

    async fn count_seated(&self, session_id: &SessionId) -> Result<u32, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM session_registrations
            WHERE session_id = $1 AND status IN ('registered', 'attended')
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count registrations"))?;

        Ok(count as u32)
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<Registration>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, user_id, status, registered_at
            FROM session_registrations
            WHERE session_id = $1
            ORDER BY registered_at
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list registrations"))?;

        rows.iter().map(row_to_registration).collect()
    }

    async fn mark_attended(&self, session_id: &SessionId, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE session_registrations SET status = 'attended'
            WHERE session_id = $1 AND user_id = $2 AND status = 'registered'
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("mark attendance"))?;

        Ok(result.rows_affected() == 1)
    }
}

fn row_to_registration(row: &PgRow) -> Result<Registration, DomainError> {
    let registered_at: DateTime<Utc> = column(row, "registered_at")?;
    Ok(Registration {
        id: RegistrationId::from_uuid(column(row, "id")?),
        session_id: SessionId::from_uuid(column(row, "session_id")?),
        user_id: user_column(row, "user_id")?,
        status: parsed_column(row, "status")?,
        registered_at: Timestamp::from_datetime(registered_at),
    })
}
