//! PostgreSQL implementation of SessionRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::rows::{column, db_error, parsed_column, user_column};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, RoomCode, SessionId, SessionStatus, Timestamp,
};
use crate::domain::session::{Schedule, Session, SessionSnapshot};
use crate::ports::{SessionFilter, SessionRepository, Timeframe};

const SESSION_COLUMNS: &str = "id, course_id, instructor_id, title, description, room_code, \
     status, session_date, start_time, end_time, actual_start_time, actual_end_time, \
     password_hash, max_participants, is_recorded, recording_url, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let s = session.snapshot();
        let max_participants = participant_limit_column(s.max_participants)?;
        sqlx::query(
            r#"
            INSERT INTO virtual_sessions (
                id, course_id, instructor_id, title, description, room_code, status,
                session_date, start_time, end_time, actual_start_time, actual_end_time,
                password_hash, max_participants, is_recorded, recording_url,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(s.id.as_uuid())
        .bind(s.course_id.as_uuid())
        .bind(s.instructor_id.as_str())
        .bind(&s.title)
        .bind(&s.description)
        .bind(s.room_code.as_str())
        .bind(s.status.as_str())
        .bind(s.schedule.date())
        .bind(s.schedule.start_time())
        .bind(s.schedule.end_time())
        .bind(s.actual_start_time.map(|t| *t.as_datetime()))
        .bind(s.actual_end_time.map(|t| *t.as_datetime()))
        .bind(&s.password_hash)
        .bind(max_participants)
        .bind(s.is_recorded)
        .bind(&s.recording_url)
        .bind(s.created_at.as_datetime())
        .bind(s.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert session"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM virtual_sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch session"))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn update_details(&self, session: &Session) -> Result<(), DomainError> {
        let s = session.snapshot();
        let max_participants = participant_limit_column(s.max_participants)?;
        let result = sqlx::query(
            r#"
            UPDATE virtual_sessions SET
                title = $2,
                description = $3,
                session_date = $4,
                start_time = $5,
                end_time = $6,
                password_hash = $7,
                max_participants = $8,
                is_recorded = $9,
                recording_url = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(s.id.as_uuid())
        .bind(&s.title)
        .bind(&s.description)
        .bind(s.schedule.date())
        .bind(s.schedule.start_time())
        .bind(s.schedule.end_time())
        .bind(&s.password_hash)
        .bind(max_participants)
        .bind(s.is_recorded)
        .bind(&s.recording_url)
        .bind(s.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update session"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", s.id),
            )
            .with_detail("id", s.id.to_string()));
        }
        Ok(())
    }

    async fn transition(&self, session: &Session, expected: SessionStatus) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE virtual_sessions SET
                status = $2,
                actual_start_time = $3,
                actual_end_time = $4,
                updated_at = $5
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.status().as_str())
        .bind(session.actual_start_time().map(|t| *t.as_datetime()))
        .bind(session.actual_end_time().map(|t| *t.as_datetime()))
        .bind(session.updated_at().as_datetime())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("transition session"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_if_removable(&self, id: &SessionId) -> Result<bool, DomainError> {
        // dependent rows go with ON DELETE CASCADE
        let result = sqlx::query(
            "DELETE FROM virtual_sessions WHERE id = $1 AND status NOT IN ('active', 'completed')",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_error("delete session"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_status(&self, status: SessionStatus) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM virtual_sessions WHERE status = $1",
            SESSION_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch sessions by status"))?;

        rows.iter().map(row_to_session).collect()
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<Session>, DomainError> {
        let mut query = list_query(filter);
        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list sessions"))?;

        rows.iter().map(row_to_session).collect()
    }
}

fn list_query(filter: &SessionFilter) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new(format!(
        "SELECT {} FROM virtual_sessions WHERE TRUE",
        SESSION_COLUMNS
    ));
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(course_id) = filter.course_id {
        query.push(" AND course_id = ").push_bind(*course_id.as_uuid());
    }
    if let Some(instructor_id) = &filter.instructor_id {
        query.push(" AND instructor_id = ").push_bind(instructor_id.as_str());
    }
    match filter.timeframe {
        Some(Timeframe::Upcoming) => {
            query.push(" AND status IN ('scheduled', 'active')");
        }
        Some(Timeframe::Past) => {
            query.push(" AND status IN ('completed', 'cancelled')");
        }
        None => {}
    }
    query.push(" ORDER BY created_at DESC");
    query
}

fn participant_limit_column(max: u32) -> Result<i32, DomainError> {
    i32::try_from(max).map_err(|_| {
        DomainError::validation(
            "max_participants",
            format!("Participant limit {} does not fit the sessions table", max),
        )
    })
}

fn row_to_session(row: &PgRow) -> Result<Session, DomainError> {
    let date: NaiveDate = column(row, "session_date")?;
    let start: NaiveTime = column(row, "start_time")?;
    let end: Option<NaiveTime> = column(row, "end_time")?;
    let schedule = Schedule::new(date, start, end).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored schedule: {}", e))
    })?;
    let max_participants: i32 = column(row, "max_participants")?;
    let actual_start: Option<DateTime<Utc>> = column(row, "actual_start_time")?;
    let actual_end: Option<DateTime<Utc>> = column(row, "actual_end_time")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let updated_at: DateTime<Utc> = column(row, "updated_at")?;
    let room_code: String = column(row, "room_code")?;

    Ok(Session::reconstitute(SessionSnapshot {
        id: SessionId::from_uuid(column(row, "id")?),
        course_id: CourseId::from_uuid(column(row, "course_id")?),
        instructor_id: user_column(row, "instructor_id")?,
        title: column(row, "title")?,
        description: column(row, "description")?,
        room_code: RoomCode::from_string(room_code),
        schedule,
        actual_start_time: actual_start.map(Timestamp::from_datetime),
        actual_end_time: actual_end.map(Timestamp::from_datetime),
        password_hash: column(row, "password_hash")?,
        max_participants: u32::try_from(max_participants).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored participant limit: {}", max_participants),
            )
        })?,
        is_recorded: column(row, "is_recorded")?,
        recording_url: column(row, "recording_url")?,
        status: parsed_column(row, "status")?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn participant_limit_must_fit_a_signed_column() {
        assert_eq!(participant_limit_column(30).unwrap(), 30);
        assert_eq!(participant_limit_column(i32::MAX as u32).unwrap(), i32::MAX);

        let err = participant_limit_column(i32::MAX as u32 + 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn empty_filter_lists_everything_newest_first() {
        let filter = SessionFilter::default();
        let query = list_query(&filter);
        assert!(query.sql().ends_with("WHERE TRUE ORDER BY created_at DESC"));
    }

    #[test]
    fn filters_add_bound_conditions() {
        let filter = SessionFilter {
            status: Some(SessionStatus::Active),
            instructor_id: Some(UserId::new("inst-1").unwrap()),
            timeframe: Some(Timeframe::Past),
            ..Default::default()
        };
        let query = list_query(&filter);
        let sql = query.sql();
        assert!(sql.contains("AND status = $1"));
        assert!(sql.contains("AND instructor_id = $2"));
        assert!(sql.contains("status IN ('completed', 'cancelled')"));
    }
}
