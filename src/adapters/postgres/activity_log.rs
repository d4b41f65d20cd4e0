//! PostgreSQL implementation of ActivityLog.
//!
//! Roster queries lean on the `(session_id, user_id, occurred_at)` index;
//! `seq` breaks ties between records sharing a timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::rows::{column, db_error, parsed_column, user_column};
use crate::domain::foundation::{ActivityId, DomainError, SessionId, Timestamp, UserId};
use crate::domain::presence::{ActivityRecord, ParticipantActivity};
use crate::ports::ActivityLog;

#[derive(Clone)]
pub struct PostgresActivityLog {
    pool: PgPool,
}

impl PostgresActivityLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLog for PostgresActivityLog {
    async fn append(&self, record: &ActivityRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO session_activities (
                id, session_id, user_id, action, action_value, duration_seconds,
                device_info, ip_address, occurred_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.session_id.as_uuid())
        .bind(record.user_id.as_str())
        .bind(record.action.as_str())
        .bind(&record.action_value)
        .bind(record.duration_seconds)
        .bind(&record.device_info)
        .bind(&record.ip_address)
        .bind(record.occurred_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("append activity"))?;

        Ok(())
    }

    async fn latest_join(&self, session_id: &SessionId, user_id: &UserId) -> Result<Option<Timestamp>, DomainError> {
        let (latest,): (Option<DateTime<Utc>>,) = sqlx::query_as(
            r#"
            SELECT MAX(occurred_at) FROM session_activities
            WHERE session_id = $1 AND user_id = $2 AND action = 'join'
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("fetch latest join"))?;

        Ok(latest.map(Timestamp::from_datetime))
    }

    async fn participant_summaries(&self, session_id: &SessionId) -> Result<Vec<ParticipantActivity>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (a.user_id)
                a.user_id,
                a.action AS latest_action,
                a.occurred_at AS latest_at,
                (SELECT MIN(j.occurred_at) FROM session_activities j
                 WHERE j.session_id = a.session_id AND j.user_id = a.user_id
                   AND j.action = 'join') AS first_joined_at
            FROM session_activities a
            WHERE a.session_id = $1
            ORDER BY a.user_id, a.occurred_at DESC, a.seq DESC
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("summarize activity"))?;

        rows.iter()
            .map(|row| {
                let latest_at: DateTime<Utc> = column(row, "latest_at")?;
                let first_joined_at: Option<DateTime<Utc>> = column(row, "first_joined_at")?;
                Ok(ParticipantActivity {
                    user_id: user_column(row, "user_id")?,
                    first_joined_at: first_joined_at.map(Timestamp::from_datetime),
                    latest_action: parsed_column(row, "latest_action")?,
                    latest_at: Timestamp::from_datetime(latest_at),
                })
            })
            .collect()
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<ActivityRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, user_id, action, action_value, duration_seconds,
                   device_info, ip_address, occurred_at
            FROM session_activities
            WHERE session_id = $1
            ORDER BY seq
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list activities"))?;

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &PgRow) -> Result<ActivityRecord, DomainError> {
    let occurred_at: DateTime<Utc> = column(row, "occurred_at")?;
    Ok(ActivityRecord {
        id: ActivityId::from_uuid(column(row, "id")?),
        session_id: SessionId::from_uuid(column(row, "session_id")?),
        user_id: user_column(row, "user_id")?,
        action: parsed_column(row, "action")?,
        action_value: column(row, "action_value")?,
        duration_seconds: column(row, "duration_seconds")?,
        device_info: column(row, "device_info")?,
        ip_address: column(row, "ip_address")?,
        occurred_at: Timestamp::from_datetime(occurred_at),
    })
}
