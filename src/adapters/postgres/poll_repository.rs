//! PostgreSQL implementation of PollRepository.
//!
//! `record_response` takes a transaction-scoped advisory lock on
//! `(poll, user)` so the single-choice rule holds under concurrent
//! answers; the unique `(poll_id, user_id, option_id)` index backs the
//! multiple-choice rule.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use uuid::Uuid;

use super::rows::{column, db_error, user_column};
use crate::domain::foundation::{
    DomainError, ErrorCode, PollId, PollOptionId, SessionId, Timestamp, UserId,
};
use crate::domain::poll::{Poll, PollOption, PollResponse};
use crate::ports::PollRepository;

const POLL_COLUMNS: &str =
    "id, session_id, creator_id, question, is_anonymous, is_multiple_choice, created_at, ended_at";

#[derive(Clone)]
pub struct PostgresPollRepository {
    pool: PgPool,
}

impl PostgresPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads options for the given polls, grouped by poll and ordered.
    async fn options_for(&self, poll_ids: &[Uuid]) -> Result<HashMap<PollId, Vec<PollOption>>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, poll_id, option_text, order_index
            FROM poll_options
            WHERE poll_id = ANY($1)
            ORDER BY order_index, id
            "#,
        )
        .bind(poll_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch poll options"))?;

        let mut grouped: HashMap<PollId, Vec<PollOption>> = HashMap::new();
        for row in &rows {
            let option = PollOption {
                id: PollOptionId::from_uuid(column(row, "id")?),
                poll_id: PollId::from_uuid(column(row, "poll_id")?),
                text: column(row, "option_text")?,
                order_index: column(row, "order_index")?,
            };
            grouped.entry(option.poll_id).or_default().push(option);
        }
        Ok(grouped)
    }

    async fn with_options(&self, rows: Vec<PgRow>) -> Result<Vec<Poll>, DomainError> {
        let ids: Vec<Uuid> = rows
            .iter()
            .map(|row| column(row, "id"))
            .collect::<Result<_, _>>()?;
        let mut options = self.options_for(&ids).await?;
        rows.iter()
            .map(|row| {
                let mut poll = row_to_poll(row)?;
                poll.options = options.remove(&poll.id).unwrap_or_default();
                Ok(poll)
            })
            .collect()
    }
}

#[async_trait]
impl PollRepository for PostgresPollRepository {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query(&format!(
            "INSERT INTO session_polls ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            POLL_COLUMNS
        ))
        .bind(poll.id.as_uuid())
        .bind(poll.session_id.as_uuid())
        .bind(poll.creator_id.as_str())
        .bind(&poll.question)
        .bind(poll.is_anonymous)
        .bind(poll.is_multiple_choice)
        .bind(poll.created_at.as_datetime())
        .bind(poll.ended_at.map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert poll"))?;

        for option in &poll.options {
            sqlx::query(
                "INSERT INTO poll_options (id, poll_id, option_text, order_index) VALUES ($1, $2, $3, $4)",
            )
            .bind(option.id.as_uuid())
            .bind(option.poll_id.as_uuid())
            .bind(&option.text)
            .bind(option.order_index)
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert poll option"))?;
        }

        tx.commit().await.map_err(db_error("commit poll"))
    }

    async fn find_by_id(&self, poll_id: &PollId) -> Result<Option<Poll>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM session_polls WHERE id = $1", POLL_COLUMNS))
            .bind(poll_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch poll"))?;

        match row {
            Some(row) => Ok(self.with_options(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<Poll>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM session_polls WHERE session_id = $1 ORDER BY created_at DESC",
            POLL_COLUMNS
        ))
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list polls"))?;

        self.with_options(rows).await
    }

    async fn selected_options(&self, poll_id: &PollId, user_id: &UserId) -> Result<Vec<PollOptionId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT option_id FROM poll_responses WHERE poll_id = $1 AND user_id = $2 ORDER BY created_at",
        )
        .bind(poll_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch poll selections"))?;

        Ok(rows.into_iter().map(|(id,)| PollOptionId::from_uuid(id)).collect())
    }

    async fn record_response(&self, response: &PollResponse) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2))")
            .bind(response.poll_id.to_string())
            .bind(response.user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error("lock poll response"))?;

        let poll: Option<(bool, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT is_multiple_choice, ended_at FROM session_polls WHERE id = $1")
                .bind(response.poll_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("fetch poll"))?;
        let Some((multiple_choice, ended_at)) = poll else {
            return Err(DomainError::new(ErrorCode::PollNotFound, "Poll not found")
                .with_detail("id", response.poll_id.to_string()));
        };
        if ended_at.is_some() {
            return Err(DomainError::new(ErrorCode::InvalidStateTransition, "This poll has ended"));
        }

        let (option_exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM poll_options WHERE id = $1 AND poll_id = $2)",
        )
        .bind(response.option_id.as_uuid())
        .bind(response.poll_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("check poll option"))?;
        if !option_exists {
            return Err(DomainError::new(ErrorCode::PollOptionNotFound, "Poll option not found")
                .with_detail("id", response.option_id.to_string()));
        }

        let (duplicate,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM poll_responses
                WHERE poll_id = $1 AND user_id = $2 AND ($3 = FALSE OR option_id = $4)
            )
            "#,
        )
        .bind(response.poll_id.as_uuid())
        .bind(response.user_id.as_str())
        .bind(multiple_choice)
        .bind(response.option_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("check duplicate response"))?;
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::DuplicateResponse,
                "You have already responded to this poll",
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO poll_responses (id, poll_id, user_id, option_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(response.id.as_uuid())
        .bind(response.poll_id.as_uuid())
        .bind(response.user_id.as_str())
        .bind(response.option_id.as_uuid())
        .bind(response.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::new(
                ErrorCode::DuplicateResponse,
                "You have already responded to this poll",
            ),
            _ => DomainError::database(format!("Failed to insert poll response: {}", e)),
        })?;

        tx.commit().await.map_err(db_error("commit poll response"))
    }

    async fn response_counts(&self, poll_id: &PollId) -> Result<HashMap<PollOptionId, u64>, DomainError> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            "SELECT option_id, COUNT(*) FROM poll_responses WHERE poll_id = $1 GROUP BY option_id",
        )
        .bind(poll_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("count poll responses"))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (PollOptionId::from_uuid(id), count.max(0) as u64))
            .collect())
    }

    async fn end(&self, poll_id: &PollId, ended_at: Timestamp) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE session_polls SET ended_at = $2 WHERE id = $1 AND ended_at IS NULL")
            .bind(poll_id.as_uuid())
            .bind(ended_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error("end poll"))?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM session_polls WHERE id = $1)")
            .bind(poll_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check poll"))?;
        if !exists {
            return Err(DomainError::new(ErrorCode::PollNotFound, "Poll not found")
                .with_detail("id", poll_id.to_string()));
        }
        Ok(false)
    }
}

fn row_to_poll(row: &PgRow) -> Result<Poll, DomainError> {
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let ended_at: Option<DateTime<Utc>> = column(row, "ended_at")?;
    Ok(Poll {
        id: PollId::from_uuid(column(row, "id")?),
        session_id: SessionId::from_uuid(column(row, "session_id")?),
        creator_id: user_column(row, "creator_id")?,
        question: column(row, "question")?,
        is_anonymous: column(row, "is_anonymous")?,
        is_multiple_choice: column(row, "is_multiple_choice")?,
        created_at: Timestamp::from_datetime(created_at),
        ended_at: ended_at.map(Timestamp::from_datetime),
        options: Vec::new(),
    })
}
