//! PostgreSQL implementation of BreakoutRepository.
//!
//! `open_round` locks the session row so two rounds cannot open at once.
//! `move_participant` locks the target room row and runs close-old and
//! open-new in one transaction; the partial unique index on open rows
//! rejects anything that slips past.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Transaction};

use super::rows::{column, db_error, user_column};
use crate::domain::breakout::{BreakoutParticipant, BreakoutRoom, BreakoutRound};
use crate::domain::foundation::{
    BreakoutParticipantId, BreakoutRoomId, DomainError, ErrorCode, SessionId, Timestamp, UserId,
};
use crate::ports::{BreakoutRepository, JoinOutcome};

const PARTICIPANT_COLUMNS: &str = "id, room_id, session_id, user_id, joined_at, left_at";

#[derive(Clone)]
pub struct PostgresBreakoutRepository {
    pool: PgPool,
}

impl PostgresBreakoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool.begin().await.map_err(db_error("begin transaction"))
    }
}

async fn insert_participant(
    tx: &mut Transaction<'static, Postgres>,
    row: &BreakoutParticipant,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO breakout_room_participants (id, room_id, session_id, user_id, joined_at, left_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(row.id.as_uuid())
    .bind(row.room_id.as_uuid())
    .bind(row.session_id.as_uuid())
    .bind(row.user_id.as_str())
    .bind(row.joined_at.as_datetime())
    .bind(row.left_at.map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await
    .map_err(db_error("insert breakout participant"))?;
    Ok(())
}

#[async_trait]
impl BreakoutRepository for PostgresBreakoutRepository {
    async fn open_round(&self, round: &BreakoutRound) -> Result<(), DomainError> {
        let Some(session_id) = round.rooms.first().map(|r| r.session_id) else {
            return Ok(());
        };
        let mut tx = self.begin().await?;

        sqlx::query("SELECT id FROM virtual_sessions WHERE id = $1 FOR UPDATE")
            .bind(session_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock session"))?;

        let (open,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM breakout_rooms WHERE session_id = $1 AND ended_at IS NULL)",
        )
        .bind(session_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("check open rooms"))?;
        if open {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "A breakout round is already open for this session",
            ));
        }

        for room in &round.rooms {
            sqlx::query(
                r#"
                INSERT INTO breakout_rooms (id, session_id, name, position, created_at, ended_at)
                VALUES ($1, $2, $3, $4, $5, NULL)
                "#,
            )
            .bind(room.id.as_uuid())
            .bind(room.session_id.as_uuid())
            .bind(&room.name)
            .bind(room.position)
            .bind(room.created_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert breakout room"))?;
        }
        for row in &round.participants {
            insert_participant(&mut tx, row).await?;
        }

        tx.commit().await.map_err(db_error("commit breakout round"))
    }

    async fn find_room(&self, room_id: &BreakoutRoomId) -> Result<Option<BreakoutRoom>, DomainError> {
        let row = sqlx::query(
            "SELECT id, session_id, name, position, created_at, ended_at FROM breakout_rooms WHERE id = $1",
        )
        .bind(room_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch breakout room"))?;

        row.as_ref().map(row_to_room).transpose()
    }

    async fn open_rooms(&self, session_id: &SessionId) -> Result<Vec<BreakoutRoom>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, name, position, created_at, ended_at
            FROM breakout_rooms
            WHERE session_id = $1 AND ended_at IS NULL
            ORDER BY created_at, position
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list open breakout rooms"))?;

        rows.iter().map(row_to_room).collect()
    }

    async fn open_participants(&self, room_id: &BreakoutRoomId) -> Result<Vec<BreakoutParticipant>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM breakout_room_participants WHERE room_id = $1 AND left_at IS NULL ORDER BY joined_at",
            PARTICIPANT_COLUMNS
        ))
        .bind(room_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list breakout participants"))?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn open_participation(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<Option<BreakoutParticipant>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM breakout_room_participants \
             WHERE session_id = $1 AND user_id = $2 AND left_at IS NULL",
            PARTICIPANT_COLUMNS
        ))
        .bind(session_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch breakout participation"))?;

        row.as_ref().map(row_to_participant).transpose()
    }

    async fn move_participant(
        &self,
        room: &BreakoutRoom,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<JoinOutcome, DomainError> {
        let mut tx = self.begin().await?;

        let ended: Option<(Option<DateTime<Utc>>,)> =
            sqlx::query_as("SELECT ended_at FROM breakout_rooms WHERE id = $1 FOR UPDATE")
                .bind(room.id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("lock breakout room"))?;
        if !matches!(ended, Some((None,))) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "This breakout room has been closed",
            ));
        }

        let current = sqlx::query(&format!(
            "SELECT {} FROM breakout_room_participants \
             WHERE session_id = $1 AND user_id = $2 AND left_at IS NULL FOR UPDATE",
            PARTICIPANT_COLUMNS
        ))
        .bind(room.session_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("fetch breakout participation"))?;
        let current = current.as_ref().map(row_to_participant).transpose()?;

        let left_room = match current {
            Some(existing) if existing.room_id == room.id => {
                return Ok(JoinOutcome::AlreadyInRoom(existing));
            }
            Some(existing) => {
                sqlx::query("UPDATE breakout_room_participants SET left_at = $2 WHERE id = $1")
                    .bind(existing.id.as_uuid())
                    .bind(now.as_datetime())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("close breakout participation"))?;
                Some(existing.room_id)
            }
            None => None,
        };

        let participant = BreakoutParticipant::enter(room, user_id.clone(), now);
        insert_participant(&mut tx, &participant).await?;
        tx.commit().await.map_err(db_error("commit breakout join"))?;

        Ok(JoinOutcome::Joined {
            participant,
            left_room,
        })
    }

    async fn leave(&self, room_id: &BreakoutRoomId, user_id: &UserId, now: Timestamp) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE breakout_room_participants SET left_at = $3
            WHERE room_id = $1 AND user_id = $2 AND left_at IS NULL
            "#,
        )
        .bind(room_id.as_uuid())
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("leave breakout room"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn close_room(&self, room_id: &BreakoutRoomId, now: Timestamp) -> Result<bool, DomainError> {
        let mut tx = self.begin().await?;
        let closed = sqlx::query(
            "UPDATE breakout_rooms SET ended_at = $2 WHERE id = $1 AND ended_at IS NULL",
        )
        .bind(room_id.as_uuid())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("close breakout room"))?
        .rows_affected()
            == 1;

        if closed {
            sqlx::query(
                "UPDATE breakout_room_participants SET left_at = $2 WHERE room_id = $1 AND left_at IS NULL",
            )
            .bind(room_id.as_uuid())
            .bind(now.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(db_error("close breakout participants"))?;
        }

        tx.commit().await.map_err(db_error("commit breakout close"))?;
        Ok(closed)
    }

    async fn close_all(&self, session_id: &SessionId, now: Timestamp) -> Result<usize, DomainError> {
        let mut tx = self.begin().await?;
        let closed = sqlx::query(
            "UPDATE breakout_rooms SET ended_at = $2 WHERE session_id = $1 AND ended_at IS NULL",
        )
        .bind(session_id.as_uuid())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("close breakout rooms"))?
        .rows_affected();

        sqlx::query(
            "UPDATE breakout_room_participants SET left_at = $2 WHERE session_id = $1 AND left_at IS NULL",
        )
        .bind(session_id.as_uuid())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("close breakout participants"))?;

        tx.commit().await.map_err(db_error("commit breakout close"))?;
        Ok(closed as usize)
    }
}

fn row_to_room(row: &PgRow) -> Result<BreakoutRoom, DomainError> {
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let ended_at: Option<DateTime<Utc>> = column(row, "ended_at")?;
    Ok(BreakoutRoom {
        id: BreakoutRoomId::from_uuid(column(row, "id")?),
        session_id: SessionId::from_uuid(column(row, "session_id")?),
        name: column(row, "name")?,
        position: column(row, "position")?,
        created_at: Timestamp::from_datetime(created_at),
        ended_at: ended_at.map(Timestamp::from_datetime),
    })
}

fn row_to_participant(row: &PgRow) -> Result<BreakoutParticipant, DomainError> {
    let joined_at: DateTime<Utc> = column(row, "joined_at")?;
    let left_at: Option<DateTime<Utc>> = column(row, "left_at")?;
    Ok(BreakoutParticipant {
        id: BreakoutParticipantId::from_uuid(column(row, "id")?),
        room_id: BreakoutRoomId::from_uuid(column(row, "room_id")?),
        session_id: SessionId::from_uuid(column(row, "session_id")?),
        user_id: user_column(row, "user_id")?,
        joined_at: Timestamp::from_datetime(joined_at),
        left_at: left_at.map(Timestamp::from_datetime),
    })
}
