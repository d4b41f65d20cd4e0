//! Column decoding helpers shared by the PostgreSQL adapters.

use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Reads a column, reporting the column name on failure.
pub(super) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}

pub(super) fn user_column(row: &PgRow, name: &str) -> Result<UserId, DomainError> {
    let raw: String = column(row, name)?;
    UserId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", name, e))
    })
}

/// Parses a stored enum column through its `FromStr` form.
pub(super) fn parsed_column<T>(row: &PgRow, name: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = column(row, name)?;
    raw.parse().map_err(|e: T::Err| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", name, e))
    })
}

pub(super) fn db_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", context, e))
}
