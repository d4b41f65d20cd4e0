//! Error types for the domain layer.
//!
//! - `ValidationError` - value object construction failures
//! - `DomainError` - coded errors crossing port boundaries
//! - `ClassroomError` - the user-visible failure kinds returned by handlers

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    SessionNotFound,
    CourseNotFound,
    RegistrationNotFound,
    BreakoutRoomNotFound,
    PollNotFound,
    PollOptionNotFound,

    // State errors
    InvalidStateTransition,
    CapacityExceeded,
    DuplicateResponse,
    Conflict,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::CourseNotFound => "COURSE_NOT_FOUND",
            ErrorCode::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            ErrorCode::BreakoutRoomNotFound => "BREAKOUT_ROOM_NOT_FOUND",
            ErrorCode::PollNotFound => "POLL_NOT_FOUND",
            ErrorCode::PollOptionNotFound => "POLL_OPTION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::CapacityExceeded => "CAPACITY_EXCEEDED",
            ErrorCode::DuplicateResponse => "DUPLICATE_RESPONSE",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a database error from any displayable driver failure.
    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::validation(err.field().to_string(), err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// ClassroomError
// ════════════════════════════════════════════════════════════════════════════════

/// Failure kinds surfaced to callers of the classroom handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassroomError {
    /// Malformed input (bad dates, missing scheduling fields, empty poll options).
    ValidationFailed { field: String, message: String },
    /// Wrong role, non-owner action, or wrong session password.
    PermissionDenied(String),
    /// Illegal state change for the current status.
    InvalidTransition(String),
    /// Missing session, room, poll, option, course or registration.
    NotFound { resource: &'static str, id: String },
    /// Registration beyond the session's participant limit.
    CapacityExceeded { max: u32 },
    /// Repeat answer to a poll.
    DuplicateResponse,
    /// Storage or other collaborator failure.
    Infrastructure(String),
}

impl ClassroomError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClassroomError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        ClassroomError::PermissionDenied(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        ClassroomError::InvalidTransition(message.into())
    }

    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        ClassroomError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ClassroomError::Infrastructure(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ClassroomError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ClassroomError::PermissionDenied(_) => "PERMISSION_DENIED",
            ClassroomError::InvalidTransition(_) => "INVALID_TRANSITION",
            ClassroomError::NotFound { .. } => "NOT_FOUND",
            ClassroomError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            ClassroomError::DuplicateResponse => "DUPLICATE_RESPONSE",
            ClassroomError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ClassroomError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ClassroomError::PermissionDenied(msg) => msg.clone(),
            ClassroomError::InvalidTransition(msg) => msg.clone(),
            ClassroomError::NotFound { resource, id } => format!("{} not found: {}", resource, id),
            ClassroomError::CapacityExceeded { max } => {
                format!("Session has reached its limit of {} participants", max)
            }
            ClassroomError::DuplicateResponse => {
                "You have already responded to this poll".to_string()
            }
            ClassroomError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl fmt::Display for ClassroomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for ClassroomError {}

impl From<ValidationError> for ClassroomError {
    fn from(err: ValidationError) -> Self {
        ClassroomError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for ClassroomError {
    fn from(err: DomainError) -> Self {
        let id = || err.details.get("id").cloned().unwrap_or_default();
        match err.code {
            ErrorCode::ValidationFailed => ClassroomError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::SessionNotFound => ClassroomError::not_found("Session", id()),
            ErrorCode::CourseNotFound => ClassroomError::not_found("Course", id()),
            ErrorCode::RegistrationNotFound => ClassroomError::not_found("Registration", id()),
            ErrorCode::BreakoutRoomNotFound => ClassroomError::not_found("Breakout room", id()),
            ErrorCode::PollNotFound => ClassroomError::not_found("Poll", id()),
            ErrorCode::PollOptionNotFound => ClassroomError::not_found("Poll option", id()),
            ErrorCode::InvalidStateTransition | ErrorCode::Conflict => {
                ClassroomError::InvalidTransition(err.message)
            }
            ErrorCode::CapacityExceeded => ClassroomError::CapacityExceeded {
                max: err
                    .details
                    .get("max")
                    .and_then(|m| m.parse().ok())
                    .unwrap_or_default(),
            },
            ErrorCode::DuplicateResponse => ClassroomError::DuplicateResponse,
            ErrorCode::Unauthorized | ErrorCode::Forbidden => {
                ClassroomError::PermissionDenied(err.message)
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                ClassroomError::Infrastructure(err.message)
            }
        }
    }
}
