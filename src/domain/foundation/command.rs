//! Command infrastructure for handlers.
//!
//! Every command handler takes a `CommandMetadata` alongside its command:
//! who is acting, with which platform role, and the correlation id that is
//! stamped onto any emitted events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthenticatedUser, Role, UserId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command.
    pub user_id: UserId,

    /// Platform role of the acting user.
    pub role: Role,

    /// Links related operations across a single user request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "scheduler").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            correlation_id: None,
            source: None,
        }
    }

    /// Builds metadata for a request made by an authenticated user.
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        Self::new(user.id.clone(), user.role)
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Metadata for an instructor with the given id.
    pub fn instructor(id: &str) -> Self {
        Self::new(UserId::new(id).unwrap(), Role::Instructor).with_source("test")
    }

    /// Metadata for a student with the given id.
    pub fn student(id: &str) -> Self {
        Self::new(UserId::new(id).unwrap(), Role::Student).with_source("test")
    }

    pub fn admin(id: &str) -> Self {
        Self::new(UserId::new(id).unwrap(), Role::Admin).with_source("test")
    }
}
