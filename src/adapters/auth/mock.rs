//! Mock authentication adapter for testing.
//!
//! Maps fixed bearer tokens to users so HTTP tests need no signing keys.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_user("inst-token", "inst-1", Role::Instructor);
//! let user = validator.validate("inst-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::SessionValidator;

/// Token-to-user map. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation while set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a token for a user with a generated email and display name.
    pub fn with_test_user(
        self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        role: Role,
    ) -> Self {
        let user_id = user_id.into();
        match UserId::new(&user_id) {
            Ok(id) => {
                let user = AuthenticatedUser::new(
                    id,
                    format!("{}@test.example.com", user_id),
                    Some(format!("Test User {}", user_id)),
                    role,
                );
                self.with_user(token, user)
            }
            Err(_) => self,
        }
    }

    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_returns_user_with_role() {
        let validator = MockSessionValidator::new().with_test_user("t1", "inst-1", Role::Instructor);

        let user = validator.validate("t1").await.unwrap();

        assert_eq!(user.id.as_str(), "inst-1");
        assert_eq!(user.role, Role::Instructor);
    }

    #[tokio::test]
    async fn unknown_or_removed_token_is_invalid() {
        let validator = MockSessionValidator::new().with_test_user("t1", "ana", Role::Student);
        assert!(matches!(validator.validate("nope").await, Err(AuthError::InvalidToken)));

        validator.remove_token("t1");
        assert!(matches!(validator.validate("t1").await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_test_user("t1", "ana", Role::Student)
            .with_error(AuthError::service_unavailable("down"));

        assert!(matches!(
            validator.validate("t1").await,
            Err(AuthError::ServiceUnavailable(_))
        ));
    }
}
