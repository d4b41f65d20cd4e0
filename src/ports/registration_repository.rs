//! Registration repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::registration::Registration;

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn find(&self, session_id: &SessionId, user_id: &UserId) -> Result<Option<Registration>, DomainError>;

    /// Inserts the registration unless one already exists for the same
    /// (session, user), and returns whichever row is stored.
    async fn insert_if_absent(&self, registration: &Registration) -> Result<Registration, DomainError>;

    /// Number of registrations that hold a seat (registered or attended).
    async fn count_seated(&self, session_id: &SessionId) -> Result<u32, DomainError>;

    /// All registrations for a session, oldest first.
    async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<Registration>, DomainError>;

    /// Moves a `registered` row to `attended`. Returns `false` if there was
    /// no such row.
    async fn mark_attended(&self, session_id: &SessionId, user_id: &UserId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn RegistrationRepository) {}
    }
}
