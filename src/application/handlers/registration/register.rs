//! RegisterHandler - claims a seat in a session.

use std::sync::Arc;

use crate::application::handlers::support::load_session;
use crate::domain::foundation::{ClassroomError, CommandMetadata, SessionId};
use crate::domain::registration::Registration;
use crate::ports::{Clock, PasswordHasher, RegistrationRepository, SessionRepository};

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub session_id: SessionId,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub registration: Registration,
    /// True when the user already held a registration.
    pub already_registered: bool,
}

pub struct RegisterHandler {
    sessions: Arc<dyn SessionRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl RegisterHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            registrations,
            hasher,
            clock,
        }
    }

    /// Checks run in order: session status, password, existing
    /// registration, capacity. The capacity count and the insert are not
    /// atomic, so a burst of registrations can overbook slightly.
    pub async fn handle(
        &self,
        cmd: RegisterCommand,
        metadata: CommandMetadata,
    ) -> Result<RegisterResult, ClassroomError> {
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;

        if !session.status().accepts_registrations() {
            return Err(ClassroomError::invalid_transition(format!(
                "Cannot register for a session that is {}",
                session.status()
            )));
        }

        if let Some(hash) = session.password_hash() {
            let supplied = cmd
                .password
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ClassroomError::permission_denied("A password is required for this session"))?;
            if !self.hasher.verify(supplied, hash)? {
                return Err(ClassroomError::permission_denied("Invalid session password"));
            }
        }

        if let Some(existing) = self
            .registrations
            .find(&cmd.session_id, &metadata.user_id)
            .await?
        {
            return Ok(RegisterResult {
                registration: existing,
                already_registered: true,
            });
        }

        if let Some(max) = session.capacity() {
            if self.registrations.count_seated(&cmd.session_id).await? >= max {
                return Err(ClassroomError::CapacityExceeded { max });
            }
        }

        let candidate = Registration::new(cmd.session_id, metadata.user_id.clone(), self.clock.now());
        let registration = self.registrations.insert_if_absent(&candidate).await?;
        let already_registered = registration.id != candidate.id;
        if !already_registered {
            tracing::debug!(
                session_id = %cmd.session_id,
                user_id = %metadata.user_id,
                "user registered"
            );
        }

        Ok(RegisterResult {
            registration,
            already_registered,
        })
    }
}
