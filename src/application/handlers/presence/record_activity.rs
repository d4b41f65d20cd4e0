//! RecordActivityHandler - appends to the presence log.
//!
//! Presence telemetry must never block the classroom, so this handler has
//! no error path: every failure is logged and reported as `Dropped`.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::presence::{ActivityAction, ActivityRecord, NewActivity};
use crate::ports::{ActivityLog, Clock, RegistrationRepository};

#[derive(Debug, Clone)]
pub struct RecordActivityCommand {
    pub session_id: SessionId,
    /// Absent when the caller could not be authenticated.
    pub user_id: Option<UserId>,
    /// Raw action name; unknown names are dropped.
    pub action: String,
    pub action_value: Option<String>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded(ActivityRecord),
    Dropped,
}

pub struct RecordActivityHandler {
    log: Arc<dyn ActivityLog>,
    registrations: Arc<dyn RegistrationRepository>,
    clock: Arc<dyn Clock>,
}

impl RecordActivityHandler {
    pub fn new(
        log: Arc<dyn ActivityLog>,
        registrations: Arc<dyn RegistrationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log,
            registrations,
            clock,
        }
    }

    pub async fn handle(&self, cmd: RecordActivityCommand) -> RecordOutcome {
        let Some(user_id) = cmd.user_id else {
            tracing::debug!(session_id = %cmd.session_id, "activity without user context dropped");
            return RecordOutcome::Dropped;
        };
        let action = match cmd.action.parse::<ActivityAction>() {
            Ok(action) => action,
            Err(err) => {
                tracing::warn!(session_id = %cmd.session_id, error = %err, "activity dropped");
                return RecordOutcome::Dropped;
            }
        };

        let last_join = if action == ActivityAction::Leave {
            match self.log.latest_join(&cmd.session_id, &user_id).await {
                Ok(joined) => joined,
                Err(err) => {
                    tracing::warn!(error = %err, "could not look up join for leave duration");
                    None
                }
            }
        } else {
            None
        };

        let record = ActivityRecord::record(
            NewActivity {
                session_id: cmd.session_id,
                user_id,
                action,
                action_value: cmd.action_value,
                device_info: cmd.device_info,
                ip_address: cmd.ip_address,
            },
            last_join,
            self.clock.now(),
        );

        if let Err(err) = self.log.append(&record).await {
            tracing::warn!(
                session_id = %record.session_id,
                user_id = %record.user_id,
                action = %record.action,
                error = %err,
                "failed to record activity"
            );
            return RecordOutcome::Dropped;
        }

        if action == ActivityAction::Join {
            if let Err(err) = self
                .registrations
                .mark_attended(&record.session_id, &record.user_id)
                .await
            {
                tracing::warn!(error = %err, "failed to mark registration attended");
            }
        }

        RecordOutcome::Recorded(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::support::test_support::Fixture;
    use crate::domain::foundation::{DomainError, ErrorCode, SessionStatus, Timestamp};
    use crate::domain::presence::ParticipantActivity;
    use crate::domain::registration::{Registration, RegistrationStatus};
    use async_trait::async_trait;

    fn handler(f: &Fixture) -> RecordActivityHandler {
        RecordActivityHandler::new(f.store.clone(), f.store.clone(), f.clock.clone())
    }

    fn cmd(session_id: SessionId, user: Option<&str>, action: &str) -> RecordActivityCommand {
        RecordActivityCommand {
            session_id,
            user_id: user.map(|u| UserId::new(u).unwrap()),
            action: action.to_string(),
            action_value: None,
            device_info: None,
            ip_address: None,
        }
    }

    #[tokio::test]
    async fn leave_ninety_seconds_after_join_records_duration() {
        let f = Fixture::new();
        let session = SessionId::new();
        let h = handler(&f);

        h.handle(cmd(session, Some("ana"), "join")).await;
        f.clock.advance_secs(90);
        let outcome = h.handle(cmd(session, Some("ana"), "leave")).await;

        match outcome {
            RecordOutcome::Recorded(record) => assert_eq!(record.duration_seconds, Some(90)),
            RecordOutcome::Dropped => panic!("leave should be recorded"),
        }
    }

    #[tokio::test]
    async fn leave_without_join_is_recorded_without_duration() {
        let f = Fixture::new();
        let outcome = handler(&f)
            .handle(cmd(SessionId::new(), Some("ana"), "leave"))
            .await;

        assert!(matches!(
            outcome,
            RecordOutcome::Recorded(ActivityRecord { duration_seconds: None, .. })
        ));
    }

    #[tokio::test]
    async fn missing_user_and_unknown_action_are_dropped() {
        let f = Fixture::new();
        let h = handler(&f);

        assert_eq!(h.handle(cmd(SessionId::new(), None, "join")).await, RecordOutcome::Dropped);
        assert_eq!(
            h.handle(cmd(SessionId::new(), Some("ana"), "teleport")).await,
            RecordOutcome::Dropped
        );
    }

    #[tokio::test]
    async fn join_promotes_registration_to_attended() {
        let f = Fixture::new();
        let session = f.session("inst-1", SessionStatus::Active).await;
        let ana = UserId::new("ana").unwrap();
        f.store
            .insert_if_absent(&Registration::new(*session.id(), ana.clone(), f.clock.now()))
            .await
            .unwrap();

        handler(&f).handle(cmd(*session.id(), Some("ana"), "join")).await;

        let reg = f.store.find(session.id(), &ana).await.unwrap().unwrap();
        assert_eq!(reg.status, RegistrationStatus::Attended);
    }

    #[tokio::test]
    async fn storage_failure_is_swallowed() {
        struct BrokenLog;

        #[async_trait]
        impl ActivityLog for BrokenLog {
            async fn append(&self, _: &ActivityRecord) -> Result<(), DomainError> {
                Err(DomainError::new(ErrorCode::DatabaseError, "disk full"))
            }
            async fn latest_join(&self, _: &SessionId, _: &UserId) -> Result<Option<Timestamp>, DomainError> {
                Err(DomainError::new(ErrorCode::DatabaseError, "disk full"))
            }
            async fn participant_summaries(&self, _: &SessionId) -> Result<Vec<ParticipantActivity>, DomainError> {
                Ok(vec![])
            }
            async fn list_for_session(&self, _: &SessionId) -> Result<Vec<ActivityRecord>, DomainError> {
                Ok(vec![])
            }
        }

        let f = Fixture::new();
        let h = RecordActivityHandler::new(Arc::new(BrokenLog), f.store.clone(), f.clock.clone());

        let outcome = h.handle(cmd(SessionId::new(), Some("ana"), "leave")).await;

        assert_eq!(outcome, RecordOutcome::Dropped);
    }
}
