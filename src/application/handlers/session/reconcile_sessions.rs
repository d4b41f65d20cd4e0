//! ReconcileSessionsHandler - time-driven status transitions.
//!
//! One pass:
//!
//! 1. starts every scheduled session whose start time has arrived
//! 2. completes every active session whose end time has passed
//! 3. force-completes active sessions that have run past the maximum
//!    duration
//!
//! Step 2 re-reads active sessions after step 1, so a session that was due
//! to start and is already past its end is completed in the same pass and
//! a second pass is a no-op. Every write is a compare-and-set on the status
//! read at the start of the step; losing a race to a manual end counts as
//! skipped. A failure on one session is logged and does not stop the pass.

use serde::Serialize;
use std::sync::Arc;

use crate::application::handlers::support::publish_logged;
use crate::domain::foundation::{
    ClassroomError, EventEnvelope, EventId, SerializableDomainEvent, SessionStatus, Timestamp,
};
use crate::domain::session::{CompletionReason, Session, SessionCompleted, SessionStarted};
use crate::ports::{Clock, EventPublisher, SessionRepository};

/// Active sessions older than this are force-completed.
pub const DEFAULT_MAX_ACTIVE_HOURS: i64 = 24;

/// Outcome counts of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub started: usize,
    pub completed: usize,
    pub force_completed: usize,
    /// Transitions lost to a concurrent writer.
    pub skipped: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> usize {
        self.started + self.completed + self.force_completed
    }
}

pub struct ReconcileSessionsHandler {
    sessions: Arc<dyn SessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    max_active_hours: i64,
}

enum Step {
    Applied(EventEnvelope),
    Skipped,
}

impl ReconcileSessionsHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            publisher,
            clock,
            max_active_hours: DEFAULT_MAX_ACTIVE_HOURS,
        }
    }

    pub fn with_max_active_hours(mut self, hours: i64) -> Self {
        self.max_active_hours = hours;
        self
    }

    pub async fn handle(&self) -> Result<ReconcileReport, ClassroomError> {
        let now = self.clock.now();
        let mut report = ReconcileReport::default();

        for session in self.sessions.find_by_status(SessionStatus::Scheduled).await? {
            if !session.is_due_to_start(now) {
                continue;
            }
            let outcome = self.start(session.clone(), now).await;
            self.tally(&mut report, &session, outcome, |r| &mut r.started).await;
        }

        for session in self.sessions.find_by_status(SessionStatus::Active).await? {
            if session.is_past_end(now) {
                let outcome = self
                    .complete(session.clone(), CompletionReason::EndTimeReached, now)
                    .await;
                self.tally(&mut report, &session, outcome, |r| &mut r.completed).await;
            } else if session.has_run_longer_than(self.max_active_hours, now) {
                let outcome = self
                    .complete(session.clone(), CompletionReason::MaxDurationExceeded, now)
                    .await;
                self.tally(&mut report, &session, outcome, |r| &mut r.force_completed)
                    .await;
            }
        }

        if report.changed() > 0 || report.failed > 0 {
            tracing::info!(
                started = report.started,
                completed = report.completed,
                force_completed = report.force_completed,
                skipped = report.skipped,
                failed = report.failed,
                "reconciliation pass finished"
            );
        } else {
            tracing::debug!(skipped = report.skipped, "reconciliation pass found nothing due");
        }
        Ok(report)
    }

    async fn start(&self, mut session: Session, now: Timestamp) -> Result<Step, ClassroomError> {
        session.start(now)?;
        if !self
            .sessions
            .transition(&session, SessionStatus::Scheduled)
            .await?
        {
            return Ok(Step::Skipped);
        }
        let event = SessionStarted {
            event_id: EventId::new(),
            session_id: *session.id(),
            started_at: now,
        };
        Ok(Step::Applied(event.to_envelope().with_source("scheduler")))
    }

    async fn complete(
        &self,
        mut session: Session,
        reason: CompletionReason,
        now: Timestamp,
    ) -> Result<Step, ClassroomError> {
        session.complete(now)?;
        if !self
            .sessions
            .transition(&session, SessionStatus::Active)
            .await?
        {
            return Ok(Step::Skipped);
        }
        let event = SessionCompleted {
            event_id: EventId::new(),
            session_id: *session.id(),
            reason,
            completed_at: now,
        };
        Ok(Step::Applied(event.to_envelope().with_source("scheduler")))
    }

    async fn tally(
        &self,
        report: &mut ReconcileReport,
        session: &Session,
        outcome: Result<Step, ClassroomError>,
        counter: impl FnOnce(&mut ReconcileReport) -> &mut usize,
    ) {
        match outcome {
            Ok(Step::Applied(envelope)) => {
                *counter(report) += 1;
                tracing::info!(
                    session_id = %session.id(),
                    event_type = %envelope.event_type,
                    "session transitioned by reconciliation"
                );
                publish_logged(self.publisher.as_ref(), envelope).await;
            }
            Ok(Step::Skipped) => {
                report.skipped += 1;
                tracing::debug!(session_id = %session.id(), "transition lost to concurrent update");
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(session_id = %session.id(), error = %err, "reconciliation failed for session");
            }
        }
    }
}
