//! ReconciliationWorker - periodic session status reconciliation.
//!
//! Runs `ReconcileSessionsHandler` on a fixed interval so sessions start and
//! complete without anyone touching them. The first pass runs immediately
//! on startup.
//!
//! ## Graceful Shutdown
//!
//! The worker listens on a `watch` channel and returns once it reads
//! `true`. A pass already in flight finishes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::application::{ReconcileReport, ReconcileSessionsHandler};
use crate::domain::foundation::ClassroomError;

/// Default pass interval: 15 minutes.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub struct ReconciliationWorker {
    handler: Arc<ReconcileSessionsHandler>,
    interval: Duration,
}

impl ReconciliationWorker {
    pub fn new(handler: Arc<ReconcileSessionsHandler>) -> Self {
        Self {
            handler,
            interval: DEFAULT_RECONCILE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until the shutdown signal flips to `true` or its sender drops.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "reconciliation worker started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    // Errors are already logged inside run_once.
                    let _ = self.run_once().await;
                }
            }
        }

        tracing::info!("reconciliation worker stopped");
    }

    /// One reconciliation pass. The handler logs the tally; only failures are logged here.
    pub async fn run_once(&self) -> Result<ReconcileReport, ClassroomError> {
        self.handler.handle().await.map_err(|err| {
            tracing::warn!(error = %err, "reconciliation pass failed");
            err
        })
    }
}
