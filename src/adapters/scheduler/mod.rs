//! Background jobs.

mod reconciliation_worker;

pub use reconciliation_worker::{ReconciliationWorker, DEFAULT_RECONCILE_INTERVAL};
