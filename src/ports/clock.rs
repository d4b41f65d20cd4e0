//! Clock port. Every time-dependent rule reads "now" through this trait so
//! tests can pin it.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
