//! EventPublisher port - publishing session lifecycle events.
//!
//! The domain emits `EventEnvelope`s without knowing the transport.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Delivery is at-least-once. Lifecycle state is already persisted when
/// events are published, so callers treat a publish failure as a logged
/// warning rather than rolling back.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
