//! Event publisher adapters.
//!
//! - `InMemoryEventBus` - captures envelopes for assertions
//! - `TracingEventPublisher` - logs each envelope; production default

mod in_memory;
mod tracing_publisher;

pub use in_memory::InMemoryEventBus;
pub use tracing_publisher::TracingEventPublisher;
