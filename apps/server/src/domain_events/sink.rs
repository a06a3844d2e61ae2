//! Web domain event sink implementation.

use livemap_core::events::{DomainEvent, DomainEventSink};

use crate::events::EventBus;

/// Domain event sink for the web server runtime.
///
/// Publishing never blocks the ingest request: the broadcast send returns
/// immediately and slow subscribers are lagged rather than awaited.
pub struct WebDomainEventSink {
    event_bus: EventBus,
}

impl WebDomainEventSink {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        tracing::debug!("Publishing {}", event.name());
        self.event_bus.publish(event);
    }
}
