//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink and republishes them on the
//! server's EventBus, where the order change feed and dashboard sessions
//! pick them up.

mod sink;

pub use sink::WebDomainEventSink;
