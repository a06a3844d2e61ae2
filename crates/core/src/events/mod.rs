//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. The server implements the sink to fan
//! events out to live dashboard sessions and change-feed subscribers.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
