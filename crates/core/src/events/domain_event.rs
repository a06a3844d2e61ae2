//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::constants::ORDERS_INSERT_EVENT;
use crate::orders::Order;

/// Domain events emitted by core services after successful mutations.
///
/// Orders are never updated or deleted, so an insert is the only change
/// the storage layer can report.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new order row was written.
    OrderInserted { order: Order },
}

impl DomainEvent {
    /// Creates an OrderInserted event.
    pub fn order_inserted(order: Order) -> Self {
        Self::OrderInserted { order }
    }

    /// Wire name used on the change feed.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::OrderInserted { .. } => ORDERS_INSERT_EVENT,
        }
    }
}
