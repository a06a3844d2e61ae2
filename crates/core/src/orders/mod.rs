//! Orders module - domain models, webhook validation, services, and traits.

mod olo_timestamp;
mod orders_model;
mod orders_service;
mod orders_traits;
mod orders_webhook;

pub use olo_timestamp::{OloTimestamp, OloTimestampError, PlatformTimeZone};
pub use orders_model::{NewOrder, Order};
pub use orders_service::OrderService;
pub use orders_traits::{OrderLookup, OrderRepositoryTrait, OrderServiceTrait};
pub use orders_webhook::WebhookPayload;
