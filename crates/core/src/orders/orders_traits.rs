use crate::errors::Result;
use crate::orders::orders_model::{NewOrder, Order};
use crate::orders::orders_webhook::WebhookPayload;
use crate::orders::OloTimestamp;
use async_trait::async_trait;

/// Trait for order repository operations (write side, server only)
#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    async fn insert_order(&self, new_order: NewOrder) -> Result<Order>;
}

/// Read-only view of stored orders handed to dashboard sessions.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn get_order(&self, order_id: i64) -> Result<Order>;

    /// Orders whose ready time is at or after `not_before`. A superset of the
    /// active orders; callers still apply [`Order::is_active`].
    async fn list_active_candidates(&self, not_before: OloTimestamp) -> Result<Vec<Order>>;
}

/// Trait for order service operations
#[async_trait]
pub trait OrderServiceTrait: Send + Sync {
    async fn ingest_webhook(&self, payload: WebhookPayload) -> Result<Order>;
}
