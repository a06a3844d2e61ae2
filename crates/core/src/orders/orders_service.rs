use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::orders_model::Order;
use super::orders_traits::{OrderRepositoryTrait, OrderServiceTrait};
use super::orders_webhook::WebhookPayload;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};

/// Service that turns webhook payloads into stored orders.
pub struct OrderService {
    repository: Arc<dyn OrderRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl OrderService {
    pub fn new(
        repository: Arc<dyn OrderRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }
}

#[async_trait]
impl OrderServiceTrait for OrderService {
    /// Validates the payload, writes one row, then announces the insert.
    /// A rejected payload never reaches the repository.
    async fn ingest_webhook(&self, payload: WebhookPayload) -> Result<Order> {
        let new_order = payload.into_new_order()?;
        debug!(
            "Ingesting order for store {} ready at {}",
            new_order.store_number, new_order.time_ready
        );

        let order = self.repository.insert_order(new_order).await?;
        info!("Saved order {} for store {}", order.id, order.store_number);

        self.event_sink.emit(DomainEvent::order_inserted(order.clone()));
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DatabaseError, Error, ValidationError};
    use crate::events::MockDomainEventSink;
    use crate::orders::NewOrder;
    use serde_json::json;
    use std::sync::Mutex;

    // ============== Mock Repository ==============

    #[derive(Default)]
    struct MockOrderRepository {
        rows: Mutex<Vec<Order>>,
        fail_inserts: bool,
    }

    #[async_trait]
    impl OrderRepositoryTrait for MockOrderRepository {
        async fn insert_order(&self, new_order: NewOrder) -> Result<Order> {
            if self.fail_inserts {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "disk I/O error".to_string(),
                )));
            }
            let mut rows = self.rows.lock().unwrap();
            let order = Order {
                id: rows.len() as i64 + 1,
                store_number: new_order.store_number,
                store_name: new_order.store_name,
                latitude: new_order.latitude,
                longitude: new_order.longitude,
                time_placed: new_order.time_placed,
                time_ready: new_order.time_ready,
            };
            rows.push(order.clone());
            Ok(order)
        }
    }

    fn payload(value: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    fn valid_payload() -> WebhookPayload {
        payload(json!({
            "storeNumber": "1042",
            "latitude": 40.7128,
            "longitude": -74.006,
            "timePlaced": "20240315 14:05",
            "timeReady": "20240315 14:30"
        }))
    }

    #[tokio::test]
    async fn ingest_stores_and_announces_order() {
        let repository = Arc::new(MockOrderRepository::default());
        let sink = MockDomainEventSink::new();
        let service = OrderService::new(repository.clone(), Arc::new(sink.clone()));

        let order = service.ingest_webhook(valid_payload()).await.unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(repository.rows.lock().unwrap().as_slice(), [order.clone()]);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEvent::OrderInserted { order: announced } => assert_eq!(announced, &order),
        }
    }

    #[tokio::test]
    async fn invalid_payload_writes_nothing() {
        let repository = Arc::new(MockOrderRepository::default());
        let sink = MockDomainEventSink::new();
        let service = OrderService::new(repository.clone(), Arc::new(sink.clone()));

        let err = service
            .ingest_webhook(payload(json!({ "storeNumber": "1042" })))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingFields(_))
        ));
        assert!(repository.rows.lock().unwrap().is_empty());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_not_announced() {
        let repository = Arc::new(MockOrderRepository {
            fail_inserts: true,
            ..Default::default()
        });
        let sink = MockDomainEventSink::new();
        let service = OrderService::new(repository, Arc::new(sink.clone()));

        let err = service.ingest_webhook(valid_payload()).await.unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert!(sink.is_empty());
    }
}
