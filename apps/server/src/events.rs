use livemap_core::events::DomainEvent;
use tokio::sync::broadcast;

/// Lightweight broadcast bus that fans out order events to the change feed
/// and to every open dashboard session.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is not an error; lagging ones find out on their next recv.
        let _ = self.sender.send(event);
    }
}
