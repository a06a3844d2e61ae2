//! Visual markers and the layer they are drawn on.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::constants::{DASHBOARD_STATS_EVENT, MARKER_ADD_EVENT, MARKER_REMOVE_EVENT};
use crate::orders::Order;

/// Popup text shown when a marker is clicked.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPopup {
    pub store_name: String,
    pub time_placed: String,
    pub time_ready: String,
}

/// A map pin for one active order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub order_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub popup: MarkerPopup,
}

impl Marker {
    pub fn for_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            latitude: order.latitude,
            longitude: order.longitude,
            popup: MarkerPopup {
                store_name: order.display_name(),
                time_placed: order.time_placed.clone(),
                time_ready: order.time_ready.clone(),
            },
        }
    }
}

/// Rendering seam between a dashboard session and whatever draws the map.
pub trait MarkerLayer: Send {
    fn add_marker(&mut self, marker: &Marker);
    fn remove_marker(&mut self, order_id: i64);
    fn set_active_count(&mut self, count: usize);
}

/// One change to a page's map, as sent to the browser.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DashboardUpdate {
    #[serde(rename_all = "camelCase")]
    MarkerAdded { marker: Marker },
    #[serde(rename_all = "camelCase")]
    MarkerRemoved { order_id: i64 },
    #[serde(rename_all = "camelCase")]
    ActiveCount { count: usize },
}

impl DashboardUpdate {
    pub fn event_name(&self) -> &'static str {
        match self {
            DashboardUpdate::MarkerAdded { .. } => MARKER_ADD_EVENT,
            DashboardUpdate::MarkerRemoved { .. } => MARKER_REMOVE_EVENT,
            DashboardUpdate::ActiveCount { .. } => DASHBOARD_STATS_EVENT,
        }
    }
}

/// Layer that forwards every change as a [`DashboardUpdate`] message.
///
/// Sends to a departed receiver are dropped; the session notices the closed
/// channel through its shutdown future.
#[derive(Clone, Debug)]
pub struct ChannelMarkerLayer {
    tx: mpsc::UnboundedSender<DashboardUpdate>,
}

impl ChannelMarkerLayer {
    pub fn new(tx: mpsc::UnboundedSender<DashboardUpdate>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DashboardUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Resolves once the receiving side is gone.
    pub fn closed(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let tx = self.tx.clone();
        async move { tx.closed().await }
    }

    fn send(&self, update: DashboardUpdate) {
        let _ = self.tx.send(update);
    }
}

impl MarkerLayer for ChannelMarkerLayer {
    fn add_marker(&mut self, marker: &Marker) {
        self.send(DashboardUpdate::MarkerAdded {
            marker: marker.clone(),
        });
    }

    fn remove_marker(&mut self, order_id: i64) {
        self.send(DashboardUpdate::MarkerRemoved { order_id });
    }

    fn set_active_count(&mut self, count: usize) {
        self.send(DashboardUpdate::ActiveCount { count });
    }
}
