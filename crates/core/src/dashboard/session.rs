//! One viewer's live map: reacts to order inserts and periodically drops
//! markers whose orders are no longer active.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::clock::Clock;
use super::marker::{Marker, MarkerLayer};
use super::registry::MarkerRegistry;
use crate::constants::DEFAULT_CLEANUP_INTERVAL_SECS;
use crate::errors::Result;
use crate::events::DomainEvent;
use crate::orders::{OloTimestamp, Order, OrderLookup, PlatformTimeZone};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub cleanup_interval: Duration,
    /// Reconcile against every active stored order after the feed reports
    /// missed events. Off by default: missed inserts stay missing.
    pub resync_on_lag: bool,
    pub time_zone: PlatformTimeZone,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            resync_on_lag: false,
            time_zone: PlatformTimeZone::Local,
        }
    }
}

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub removed: usize,
    pub skipped: usize,
}

pub struct DashboardSession<L: MarkerLayer> {
    registry: MarkerRegistry,
    layer: L,
    lookup: Arc<dyn OrderLookup>,
    clock: Arc<dyn Clock>,
    settings: DashboardSettings,
}

impl<L: MarkerLayer> DashboardSession<L> {
    pub fn new(
        layer: L,
        lookup: Arc<dyn OrderLookup>,
        clock: Arc<dyn Clock>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            registry: MarkerRegistry::new(),
            layer,
            lookup,
            clock,
            settings,
        }
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    // Evaluated against a fresh clock reading every time.
    fn is_active(&self, order: &Order) -> bool {
        match order.is_active(self.clock.now(), &self.settings.time_zone) {
            Ok(active) => active,
            Err(e) => {
                warn!(
                    "Order {} has unreadable ready time {:?}: {}",
                    order.id, order.time_ready, e
                );
                false
            }
        }
    }

    fn publish_count(&mut self) {
        let count = self.registry.len();
        self.layer.set_active_count(count);
    }

    fn untrack(&mut self, order_id: i64) -> bool {
        if self.registry.remove(order_id).is_none() {
            return false;
        }
        self.layer.remove_marker(order_id);
        self.publish_count();
        true
    }

    /// Draws a marker for a newly inserted order if it is still active.
    /// Returns true when a marker was added.
    pub fn on_order_inserted(&mut self, order: &Order) -> bool {
        if self.registry.contains(order.id) {
            debug!("Order {} already has a marker", order.id);
            return false;
        }
        if !self.is_active(order) {
            debug!("Order {} is past its ready time; no marker", order.id);
            return false;
        }

        let marker = Marker::for_order(order);
        self.layer.add_marker(&marker);
        self.registry.insert(marker);
        self.publish_count();
        true
    }

    pub fn handle_event(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::OrderInserted { order } => {
                self.on_order_inserted(order);
            }
        }
    }

    /// Re-reads every order tracked at sweep start and removes the ones that
    /// are no longer active. A failed read leaves the marker for the next
    /// sweep.
    pub async fn sweep(&mut self) -> SweepReport {
        let fetches = self.registry.ids().into_iter().map(|order_id| {
            let lookup = Arc::clone(&self.lookup);
            async move { (order_id, lookup.get_order(order_id).await) }
        });
        let results = join_all(fetches).await;

        let mut report = SweepReport {
            checked: results.len(),
            ..SweepReport::default()
        };
        for (order_id, result) in results {
            match result {
                Ok(order) => {
                    if !self.is_active(&order) && self.untrack(order_id) {
                        report.removed += 1;
                    }
                }
                Err(e) => {
                    debug!("Skipping order {} this sweep: {}", order_id, e);
                    report.skipped += 1;
                }
            }
        }
        report
    }

    /// Adds markers for active stored orders this session has not seen.
    pub async fn resync(&mut self) -> Result<usize> {
        let not_before = OloTimestamp::from_instant(self.clock.now(), &self.settings.time_zone);
        let candidates = self.lookup.list_active_candidates(not_before).await?;
        Ok(candidates
            .iter()
            .filter(|order| self.on_order_inserted(order))
            .count())
    }

    /// Drives the session until `shutdown` resolves or the feed closes, then
    /// hands the session back.
    pub async fn run<S>(mut self, mut feed: broadcast::Receiver<DomainEvent>, shutdown: S) -> Self
    where
        S: Future<Output = ()>,
    {
        let period = self.settings.cleanup_interval.max(Duration::from_millis(1));
        let mut cleanup = interval_at(Instant::now() + period, period);
        cleanup.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        self.publish_count();
        info!("Dashboard session started, cleanup every {:?}", period);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Dashboard session closed by viewer");
                    break;
                }
                received = feed.recv() => match received {
                    Ok(event) => self.handle_event(&event),
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Dashboard session missed {} order events", missed);
                        if self.settings.resync_on_lag {
                            match self.resync().await {
                                Ok(added) => info!("Resync after lag added {} markers", added),
                                Err(e) => warn!("Resync after lag failed: {}", e),
                            }
                        }
                    }
                    Err(RecvError::Closed) => {
                        info!("Order feed closed; ending dashboard session");
                        break;
                    }
                },
                _ = cleanup.tick() => {
                    let report = self.sweep().await;
                    debug!(
                        "Sweep checked {} markers, removed {}, skipped {}",
                        report.checked, report.removed, report.skipped
                    );
                }
            }
        }
        self
    }
}
