use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_core::stream::Stream;
use livemap_core::dashboard::{ChannelMarkerLayer, DashboardSession, DashboardUpdate};
use serde::Serialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::Instrument;
use uuid::Uuid;

use crate::{config::MapView, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardConfig {
    #[serde(flatten)]
    map: MapView,
    cleanup_interval_secs: u64,
    resync_on_lag: bool,
    time_zone: String,
}

async fn get_dashboard_config(State(state): State<Arc<AppState>>) -> Json<DashboardConfig> {
    Json(DashboardConfig {
        map: state.map.clone(),
        cleanup_interval_secs: state.dashboard.cleanup_interval.as_secs(),
        resync_on_lag: state.dashboard.resync_on_lag,
        time_zone: state.dashboard.time_zone.to_string(),
    })
}

fn to_sse(update: DashboardUpdate) -> Option<Result<SseEvent, Infallible>> {
    let name = update.event_name();
    match SseEvent::default().event(name).json_data(&update) {
        Ok(ev) => Some(Ok(ev)),
        Err(err) => {
            tracing::error!("Failed to serialize SSE payload for {}: {}", name, err);
            None
        }
    }
}

/// Opens a dashboard session for one page. The session task owns the page's
/// markers and ends when the page disconnects.
async fn stream_dashboard(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (layer, updates) = ChannelMarkerLayer::channel();
    let viewer_gone = layer.closed();
    // Subscribe before spawning so no insert between here and the first poll is lost.
    let feed = state.event_bus.subscribe();
    let session = DashboardSession::new(
        layer,
        state.order_lookup.clone(),
        state.clock.clone(),
        state.dashboard.clone(),
    );

    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("dashboard_session", %session_id);
    tokio::spawn(
        async move {
            let session = session.run(feed, viewer_gone).await;
            tracing::info!(
                "Dashboard session ended with {} markers",
                session.active_count()
            );
        }
        .instrument(span),
    );

    let stream = tokio_stream::StreamExt::filter_map(UnboundedReceiverStream::new(updates), to_sse);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard/config", get(get_dashboard_config))
        .route("/dashboard/stream", get(stream_dashboard))
}
