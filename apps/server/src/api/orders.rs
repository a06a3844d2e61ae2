use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_core::stream::Stream;
use livemap_core::{events::DomainEvent, orders::Order};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, description = "Order"), (status = 404, description = "No such order"))
)]
pub async fn get_order(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Order>> {
    let order = state.order_lookup.get_order(id).await?;
    Ok(Json(order))
}

/// Change feed: one `orders:insert` event per stored order.
async fn stream_orders(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(evt) => {
            let name = evt.name();
            let DomainEvent::OrderInserted { order } = evt;
            match SseEvent::default().event(name).json_data(order) {
                Ok(ev) => Some(Ok(ev)),
                Err(err) => {
                    tracing::error!("Failed to serialize SSE payload for {}: {}", name, err);
                    None
                }
            }
        }
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            tracing::warn!("Order feed subscriber missed {} events", missed);
            None
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/stream", get(stream_orders))
        .route("/orders/{id}", get(get_order))
}
