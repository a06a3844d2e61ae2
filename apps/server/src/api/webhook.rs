use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use livemap_core::{errors::Error as CoreError, orders::Order, orders::WebhookPayload};
use serde::Serialize;

use crate::{
    error::{error_response, ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
    pub data: Vec<Order>,
}

fn into_api_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Validation(_) => ApiError::Core(err),
        CoreError::Database(_) => ApiError::SaveFailed(err),
        other => ApiError::Internal(other.to_string()),
    }
}

/// Olo order-placed webhook. Saves one order row per accepted call.
#[utoipa::path(
    post,
    path = "/api/olo-webhook",
    responses(
        (status = 200, description = "Order saved"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 405, description = "Only POST is accepted"),
        (status = 500, description = "Order could not be saved"),
    )
)]
pub async fn receive_order(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let payload = WebhookPayload::from_json(&body).map_err(CoreError::from)?;
    let order = state
        .order_service
        .ingest_webhook(payload)
        .await
        .map_err(into_api_error)?;
    Ok(Json(WebhookResponse {
        message: "Order successfully saved",
        data: vec![order],
    }))
}

async fn method_not_allowed(method: Method) -> Response {
    let mut response = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {} Not Allowed", method),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST"));
    response
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/olo-webhook",
        post(receive_order).fallback(method_not_allowed),
    )
}
