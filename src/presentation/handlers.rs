// HTTP request handlers
use crate::application::event_loop::{EventLoopClosed, InboundEvent};
use crate::domain::alert::Alert;
use crate::domain::command::CommandError;
use crate::domain::reading::SensorUpdate;
use crate::domain::view::{DashboardView, ViewUpdate};
use crate::infrastructure::chunked_json::stream_frames;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

#[derive(Deserialize)]
pub struct ModeRequest {
    pub mode: i64,
}

#[derive(Deserialize)]
pub struct SettingsRequest {
    #[serde(default = "default_danger")]
    pub danger_distance: i64,
    #[serde(default = "default_warn")]
    pub warn_distance: i64,
    #[serde(default = "default_safe")]
    pub safe_distance: i64,
}

fn default_danger() -> i64 {
    25
}

fn default_warn() -> i64 {
    50
}

fn default_safe() -> i64 {
    80
}

/// One frame of the live view stream
#[derive(Serialize)]
#[serde(tag = "frame", content = "data", rename_all = "snake_case")]
pub enum StreamFrame {
    Snapshot(DashboardView),
    Update(ViewUpdate),
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current console view
pub async fn get_view(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.views.snapshot();
    match json_response(&view, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Live view stream: a snapshot followed by every update
pub async fn stream_view(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let (snapshot, rx) = state.views.subscribe();

    let stream = async_stream::stream! {
        yield StreamFrame::Snapshot(snapshot);

        let mut updates = BroadcastStream::new(rx);
        while let Some(item) = updates.next().await {
            match item {
                Ok(update) => {
                    yield StreamFrame::Update(update);
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!("View stream subscriber lagged, skipped {} updates", skipped);
                }
            }
        }
    };

    stream_frames(stream, compress).await
}

pub async fn ingest_sensor_update(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SensorUpdate>,
) -> StatusCode {
    enqueue(&state, InboundEvent::SensorUpdate(update)).await
}

pub async fn ingest_alerts(
    State(state): State<Arc<AppState>>,
    Json(alerts): Json<Vec<Alert>>,
) -> StatusCode {
    enqueue(&state, InboundEvent::Alerts(alerts)).await
}

pub async fn ingest_connect(State(state): State<Arc<AppState>>) -> StatusCode {
    enqueue(&state, InboundEvent::Connect).await
}

pub async fn ingest_disconnect(State(state): State<Arc<AppState>>) -> StatusCode {
    enqueue(&state, InboundEvent::Disconnect).await
}

/// Ask the device to switch mode
pub async fn set_device_mode(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Response {
    command_response(state.events.request_mode_change(request.mode).await)
}

/// Push new distance thresholds to the device
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettingsRequest>,
) -> Response {
    let result = state
        .events
        .request_threshold_update(
            request.danger_distance,
            request.warn_distance,
            request.safe_distance,
        )
        .await;
    command_response(result)
}

async fn enqueue(state: &AppState, event: InboundEvent) -> StatusCode {
    match state.events.send(event).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            tracing::error!("Dropping inbound event: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn command_response(result: Result<Result<(), CommandError>, EventLoopClosed>) -> Response {
    match result {
        Ok(Ok(())) => (StatusCode::ACCEPTED, Json(json!({ "success": true }))).into_response(),
        Ok(Err(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}
