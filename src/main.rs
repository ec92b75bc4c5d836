// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::event_loop::{TelemetryEventLoop, event_channel};
use crate::application::ports::SystemClock;
use crate::application::telemetry_controller::TelemetryController;
use crate::infrastructure::config::load_console_config;
use crate::infrastructure::http_command_sender::HttpCommandSender;
use crate::infrastructure::http_history_source::HttpHistorySource;
use crate::infrastructure::view_hub::ViewHub;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_view, health_check, ingest_alerts, ingest_connect, ingest_disconnect,
    ingest_sensor_update, save_settings, set_device_mode, stream_view,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_console_config()?;

    // Initialize tracing, RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    let timeout = Duration::from_secs(config.device.request_timeout_secs);
    let display_offset = config.display.offset()?;

    // Device adapters (infrastructure layer)
    let history_source = Arc::new(HttpHistorySource::new(
        config.device.base_url.clone(),
        timeout,
    )?);
    let commands = Arc::new(HttpCommandSender::spawn(
        config.device.base_url.clone(),
        timeout,
    )?);
    let views = ViewHub::new();

    // Controller and its single-owner event loop (application layer)
    let controller = TelemetryController::new(
        config.profiles,
        display_offset,
        Arc::new(SystemClock),
        Arc::new(views.clone()),
        commands,
    );
    let (events, rx) = event_channel();
    let event_loop =
        TelemetryEventLoop::new(controller, history_source, config.device.history_hours);
    tokio::spawn(event_loop.run(rx));

    let state = Arc::new(AppState { events, views });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/view", get(get_view))
        .route("/api/view/stream", get(stream_view))
        .route("/api/events/sensor_update", post(ingest_sensor_update))
        .route("/api/events/alerts", post(ingest_alerts))
        .route("/api/events/connect", post(ingest_connect))
        .route("/api/events/disconnect", post(ingest_disconnect))
        .route("/api/device/mode", post(set_device_mode))
        .route("/api/settings", post(save_settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;
    tracing::info!(
        device = %config.device.base_url,
        "Starting cane-console on {}",
        addr
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
