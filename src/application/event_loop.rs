// Event loop - Serializes every inbound event through one controller
use crate::application::ports::HistorySource;
use crate::application::telemetry_controller::TelemetryController;
use crate::domain::alert::Alert;
use crate::domain::command::CommandError;
use crate::domain::reading::SensorUpdate;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

const EVENT_QUEUE_DEPTH: usize = 256;

pub type CommandReply = oneshot::Sender<Result<(), CommandError>>;

#[derive(Debug)]
pub enum InboundEvent {
    SensorUpdate(SensorUpdate),
    Alerts(Vec<Alert>),
    Connect,
    Disconnect,
    ModeChange {
        mode: i64,
        reply: CommandReply,
    },
    ThresholdUpdate {
        danger: i64,
        warn: i64,
        safe: i64,
        reply: CommandReply,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("telemetry event loop is not running")]
pub struct EventLoopClosed;

/// Cloneable handle used by the HTTP layer to feed the loop.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<InboundEvent>,
}

impl EventSender {
    pub async fn send(&self, event: InboundEvent) -> Result<(), EventLoopClosed> {
        self.tx.send(event).await.map_err(|_| EventLoopClosed)
    }

    pub async fn request_mode_change(
        &self,
        mode: i64,
    ) -> Result<Result<(), CommandError>, EventLoopClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(InboundEvent::ModeChange { mode, reply }).await?;
        rx.await.map_err(|_| EventLoopClosed)
    }

    pub async fn request_threshold_update(
        &self,
        danger: i64,
        warn: i64,
        safe: i64,
    ) -> Result<Result<(), CommandError>, EventLoopClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(InboundEvent::ThresholdUpdate {
            danger,
            warn,
            safe,
            reply,
        })
        .await?;
        rx.await.map_err(|_| EventLoopClosed)
    }
}

pub fn event_channel() -> (EventSender, mpsc::Receiver<InboundEvent>) {
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    (EventSender { tx }, rx)
}

pub struct TelemetryEventLoop {
    controller: TelemetryController,
    history_source: Arc<dyn HistorySource>,
    history_hours: u32,
}

impl TelemetryEventLoop {
    pub fn new(
        controller: TelemetryController,
        history_source: Arc<dyn HistorySource>,
        history_hours: u32,
    ) -> Self {
        Self {
            controller,
            history_source,
            history_hours,
        }
    }

    /// Replay history and seed the status panel, then handle events until
    /// every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::Receiver<InboundEvent>) -> TelemetryController {
        // Events that arrive meanwhile stay queued until the replay is applied
        match self.history_source.recent_readings(self.history_hours).await {
            Ok(rows) => self.controller.bootstrap(rows),
            Err(e) => tracing::warn!("History bootstrap failed, starting empty: {:#}", e),
        }
        match self.history_source.current_reading().await {
            Ok(current) => self.controller.seed_status(&current),
            Err(e) => tracing::warn!("Could not fetch current reading: {:#}", e),
        }

        while let Some(event) = rx.recv().await {
            self.handle(event);
        }

        tracing::info!("Event channel closed, stopping telemetry loop");
        self.controller
    }

    fn handle(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::SensorUpdate(update) => self.controller.on_reading(&update),
            InboundEvent::Alerts(alerts) => self.controller.on_alerts(alerts),
            InboundEvent::Connect => self.controller.on_connect(),
            InboundEvent::Disconnect => self.controller.on_disconnect(),
            InboundEvent::ModeChange { mode, reply } => {
                let result = self.controller.request_mode_change(mode);
                if let Err(e) = &result {
                    tracing::warn!("Rejected mode change: {}", e);
                }
                let _ = reply.send(result);
            }
            InboundEvent::ThresholdUpdate {
                danger,
                warn,
                safe,
                reply,
            } => {
                let result = self.controller.request_threshold_update(danger, warn, safe);
                if let Err(e) = &result {
                    tracing::warn!("Rejected threshold update: {}", e);
                }
                let _ = reply.send(result);
            }
        }
    }
}
