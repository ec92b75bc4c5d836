// Fire-and-forget command delivery to the device server
use crate::application::ports::CommandSender;
use crate::domain::command::DeviceCommand;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Commands waiting for delivery. Further commands are dropped while full.
const COMMAND_QUEUE_DEPTH: usize = 32;

#[derive(Debug, Serialize)]
struct ModeBody {
    mode: u32,
}

/// Queues commands for a background worker that POSTs them once.
#[derive(Debug, Clone)]
pub struct HttpCommandSender {
    tx: mpsc::Sender<DeviceCommand>,
}

impl HttpCommandSender {
    /// Spawn the delivery worker. Must be called inside a tokio runtime.
    pub fn spawn(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build command HTTP client")?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let (tx, mut rx) = mpsc::channel::<DeviceCommand>(COMMAND_QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                if let Err(e) = deliver(&client, &base_url, command).await {
                    tracing::warn!("Device command {:?} failed: {:#}", command, e);
                }
            }
            tracing::debug!("Command worker stopped");
        });

        Ok(Self { tx })
    }
}

impl CommandSender for HttpCommandSender {
    fn dispatch(&self, command: DeviceCommand) {
        match self.tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(command)) => {
                tracing::warn!("Command queue full, dropping {:?}", command);
            }
            Err(TrySendError::Closed(command)) => {
                tracing::warn!("Command worker is gone, dropping {:?}", command);
            }
        }
    }
}

fn command_path(command: &DeviceCommand) -> &'static str {
    match command {
        DeviceCommand::SetMode { .. } => "/api/device/mode",
        DeviceCommand::UpdateThresholds(_) => "/api/settings",
    }
}

async fn deliver(client: &reqwest::Client, base_url: &str, command: DeviceCommand) -> Result<()> {
    let url = format!("{}{}", base_url, command_path(&command));
    let request = client.post(&url);
    let request = match command {
        DeviceCommand::SetMode { mode } => request.json(&ModeBody { mode }),
        DeviceCommand::UpdateThresholds(settings) => request.json(&settings),
    };

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to send command to {}", url))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Device rejected command with status {}: {}", status, body);
    }

    tracing::debug!("Delivered {:?} to {}", command, url);
    Ok(())
}
