// History replay fetched from the device server
use crate::application::ports::HistorySource;
use crate::domain::reading::{CurrentReading, HistoricalReading};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The server wraps payloads as `{"success": .., "data": ..}`; a bare payload
/// is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Envelope { data } | Payload::Bare(data) => data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpHistorySource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpHistorySource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build history HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn history_url(&self, hours: u32) -> String {
        format!("{}/api/data/history?hours={}", self.base_url, hours)
    }

    fn current_url(&self) -> String {
        format!("{}/api/data/current", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request to {} failed with status {}: {}", url, status, body);
        }

        let payload = response
            .json::<Payload<T>>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;
        Ok(payload.into_inner())
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    async fn recent_readings(&self, hours: u32) -> Result<Vec<HistoricalReading>> {
        let rows: Vec<HistoricalReading> = self.fetch(&self.history_url(hours)).await?;
        tracing::debug!("Fetched {} history rows", rows.len());
        Ok(rows)
    }

    async fn current_reading(&self) -> Result<CurrentReading> {
        self.fetch(&self.current_url()).await
    }
}
