// In-memory fakes for the application ports
use crate::application::ports::{Clock, CommandSender, DisplaySink, HistorySource};
use crate::domain::command::DeviceCommand;
use crate::domain::reading::{CurrentReading, HistoricalReading};
use crate::domain::view::ViewUpdate;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

/// A fixed instant on 2025-03-01 (UTC).
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, second).unwrap()
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    updates: Mutex<Vec<ViewUpdate>>,
}

impl RecordingDisplay {
    pub fn updates(&self) -> Vec<ViewUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingDisplay {
    fn publish(&self, update: ViewUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

#[derive(Default)]
pub struct RecordingCommands {
    sent: Mutex<Vec<DeviceCommand>>,
}

impl RecordingCommands {
    pub fn sent(&self) -> Vec<DeviceCommand> {
        self.sent.lock().unwrap().clone()
    }
}

impl CommandSender for RecordingCommands {
    fn dispatch(&self, command: DeviceCommand) {
        self.sent.lock().unwrap().push(command);
    }
}

pub enum CannedHistory {
    Rows(Vec<HistoricalReading>),
    /// History plus the server's latest reading
    WithCurrent(Vec<HistoricalReading>, CurrentReading),
    Failure(&'static str),
}

#[async_trait]
impl HistorySource for CannedHistory {
    async fn recent_readings(&self, _hours: u32) -> anyhow::Result<Vec<HistoricalReading>> {
        match self {
            CannedHistory::Rows(rows) | CannedHistory::WithCurrent(rows, _) => Ok(rows.clone()),
            CannedHistory::Failure(reason) => anyhow::bail!("{}", reason),
        }
    }

    async fn current_reading(&self) -> anyhow::Result<CurrentReading> {
        match self {
            CannedHistory::WithCurrent(_, current) => Ok(current.clone()),
            CannedHistory::Rows(_) => anyhow::bail!("no current reading"),
            CannedHistory::Failure(reason) => anyhow::bail!("{}", reason),
        }
    }
}
