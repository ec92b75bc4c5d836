// Ports to the collaborators around the telemetry pipeline
use crate::domain::command::DeviceCommand;
use crate::domain::reading::{CurrentReading, HistoricalReading};
use crate::domain::view::ViewUpdate;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the one-time startup replay.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Readings from the last `hours`, in whatever order the server returns them
    async fn recent_readings(&self, hours: u32) -> anyhow::Result<Vec<HistoricalReading>>;

    async fn current_reading(&self) -> anyhow::Result<CurrentReading>;
}

/// Fire-and-forget channel to the device. Implementations must not block.
pub trait CommandSender: Send + Sync {
    fn dispatch(&self, command: DeviceCommand);
}

/// Consumer of view model updates (the console renderer).
pub trait DisplaySink: Send + Sync {
    fn publish(&self, update: ViewUpdate);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
