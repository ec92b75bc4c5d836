// Telemetry controller - Single owner of the console view state
use crate::application::ports::{Clock, CommandSender, DisplaySink};
use crate::domain::alert::{Alert, AlertBoard};
use crate::domain::classifier::SensorProfiles;
use crate::domain::command::{CommandError, DeviceCommand};
use crate::domain::connectivity::ConnectivityState;
use crate::domain::history::{BoundedHistoryLog, HistoryEntry};
use crate::domain::reading::{
    CurrentReading, DEFAULT_MODE, HistoricalReading, SensorReading, SensorUpdate, SignalQuality,
};
use crate::domain::series::{SeriesPoint, SlidingSeriesBuffer};
use crate::domain::view::{
    AlertView, ChannelView, ReplayView, StatusView, TelemetryView, ViewUpdate,
};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

const LABEL_FORMAT: &str = "%H:%M:%S";
const CAPTURED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

pub struct TelemetryController {
    series: SlidingSeriesBuffer,
    history: BoundedHistoryLog,
    alerts: AlertBoard,
    connectivity: ConnectivityState,
    profiles: SensorProfiles,
    display_offset: FixedOffset,
    clock: Arc<dyn Clock>,
    display: Arc<dyn DisplaySink>,
    commands: Arc<dyn CommandSender>,
}

impl TelemetryController {
    pub fn new(
        profiles: SensorProfiles,
        display_offset: FixedOffset,
        clock: Arc<dyn Clock>,
        display: Arc<dyn DisplaySink>,
        commands: Arc<dyn CommandSender>,
    ) -> Self {
        Self {
            series: SlidingSeriesBuffer::new(),
            history: BoundedHistoryLog::new(),
            alerts: AlertBoard::new(),
            connectivity: ConnectivityState::new(),
            profiles,
            display_offset,
            clock,
            display,
            commands,
        }
    }

    /// Seed chart and history from the startup replay.
    ///
    /// Rows are replayed oldest first so the history ends most-recent-first.
    pub fn bootstrap(&mut self, mut rows: Vec<HistoricalReading>) {
        if rows.is_empty() {
            tracing::debug!("No history to replay");
            return;
        }

        let offset = self.display_offset;
        rows.sort_by_key(|row| row.timestamp.resolve(offset));
        let count = rows.len();
        for row in rows {
            let reading = SensorReading::from_update(&row.update);
            let label = self.label(row.timestamp.resolve(offset));
            self.append(&reading, label);
        }

        tracing::info!(
            replayed = count,
            history = self.history.len(),
            series = self.series.len(),
            "History replay applied"
        );

        self.display.publish(ViewUpdate::Replay(ReplayView {
            series: self.series.snapshot(),
            history: self.history.entries(),
        }));
    }

    /// Fill the status panel from the server's latest reading.
    ///
    /// Chart and history are left alone; the replay already holds that row.
    pub fn seed_status(&mut self, current: &CurrentReading) {
        let Some(last_update) = current.last_update else {
            tracing::debug!("Device has not reported yet, status stays empty");
            return;
        };

        let reading = SensorReading::from_update(&current.update);
        self.confirm_reported_mode(&reading);
        let status = self.status_view(&reading, last_update.resolve(self.display_offset));
        tracing::info!(captured_at = %status.captured_at, "Status seeded from device");
        self.display.publish(ViewUpdate::Status(status));
    }

    pub fn on_reading(&mut self, update: &SensorUpdate) {
        let captured_at = self.clock.now();
        self.on_reading_at(update, captured_at);
    }

    /// Apply one reading to chart, history, and status, then emit one update.
    pub fn on_reading_at(&mut self, update: &SensorUpdate, captured_at: DateTime<Utc>) {
        let reading = SensorReading::from_update(update);
        let label = self.label(captured_at);
        self.append(&reading, label);
        self.confirm_reported_mode(&reading);

        let status = self.status_view(&reading, captured_at);
        tracing::debug!(
            front = ?reading.front_distance,
            left = ?reading.left_distance,
            right = ?reading.right_distance,
            ir = ?reading.ir_distance,
            ground = status.ground_narrative,
            "Reading applied"
        );

        self.display.publish(ViewUpdate::Telemetry(TelemetryView {
            status,
            series: self.series.snapshot(),
            history: self.history.entries(),
        }));
    }

    pub fn on_alerts(&mut self, alerts: Vec<Alert>) {
        tracing::debug!(count = alerts.len(), "Alert set replaced");
        self.alerts.replace(alerts);

        let received_at = self.label(self.clock.now());
        let views = self
            .alerts
            .current()
            .iter()
            .map(|alert| AlertView::new(alert, &received_at))
            .collect();
        self.display.publish(ViewUpdate::Alerts(views));
    }

    pub fn on_connect(&mut self) {
        tracing::info!("Channel connected");
        self.connectivity.connect();
        self.publish_connectivity();
    }

    pub fn on_disconnect(&mut self) {
        tracing::warn!("Channel disconnected");
        self.connectivity.disconnect();
        self.publish_connectivity();
    }

    /// Ask the device to switch mode. The displayed mode is left alone until
    /// a reading reports the new one.
    pub fn request_mode_change(&self, mode: i64) -> Result<(), CommandError> {
        let command = DeviceCommand::set_mode(mode)?;
        tracing::info!(
            requested = mode,
            current = ?self.connectivity.device_mode(),
            "Requesting mode change"
        );
        self.commands.dispatch(command);
        Ok(())
    }

    pub fn request_threshold_update(
        &self,
        danger: i64,
        warn: i64,
        safe: i64,
    ) -> Result<(), CommandError> {
        let command = DeviceCommand::update_thresholds(danger, warn, safe)?;
        tracing::info!(danger, warn, safe, "Requesting threshold update");
        self.commands.dispatch(command);
        Ok(())
    }

    fn confirm_reported_mode(&mut self, reading: &SensorReading) {
        if let Some(mode) = reading.mode {
            self.connectivity.confirm_mode(mode);
        }
    }

    fn append(&mut self, reading: &SensorReading, label: String) {
        self.series.push(SeriesPoint::new(
            label.clone(),
            reading.front_distance,
            reading.left_distance,
            reading.right_distance,
        ));
        self.history.record(HistoryEntry::new(
            label,
            reading.front_distance,
            reading.left_distance,
            reading.right_distance,
        ));
    }

    fn status_view(&self, reading: &SensorReading, captured_at: DateTime<Utc>) -> StatusView {
        let proximity = &self.profiles.proximity;
        let (ground, ground_narrative) =
            StatusView::ground_from(reading.ir_distance, &self.profiles.ground);

        StatusView {
            front: ChannelView::measure(reading.front_distance, proximity),
            left: ChannelView::measure(reading.left_distance, proximity),
            right: ChannelView::measure(reading.right_distance, proximity),
            ground,
            ground_narrative,
            mode: reading.mode.unwrap_or(DEFAULT_MODE),
            power_on: reading.power_status,
            battery_level: reading.battery_level,
            signal: reading.wifi_strength.map(SignalQuality::from_rssi),
            captured_at: captured_at
                .with_timezone(&self.display_offset)
                .format(CAPTURED_AT_FORMAT)
                .to_string(),
        }
    }

    fn label(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.display_offset)
            .format(LABEL_FORMAT)
            .to_string()
    }

    fn publish_connectivity(&self) {
        self.display
            .publish(ViewUpdate::Connectivity(self.connectivity.link().into()));
    }
}

// Read access for tests in other modules
#[cfg(test)]
impl TelemetryController {
    pub fn series(&self) -> &SlidingSeriesBuffer {
        &self.series
    }

    pub fn history(&self) -> &BoundedHistoryLog {
        &self.history
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.current()
    }

    pub fn connectivity(&self) -> &ConnectivityState {
        &self.connectivity
    }
}
