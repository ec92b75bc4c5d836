// Display-ready view models emitted to the console
use super::alert::{Alert, AlertType, Severity};
use super::classifier::{Category, SensorProfile, classify, ground_narrative};
use super::connectivity::LinkState;
use super::history::HistoryEntry;
use super::reading::{SignalQuality, format_distance};
use super::series::SeriesPoint;
use serde::Serialize;

/// Status of one distance channel. `category` is absent for the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelView {
    pub text: String,
    pub category: Option<Category>,
    pub percentage: f64,
}

impl ChannelView {
    pub fn measure(value: Option<f64>, profile: &SensorProfile) -> Self {
        let classification = value.map(|v| classify(v, profile));
        Self {
            text: format_distance(value),
            category: classification.map(|c| c.category),
            percentage: classification.map(|c| c.percentage).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub front: ChannelView,
    pub left: ChannelView,
    pub right: ChannelView,
    pub ground: ChannelView,
    pub ground_narrative: &'static str,
    pub mode: u32,
    pub power_on: bool,
    pub battery_level: Option<u8>,
    pub signal: Option<SignalQuality>,
    pub captured_at: String,
}

impl StatusView {
    pub fn ground_from(value: Option<f64>, profile: &SensorProfile) -> (ChannelView, &'static str) {
        let classification = value.map(|v| classify(v, profile));
        (
            ChannelView::measure(value, profile),
            ground_narrative(classification.as_ref()),
        )
    }
}

/// Everything one reading changes: status panel, chart, history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryView {
    pub status: StatusView,
    pub series: Vec<SeriesPoint>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: &'static str,
    pub tone: &'static str,
    pub message: String,
    pub location: String,
    /// When the console received the alert set
    pub received_at: String,
}

impl AlertView {
    pub fn new(alert: &Alert, received_at: &str) -> Self {
        Self {
            alert_type: alert.alert_type,
            severity: alert.severity,
            title: alert.alert_type.title(),
            tone: alert.severity.tone(),
            message: alert.message.clone(),
            location: alert.location.clone(),
            received_at: received_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectivityView {
    pub state: LinkState,
    pub label: &'static str,
}

impl From<LinkState> for ConnectivityView {
    fn from(state: LinkState) -> Self {
        let label = match state {
            LinkState::Connected => "Connected",
            LinkState::Disconnected => "Disconnected",
        };
        Self { state, label }
    }
}

/// Chart and table contents restored from the startup replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayView {
    pub series: Vec<SeriesPoint>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum ViewUpdate {
    Replay(ReplayView),
    /// Status panel seeded from the server's latest reading at startup
    Status(StatusView),
    Telemetry(TelemetryView),
    Alerts(Vec<AlertView>),
    Connectivity(ConnectivityView),
}

/// Full console state, rebuilt from updates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub status: Option<StatusView>,
    pub series: Vec<SeriesPoint>,
    pub history: Vec<HistoryEntry>,
    pub alerts: Vec<AlertView>,
    pub connectivity: ConnectivityView,
}

impl DashboardView {
    pub fn apply(&mut self, update: &ViewUpdate) {
        match update {
            ViewUpdate::Replay(view) => {
                self.series = view.series.clone();
                self.history = view.history.clone();
            }
            ViewUpdate::Status(status) => self.status = Some(status.clone()),
            ViewUpdate::Telemetry(view) => {
                self.status = Some(view.status.clone());
                self.series = view.series.clone();
                self.history = view.history.clone();
            }
            ViewUpdate::Alerts(alerts) => self.alerts = alerts.clone(),
            ViewUpdate::Connectivity(view) => self.connectivity = *view,
        }
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            status: None,
            series: Vec::new(),
            history: Vec::new(),
            alerts: Vec::new(),
            connectivity: LinkState::default().into(),
        }
    }
}
