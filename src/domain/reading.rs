// Sensor reading domain models
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Largest distance the device can physically report, in centimeters.
pub const MAX_PLAUSIBLE_DISTANCE: f64 = 1000.0;

/// Mode shown when the device does not report one.
pub const DEFAULT_MODE: u32 = 1;

/// `sensor_update` payload as pushed by the channel.
///
/// Every field is optional on the wire; a missing distance is the same as the
/// `0` sentinel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorUpdate {
    #[serde(default)]
    pub front_distance: Option<f64>,
    #[serde(default)]
    pub left_distance: Option<f64>,
    #[serde(default)]
    pub right_distance: Option<f64>,
    #[serde(default)]
    pub ir_distance: Option<f64>,
    #[serde(default)]
    pub mode: Option<i64>,
    #[serde(default)]
    pub power_status: Option<bool>,
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub wifi_strength: Option<i32>,
}

/// Timestamp as stored by the device server.
///
/// The server writes its own wall-clock time without an offset. Those values
/// are taken to be in the console's display offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTimestamp {
    Absolute(DateTime<Utc>),
    Local(NaiveDateTime),
}

impl ServerTimestamp {
    pub fn resolve(&self, offset: FixedOffset) -> DateTime<Utc> {
        match self {
            ServerTimestamp::Absolute(time) => *time,
            ServerTimestamp::Local(naive) => offset
                .from_local_datetime(naive)
                .single()
                .map(|time| time.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc()),
        }
    }
}

impl From<DateTime<Utc>> for ServerTimestamp {
    fn from(time: DateTime<Utc>) -> Self {
        ServerTimestamp::Absolute(time)
    }
}

impl<'de> Deserialize<'de> for ServerTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(time) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ServerTimestamp::Absolute(time.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(ServerTimestamp::Local)
            .map_err(serde::de::Error::custom)
    }
}

/// A row of the startup history replay.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalReading {
    pub timestamp: ServerTimestamp,
    #[serde(flatten)]
    pub update: SensorUpdate,
}

/// The server's latest reading. `last_update` is empty until the device has
/// reported at least once.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentReading {
    #[serde(default)]
    pub last_update: Option<ServerTimestamp>,
    #[serde(flatten)]
    pub update: SensorUpdate,
}

/// A sanitized telemetry sample. `None` distances are unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub front_distance: Option<f64>,
    pub left_distance: Option<f64>,
    pub right_distance: Option<f64>,
    pub ir_distance: Option<f64>,
    /// Mode the device reported, if any
    pub mode: Option<u32>,
    pub power_status: bool,
    pub battery_level: Option<u8>,
    pub wifi_strength: Option<i32>,
}

impl SensorReading {
    pub fn from_update(update: &SensorUpdate) -> Self {
        Self {
            front_distance: sanitize_distance("front_distance", update.front_distance),
            left_distance: sanitize_distance("left_distance", update.left_distance),
            right_distance: sanitize_distance("right_distance", update.right_distance),
            ir_distance: sanitize_distance("ir_distance", update.ir_distance),
            mode: update
                .mode
                .filter(|mode| *mode > 0)
                .and_then(|mode| u32::try_from(mode).ok()),
            power_status: update.power_status.unwrap_or(false),
            battery_level: update
                .battery_level
                .filter(|level| level.is_finite())
                .map(|level| level.clamp(0.0, 100.0).round() as u8),
            wifi_strength: update.wifi_strength,
        }
    }
}

/// Map a raw distance to a usable measurement.
///
/// The `0` sentinel, missing values, and physically implausible values all
/// become `None` so they never reach the classifier.
pub fn sanitize_distance(field: &str, raw: Option<f64>) -> Option<f64> {
    let value = raw?;
    if value == 0.0 {
        return None;
    }
    if !value.is_finite() || value < 0.0 || value > MAX_PLAUSIBLE_DISTANCE {
        tracing::warn!(field, value, "Discarding implausible distance reading");
        return None;
    }
    Some(value)
}

/// Render a distance for display, `---` for the sentinel.
pub fn format_distance(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "---".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    Strong,
    Fair,
    Weak,
}

impl SignalQuality {
    pub fn from_rssi(rssi: i32) -> Self {
        if rssi >= -50 {
            SignalQuality::Strong
        } else if rssi >= -70 {
            SignalQuality::Fair
        } else {
            SignalQuality::Weak
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_and_implausible_values_are_unavailable() {
        assert_eq!(sanitize_distance("front", Some(0.0)), None);
        assert_eq!(sanitize_distance("front", None), None);
        assert_eq!(sanitize_distance("front", Some(-3.0)), None);
        assert_eq!(sanitize_distance("front", Some(f64::NAN)), None);
        assert_eq!(sanitize_distance("front", Some(1200.0)), None);
        assert_eq!(sanitize_distance("front", Some(0.4)), Some(0.4));
        assert_eq!(sanitize_distance("front", Some(1000.0)), Some(1000.0));
    }

    #[test]
    fn test_from_update_defaults() {
        let update: SensorUpdate = serde_json::from_str(r#"{"front_distance": 42.5}"#).unwrap();
        let reading = SensorReading::from_update(&update);

        assert_eq!(reading.front_distance, Some(42.5));
        assert_eq!(reading.left_distance, None);
        assert_eq!(reading.ir_distance, None);
        assert_eq!(reading.mode, None);
        assert!(!reading.power_status);
        assert_eq!(reading.battery_level, None);
    }

    #[test]
    fn test_from_update_full_payload() {
        let update: SensorUpdate = serde_json::from_str(
            r#"{"front_distance": 120, "left_distance": 0, "right_distance": 35.2,
                "ir_distance": 30, "mode": 3, "power_status": true,
                "battery_level": 87.6, "wifi_strength": -62}"#,
        )
        .unwrap();
        let reading = SensorReading::from_update(&update);

        assert_eq!(reading.front_distance, Some(120.0));
        assert_eq!(reading.left_distance, None);
        assert_eq!(reading.mode, Some(3));
        assert!(reading.power_status);
        assert_eq!(reading.battery_level, Some(88));
        assert_eq!(reading.wifi_strength, Some(-62));
    }

    #[test]
    fn test_zero_or_out_of_range_mode_is_not_reported() {
        for mode in [0, -2, i64::from(u32::MAX) + 1] {
            let update = SensorUpdate {
                mode: Some(mode),
                ..Default::default()
            };
            assert_eq!(SensorReading::from_update(&update).mode, None);
        }
    }

    #[test]
    fn test_historical_reading_parses_timestamp() {
        let row: HistoricalReading = serde_json::from_str(
            r#"{"timestamp": "2025-03-01T08:15:30Z", "front_distance": 80, "mode": 2}"#,
        )
        .unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let plus_seven = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(
            row.timestamp.resolve(plus_seven).to_rfc3339(),
            "2025-03-01T08:15:30+00:00"
        );
        assert_eq!(row.timestamp.resolve(utc), row.timestamp.resolve(plus_seven));
        assert_eq!(row.update.front_distance, Some(80.0));
    }

    #[test]
    fn test_naive_timestamp_is_server_wall_clock() {
        let row: HistoricalReading =
            serde_json::from_str(r#"{"timestamp": "2025-03-01T15:15:30.250000"}"#).unwrap();
        assert!(matches!(row.timestamp, ServerTimestamp::Local(_)));

        let plus_seven = FixedOffset::east_opt(7 * 3600).unwrap();
        let resolved = row.timestamp.resolve(plus_seven);
        assert_eq!(resolved.to_rfc3339(), "2025-03-01T08:15:30.250+00:00");
        assert_eq!(
            resolved.with_timezone(&plus_seven).format("%H:%M:%S").to_string(),
            "15:15:30"
        );

        let bad = serde_json::from_str::<HistoricalReading>(r#"{"timestamp": "yesterday"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_current_reading_before_first_report() {
        let current: CurrentReading = serde_json::from_str(
            r#"{"front_distance": 0, "mode": 1, "battery_level": 100,
                "wifi_connected": false, "last_update": null, "alerts": []}"#,
        )
        .unwrap();
        assert_eq!(current.last_update, None);
        assert_eq!(current.update.mode, Some(1));
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Some(12.345)), "12.3");
        assert_eq!(format_distance(None), "---");
    }

    #[test]
    fn test_signal_quality() {
        assert_eq!(SignalQuality::from_rssi(-40), SignalQuality::Strong);
        assert_eq!(SignalQuality::from_rssi(-50), SignalQuality::Strong);
        assert_eq!(SignalQuality::from_rssi(-70), SignalQuality::Fair);
        assert_eq!(SignalQuality::from_rssi(-85), SignalQuality::Weak);
    }
}
