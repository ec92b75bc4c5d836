// Alert domain model and the authoritative alert board
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Obstacle,
    Hole,
    Ground,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AlertType {
    pub fn title(&self) -> &'static str {
        match self {
            AlertType::Obstacle => "Obstacle",
            AlertType::Hole => "Hole",
            AlertType::Ground => "Ground",
            AlertType::Unknown => "Alert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Low,
    // Anything the console does not recognize is shown as a warning
    #[default]
    #[serde(other)]
    Medium,
}

impl Severity {
    /// Display tone used by the console.
    pub fn tone(&self) -> &'static str {
        match self {
            Severity::High => "danger",
            Severity::Medium => "warning",
            Severity::Low => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type", default)]
    pub alert_type: AlertType,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub location: String,
}

/// The current alert set. Each update replaces the whole set; nothing is
/// merged or deduplicated.
#[derive(Debug, Clone, Default)]
pub struct AlertBoard {
    current: Vec<Alert>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, alerts: Vec<Alert>) {
        self.current = alerts;
    }

    pub fn current(&self) -> &[Alert] {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(alert_type: AlertType, severity: Severity, message: &str) -> Alert {
        Alert {
            alert_type,
            severity,
            message: message.to_string(),
            location: "front".to_string(),
        }
    }

    #[test]
    fn test_replace_with_empty_clears_board() {
        let mut board = AlertBoard::new();
        board.replace(vec![
            alert(AlertType::Obstacle, Severity::High, "wall"),
            alert(AlertType::Hole, Severity::Low, "dip"),
        ]);
        assert_eq!(board.current().len(), 2);

        board.replace(vec![]);
        assert!(board.current().is_empty());
    }

    #[test]
    fn test_replace_keeps_source_order() {
        let mut board = AlertBoard::new();
        board.replace(vec![alert(AlertType::Ground, Severity::High, "old")]);
        board.replace(vec![
            alert(AlertType::Hole, Severity::Low, "first"),
            alert(AlertType::Obstacle, Severity::High, "second"),
        ]);

        let messages: Vec<&str> = board.current().iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_deserialize_lenient_alerts() {
        let alerts: Vec<Alert> = serde_json::from_str(
            r#"[
                {"type": "obstacle", "severity": "high", "message": "Wall ahead", "location": "front"},
                {"type": "low_battery", "severity": "critical"},
                {"severity": "low", "message": "Uneven"}
            ]"#,
        )
        .unwrap();

        assert_eq!(alerts[0].alert_type, AlertType::Obstacle);
        assert_eq!(alerts[0].severity.tone(), "danger");
        assert_eq!(alerts[1].alert_type, AlertType::Unknown);
        assert_eq!(alerts[1].severity, Severity::Medium);
        assert_eq!(alerts[1].message, "");
        assert_eq!(alerts[2].alert_type.title(), "Alert");
        assert_eq!(alerts[2].severity.tone(), "info");
    }

    #[test]
    fn test_severity_wire_names() {
        for (severity, name) in [
            (Severity::High, "high"),
            (Severity::Medium, "medium"),
            (Severity::Low, "low"),
        ] {
            let json = serde_json::to_value(severity).unwrap();
            assert_eq!(json, name);
            assert_eq!(serde_json::from_value::<Severity>(json).unwrap(), severity);
        }
    }
}
