// Outbound device commands and their validation
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("mode must be a positive integer, got {0}")]
    InvalidMode(i64),
    #[error("thresholds must satisfy 0 <= danger < warn < safe, got {danger}/{warn}/{safe}")]
    InvalidThresholds { danger: i64, warn: i64, safe: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdSettings {
    pub danger_distance: u32,
    pub warn_distance: u32,
    pub safe_distance: u32,
}

/// A request for the device. Sent once, never acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    SetMode { mode: u32 },
    UpdateThresholds(ThresholdSettings),
}

impl DeviceCommand {
    pub fn set_mode(mode: i64) -> Result<Self, CommandError> {
        match u32::try_from(mode) {
            Ok(mode) if mode > 0 => Ok(DeviceCommand::SetMode { mode }),
            _ => Err(CommandError::InvalidMode(mode)),
        }
    }

    pub fn update_thresholds(danger: i64, warn: i64, safe: i64) -> Result<Self, CommandError> {
        let invalid = CommandError::InvalidThresholds { danger, warn, safe };
        if !(0 <= danger && danger < warn && warn < safe) {
            return Err(invalid);
        }
        match (u32::try_from(danger), u32::try_from(warn), u32::try_from(safe)) {
            (Ok(danger_distance), Ok(warn_distance), Ok(safe_distance)) => {
                Ok(DeviceCommand::UpdateThresholds(ThresholdSettings {
                    danger_distance,
                    warn_distance,
                    safe_distance,
                }))
            }
            _ => Err(invalid),
        }
    }
}
