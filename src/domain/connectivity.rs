// Channel connectivity and last confirmed device mode
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
}

/// Mirrors whatever the channel signaled last; no retry or debounce states.
///
/// `device_mode` only changes when a reading reports it, never when a mode
/// change is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    link: LinkState,
    device_mode: Option<u32>,
}

impl ConnectivityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self) {
        self.link = LinkState::Connected;
    }

    pub fn disconnect(&mut self) {
        self.link = LinkState::Disconnected;
    }

    pub fn confirm_mode(&mut self, mode: u32) {
        self.device_mode = Some(mode);
    }

    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn device_mode(&self) -> Option<u32> {
        self.device_mode
    }
}
