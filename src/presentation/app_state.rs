// Application state for HTTP handlers
use crate::application::event_loop::EventSender;
use crate::infrastructure::view_hub::ViewHub;

#[derive(Clone)]
pub struct AppState {
    pub events: EventSender,
    pub views: ViewHub,
}
