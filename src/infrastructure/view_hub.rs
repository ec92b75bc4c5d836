// View hub - Display sink backing the console API
use crate::application::ports::DisplaySink;
use crate::domain::view::{DashboardView, ViewUpdate};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

const UPDATE_BUFFER: usize = 64;

/// Keeps the latest full view and fans updates out to live subscribers.
#[derive(Debug, Clone)]
pub struct ViewHub {
    snapshot: Arc<watch::Sender<DashboardView>>,
    updates: broadcast::Sender<ViewUpdate>,
}

impl ViewHub {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(DashboardView::default());
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            snapshot: Arc::new(snapshot),
            updates,
        }
    }

    pub fn snapshot(&self) -> DashboardView {
        self.snapshot.borrow().clone()
    }

    /// Current view plus a receiver for everything published after it.
    pub fn subscribe(&self) -> (DashboardView, broadcast::Receiver<ViewUpdate>) {
        let rx = self.updates.subscribe();
        (self.snapshot(), rx)
    }
}

impl Default for ViewHub {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for ViewHub {
    fn publish(&self, update: ViewUpdate) {
        self.snapshot.send_modify(|view| view.apply(&update));
        // No subscribers is fine
        let _ = self.updates.send(update);
    }
}
