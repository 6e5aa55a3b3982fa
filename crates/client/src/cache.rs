//! Last known session, shared with subscribers.

use tokio::sync::watch;

use appsession_core::SessionView;

/// A single observable slot holding the last session-check result.
///
/// `None` means no check has completed since startup or logout. Writes are
/// last-wins and every write is published to subscribers.
#[derive(Debug)]
pub struct SessionCache {
    slot: watch::Sender<Option<SessionView>>,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: watch::Sender::new(None),
        }
    }

    /// Current cached value. Never touches the network.
    #[must_use]
    pub fn get(&self) -> Option<SessionView> {
        self.slot.borrow().clone()
    }

    /// Replace the cached view and notify subscribers.
    pub fn set(&self, view: SessionView) {
        self.slot.send_replace(Some(view));
    }

    /// Forget the cached view and notify subscribers.
    pub fn clear(&self) {
        self.slot.send_replace(None);
    }

    /// Receiver that observes every subsequent write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionView>> {
        self.slot.subscribe()
    }
}
