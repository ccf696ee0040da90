//! Notifier that renders toasts as tracing events.

use opsdesk_application::{Notification, NotificationLevel, Notifier};
use tracing::{info, warn};

/// Development notifier that logs toasts to the console.
#[derive(Clone)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!(toast = "success", "{}", notification.message);
            }
            NotificationLevel::Error => {
                warn!(toast = "error", "{}", notification.message);
            }
        }
    }
}
