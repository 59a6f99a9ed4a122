//! Transient, auto-dismissing user notifications

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Default visibility of workflow and auth messages
pub const WORKFLOW_TTL: Duration = Duration::from_secs(5);
/// Default visibility of generic alerts
pub const ALERT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// How long the message stays visible
    pub ttl: Duration,
}

impl Notification {
    pub fn error(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            ttl,
        }
    }

    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            ttl,
        }
    }
}

/// Sink for every user-visible error and confirmation
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps posted notifications until their TTL elapses
#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Mutex<Vec<(Instant, Notification)>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications still visible now, oldest first
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|(posted, n)| now.duration_since(*posted) < n.ttl);
        entries.iter().map(|(_, n)| n.clone()).collect()
    }

    /// Most recent visible message, if any
    pub fn latest(&self) -> Option<Notification> {
        self.active().pop()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "Notification"),
            NotificationLevel::Error => warn!(message = %notification.message, "Notification"),
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|(posted, n)| now.duration_since(*posted) < n.ttl);
        entries.push((now, notification));
    }
}
