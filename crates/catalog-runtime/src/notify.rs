//! # Notification Channel
//!
//! User-facing transient messages ("toasts") travel over a process-wide
//! channel instead of a global UI target. Components that need to report
//! something receive a cloneable [`Notifier`]; the presentation layer owns the
//! single [`NotificationFeed`] and decides how to show each message. Messages
//! are transient, so nothing needs to be torn down when a sender goes away.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// How long a notification stays visible by default.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(2500);

/// Visual flavour of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A single transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub ttl: Duration,
}

/// Sending half; cheap to clone and safe to use after the feed is gone.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
    ttl: Duration,
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.emit(Level::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Level::Error, message.into());
    }

    fn emit(&self, level: Level, message: String) {
        debug!(?level, %message, "Notification");
        // A closed feed means nobody is looking; transient messages may be lost.
        let _ = self.sender.send(Notification {
            level,
            message,
            ttl: self.ttl,
        });
    }
}

/// Receiving half, owned by whatever renders notifications.
#[derive(Debug)]
pub struct NotificationFeed {
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationFeed {
    /// Waits for the next notification; `None` once every notifier is dropped.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }

    /// Takes everything queued so far without waiting.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(notification) = self.receiver.try_recv() {
            out.push(notification);
        }
        out
    }
}

/// Creates a connected notifier/feed pair.
pub fn notification_channel(ttl: Duration) -> (Notifier, NotificationFeed) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Notifier { sender, ttl }, NotificationFeed { receiver })
}
