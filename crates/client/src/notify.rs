//! Transient user notifications
//!
//! The view layer subscribes and shows each notice for its `ttl`.

use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// How long the view should keep the notice up
    pub ttl: Duration,
}

/// Fan-out of notices to every subscribed view
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx, ttl }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NoticeLevel::Error, message.into());
    }

    fn publish(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Success => info!(notice = %message, "Notify success"),
            NoticeLevel::Error => warn!(notice = %message, "Notify error"),
        }
        // No subscriber is fine; the notice was logged
        let _ = self.tx.send(Notice {
            level,
            message,
            ttl: self.ttl,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notifier = Notifier::new(Duration::from_millis(3000));
        let mut rx = notifier.subscribe();

        notifier.success("ACCESS GRANTED");
        notifier.error("bad credentials");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.level, NoticeLevel::Success);
        assert_eq!(first.message, "ACCESS GRANTED");
        assert_eq!(first.ttl, Duration::from_millis(3000));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.level, NoticeLevel::Error);
        assert_eq!(second.message, "bad credentials");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = Notifier::new(Duration::from_secs(1));
        notifier.error("nobody listening");
    }
}
