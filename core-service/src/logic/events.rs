//! Notification Events
//!
//! User-visible messages raised by the refresh cycle. The controller only sees
//! the [`NotificationSink`] trait; the binary wires it to a channel and a
//! toast/terminal renderer, tests wire it to a recorder.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Event names
pub mod events {
    pub const HIGH_RISK_DETECTED: &str = "transactions:high-risk";
    pub const REFRESH_FAILED: &str = "transactions:refresh-failed";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    HighRiskDetected,
    RefreshFailed,
}

impl NotificationKind {
    pub fn event_name(&self) -> &'static str {
        match self {
            NotificationKind::HighRiskDetected => events::HIGH_RISK_DETECTED,
            NotificationKind::RefreshFailed => events::REFRESH_FAILED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    /// Number of records the notification is about (0 when not applicable)
    pub count: usize,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn high_risk(count: usize) -> Self {
        let noun = if count == 1 { "transaction" } else { "transactions" };
        Self::new(
            NotificationKind::HighRiskDetected,
            NotificationLevel::Warning,
            "New high-risk activity",
            format!("{} new high-risk {} detected", count, noun),
            count,
        )
    }

    pub fn refresh_failed(reason: &str) -> Self {
        Self::new(
            NotificationKind::RefreshFailed,
            NotificationLevel::Error,
            "Backend unavailable",
            format!("Could not load transactions ({}). Showing offline sample data.", reason),
            0,
        )
    }

    fn new(kind: NotificationKind, level: NotificationLevel, title: &str, message: String, count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            level,
            title: title.to_string(),
            message,
            count,
            created_at: Utc::now(),
        }
    }
}

/// Destination for user-visible notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to a receiver owned by the presentation layer
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        let event = notification.kind.event_name();
        if self.tx.send(notification).is_err() {
            // Silent fail - receiver gone means nobody is displaying anything
            log::warn!("Notification receiver dropped, event '{}' lost", event);
        }
    }
}

/// Writes notifications to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => log::error!("[{}] {}", notification.kind.event_name(), notification.message),
            NotificationLevel::Warning => log::warn!("[{}] {}", notification.kind.event_name(), notification.message),
            NotificationLevel::Info => log::info!("[{}] {}", notification.kind.event_name(), notification.message),
        }
    }
}
