//! # Notifications
//!
//! Transient toast queue. Controllers push success and failure messages; the
//! UI reads [`NotificationCenter::active`] and expired toasts are dropped by
//! [`NotificationCenter::prune`] on every tick.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

/// Toast queue with per-level lifetimes.
#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    success_ttl: Duration,
    error_ttl: Duration,
}

impl NotificationCenter {
    pub fn new(success_ttl: Duration, error_ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            success_ttl,
            error_ttl,
        }
    }

    /// Show a success notification
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message.into(), self.success_ttl);
    }

    /// Show an error notification
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message.into(), self.error_ttl);
    }

    fn push(&mut self, level: NotificationLevel, message: String, ttl: Duration) {
        tracing::debug!(?level, message = %message, "Notification");
        self.items.push(Notification {
            level,
            message,
            expires_at: Instant::now() + ttl,
        });
    }

    /// Drop every toast whose lifetime ended at or before `now`.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| n.expires_at > now);
    }

    /// Toasts currently on screen, oldest first.
    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}
