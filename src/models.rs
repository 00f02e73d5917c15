use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Represents a single to-do entry, either one-off or daily.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, time-based identifier. Also used as the device notification key.
    pub id: String,
    /// Display title, never empty.
    pub title: String,
    /// Whether the task lives in the daily collection.
    pub is_daily: bool,
    /// Only meaningful for daily tasks; one-off tasks are removed instead.
    #[serde(default)]
    pub completed: bool,
    /// Timestamp when the task was created (RFC 3339).
    pub created_at: String,
    /// Optional reminder. Only the local hour and minute are used.
    #[serde(default)]
    pub notification_time: Option<DateTime<Utc>>,
}

impl Task {
    /// Reminder time rendered as `H:MM` in the local timezone.
    pub fn reminder_clock(&self) -> Option<String> {
        self.notification_time
            .map(|t| clock_string(&t.with_timezone(&Local)))
    }
}

/// Formats a time the way the reminder matcher compares it: hour unpadded, minute padded.
pub fn clock_string<T: Timelike>(t: &T) -> String {
    format!("{}:{:02}", t.hour(), t.minute())
}

/// Visual category of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Reminder,
}

impl BannerKind {
    pub fn icon(&self) -> &'static str {
        match self {
            BannerKind::Success => "✅",
            BannerKind::Warning => "⚠️",
            BannerKind::Reminder => "🔔",
            BannerKind::Info => "ℹ️",
        }
    }
}

/// A short-lived in-app message.
#[derive(Debug, Clone)]
pub struct Banner {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: BannerKind,
    /// Wall-clock creation time (RFC 3339), shown in the overlay.
    pub timestamp: String,
    /// Monotonic deadline after which the banner is dropped.
    pub expires_at: Instant,
}
