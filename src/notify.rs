//! Device-level collaborators: notification scheduling and haptic feedback.
//!
//! Both are fire-and-forget from the task store's point of view. Failures
//! are logged by the caller and never block a mutation.

use std::io::Write;
use chrono::{DateTime, Local, Timelike, Utc};
use crate::error::Result;
use crate::models::Task;

/// When a scheduled notification fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Once(DateTime<Utc>),
    Daily { hour: u32, minute: u32 },
}

/// A request to register a device notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    /// Reuses the task id so the notification can be cancelled later.
    pub id: String,
    pub title: String,
    pub body: String,
    pub trigger: Trigger,
}

impl ScheduleRequest {
    /// Builds the request for a task with a reminder time, if it has one.
    pub fn for_task(task: &Task) -> Option<ScheduleRequest> {
        let at = task.notification_time?;
        let trigger = if task.is_daily {
            let local = at.with_timezone(&Local);
            Trigger::Daily { hour: local.hour(), minute: local.minute() }
        } else {
            Trigger::Once(at)
        };
        let title = if task.is_daily { "Daily reminder" } else { "Reminder" };
        Some(ScheduleRequest {
            id: task.id.clone(),
            title: title.to_string(),
            body: task.title.clone(),
            trigger,
        })
    }
}

pub trait DeviceScheduler {
    fn schedule(&mut self, request: &ScheduleRequest) -> Result<()>;
    fn cancel(&mut self, id: &str) -> Result<()>;
}

/// Scheduler that only records requests in the log.
///
/// Reminders are delivered in-app by the reminder matcher instead.
#[derive(Debug, Default)]
pub struct LogScheduler;

impl DeviceScheduler for LogScheduler {
    fn schedule(&mut self, request: &ScheduleRequest) -> Result<()> {
        tracing::info!("notification scheduled: {} ({:?})", request.body, request.trigger);
        Ok(())
    }

    fn cancel(&mut self, id: &str) -> Result<()> {
        tracing::info!("notification cancelled: {}", id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

/// Haptic pulse kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticEffect {
    Impact(ImpactStyle),
    Success,
    Warning,
    Error,
}

pub trait Haptics {
    fn pulse(&mut self, effect: HapticEffect);
}

/// Rings the terminal bell for warnings (reminders). Everything else is silent.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn pulse(&mut self, effect: HapticEffect) {
        if effect == HapticEffect::Warning {
            let mut out = std::io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }
}

#[derive(Debug, Default)]
pub struct SilentHaptics;

impl Haptics for SilentHaptics {
    fn pulse(&mut self, _effect: HapticEffect) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(daily: bool) -> Task {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 7, 30, 0).unwrap();
        Task {
            id: "42".into(),
            title: "stretch".into(),
            is_daily: daily,
            completed: false,
            created_at: String::new(),
            notification_time: Some(at.with_timezone(&Utc)),
        }
    }

    #[test]
    fn daily_tasks_get_repeating_trigger() {
        let req = ScheduleRequest::for_task(&task(true)).unwrap();
        assert_eq!(req.id, "42");
        assert_eq!(req.trigger, Trigger::Daily { hour: 7, minute: 30 });
    }

    #[test]
    fn one_off_tasks_get_single_trigger() {
        let t = task(false);
        let req = ScheduleRequest::for_task(&t).unwrap();
        assert_eq!(req.trigger, Trigger::Once(t.notification_time.unwrap()));
        assert_eq!(req.body, "stretch");
    }

    #[test]
    fn no_reminder_no_request() {
        let mut t = task(false);
        t.notification_time = None;
        assert!(ScheduleRequest::for_task(&t).is_none());
    }
}
