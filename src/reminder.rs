use std::collections::HashMap;
use std::time::{Duration, Instant};
use chrono::{DateTime, Local, NaiveDate, Timelike};
use crate::models::{clock_string, Task};

/// A reminder that matched the current clock minute.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
    pub task_id: String,
    pub title: String,
    pub is_daily: bool,
}

type Minute = (NaiveDate, u32, u32);

/// Compares task reminder times against the wall clock.
///
/// Each task fires at most once per clock minute, however often
/// [`check`](ReminderMatcher::check) runs within that minute.
#[derive(Debug, Default)]
pub struct ReminderMatcher {
    last_fired: HashMap<String, Minute>,
}

impl ReminderMatcher {
    pub fn new() -> ReminderMatcher {
        ReminderMatcher::default()
    }

    /// Returns the reminders due at `now`, daily tasks first.
    ///
    /// Completed daily tasks are skipped.
    pub fn check(&mut self, now: DateTime<Local>, daily: &[Task], tasks: &[Task]) -> Vec<ReminderEvent> {
        let minute: Minute = (now.date_naive(), now.hour(), now.minute());
        let current = clock_string(&now);
        // Markers from earlier minutes can no longer suppress anything.
        self.last_fired.retain(|_, m| *m == minute);

        let mut events = Vec::new();
        let candidates = daily
            .iter()
            .filter(|t| !t.completed)
            .chain(tasks.iter());
        for task in candidates {
            let Some(at) = task.reminder_clock() else { continue };
            if at != current {
                continue;
            }
            if self.last_fired.get(&task.id) == Some(&minute) {
                tracing::debug!("reminder for {} already fired at {}", task.id, current);
                continue;
            }
            self.last_fired.insert(task.id.clone(), minute);
            events.push(ReminderEvent {
                task_id: task.id.clone(),
                title: task.title.clone(),
                is_daily: task.is_daily,
            });
        }
        events
    }
}

/// Repeating deadline driven by the event loop.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// First tick is due one full interval after `start`.
    pub fn new(interval: Duration, start: Instant) -> Ticker {
        Ticker { interval, next: start + interval }
    }

    /// True once per elapsed interval. Missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        while self.next <= now {
            self.next += self.interval;
        }
        true
    }

    /// Time left until the next tick.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}
