//! Application context: the task store plus its in-app side effects.
//!
//! Built once at startup and disposed with [`AppContext::shutdown`]. It
//! owns the banner queue, the reminder matcher and the device
//! collaborators, so no handler state lives in globals.

use std::time::{Duration, Instant};
use chrono::{DateTime, Local, Utc};
use crate::banner::BannerQueue;
use crate::config::Settings;
use crate::error::Result;
use crate::models::{BannerKind, Task};
use crate::notify::{DeviceScheduler, HapticEffect, Haptics, ImpactStyle, LogScheduler, ScheduleRequest, SilentHaptics};
use crate::reminder::{ReminderEvent, ReminderMatcher};
use crate::reset::today;
use crate::storage::{FileStore, Gateway, KeyValueStore};
use crate::store::TaskStore;

pub struct AppContext<S: KeyValueStore> {
    store: TaskStore<S>,
    banners: BannerQueue,
    matcher: ReminderMatcher,
    scheduler: Box<dyn DeviceScheduler>,
    haptics: Box<dyn Haptics>,
}

impl AppContext<FileStore> {
    /// Opens the state file named by `settings` and runs the daily reset.
    pub fn open(settings: &Settings) -> AppContext<FileStore> {
        tracing::debug!("opening {}", settings.db_path.display());
        let store = TaskStore::load(Gateway::new(FileStore::new(&settings.db_path)), today());
        AppContext::new(store, settings.banner_ttl)
    }
}

impl<S: KeyValueStore> AppContext<S> {
    /// Wraps a loaded store with the logging scheduler and no haptics.
    pub fn new(store: TaskStore<S>, banner_ttl: Duration) -> AppContext<S> {
        AppContext {
            store,
            banners: BannerQueue::new(banner_ttl),
            matcher: ReminderMatcher::new(),
            scheduler: Box::new(LogScheduler),
            haptics: Box::new(SilentHaptics),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn DeviceScheduler>) -> AppContext<S> {
        self.scheduler = scheduler;
        self
    }

    pub fn with_haptics(mut self, haptics: Box<dyn Haptics>) -> AppContext<S> {
        self.haptics = haptics;
        self
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn banners(&self) -> &BannerQueue {
        &self.banners
    }

    pub fn add_task(&mut self, title: &str, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        let task = self.store.add_task(title, reminder)?;
        self.schedule(&task);
        self.notify("Task added", &task.title, BannerKind::Success);
        self.haptics.pulse(HapticEffect::Success);
        Ok(task)
    }

    pub fn add_daily_task(&mut self, title: &str, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        let task = self.store.add_daily_task(title, reminder)?;
        self.schedule(&task);
        self.notify("Daily task added", &task.title, BannerKind::Success);
        self.haptics.pulse(HapticEffect::Success);
        Ok(task)
    }

    /// Validated daily task for the settings working copy, not yet stored.
    pub fn draft_daily_task(&mut self, title: &str, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        self.store.draft_daily_task(title, reminder)
    }

    /// Completes a task. Daily reminders stay scheduled for tomorrow.
    pub fn complete_task(&mut self, id: &str) -> Option<Task> {
        let done = self.store.complete_task(id);
        if let Some(t) = done.as_ref().filter(|t| !t.is_daily) {
            self.cancel(t);
        }
        let message = done.as_ref().map_or("Task completed", |t| t.title.as_str()).to_string();
        self.notify("Task completed", &message, BannerKind::Success);
        self.haptics.pulse(HapticEffect::Success);
        done
    }

    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let removed = self.store.delete_task(id);
        if let Some(t) = &removed {
            self.cancel(t);
        }
        let message = removed.as_ref().map_or("Task deleted", |t| t.title.as_str()).to_string();
        self.notify("Task deleted", &message, BannerKind::Warning);
        self.haptics.pulse(HapticEffect::Impact(ImpactStyle::Medium));
        removed
    }

    pub fn remove_daily_task(&mut self, id: &str) -> Option<Task> {
        let removed = self.store.remove_daily_task(id);
        if let Some(t) = &removed {
            self.cancel(t);
        }
        removed
    }

    /// Commits an edited daily collection from the settings view.
    ///
    /// Reminders of dropped tasks are cancelled and those of new tasks
    /// scheduled.
    pub fn save_daily_tasks(&mut self, daily: Vec<Task>) {
        let dropped: Vec<Task> = self
            .store
            .daily_tasks()
            .iter()
            .filter(|old| !daily.iter().any(|t| t.id == old.id))
            .cloned()
            .collect();
        let added: Vec<Task> = daily
            .iter()
            .filter(|t| !self.store.daily_tasks().iter().any(|old| old.id == t.id))
            .cloned()
            .collect();

        self.store.reset_daily_tasks(daily);
        for t in &dropped {
            self.cancel(t);
        }
        for t in &added {
            self.schedule(t);
        }
        self.notify("Settings saved", "Daily tasks updated", BannerKind::Success);
    }

    /// Settings "reset" button: every daily task back to incomplete.
    pub fn mark_all_daily_incomplete(&mut self) {
        self.store.mark_all_daily_incomplete();
        self.notify("Settings saved", "Daily tasks updated", BannerKind::Success);
        self.haptics.pulse(HapticEffect::Success);
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.store.reorder(from, to)?;
        self.notify("Order changed", "Task order updated", BannerKind::Success);
        Ok(())
    }

    /// Runs the reminder matcher for `now`, raising a banner and a pulse per hit.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<ReminderEvent> {
        let events = self
            .matcher
            .check(now, self.store.daily_tasks(), self.store.tasks());
        for e in &events {
            tracing::info!("reminder fired for {}", e.task_id);
            let title = if e.is_daily { "Daily reminder" } else { "Reminder" };
            self.notify(title, &e.title, BannerKind::Reminder);
            self.haptics.pulse(HapticEffect::Warning);
        }
        events
    }

    pub fn expire_banners(&mut self, now: Instant) {
        self.banners.expire(now);
    }

    pub fn dismiss_banner(&mut self, id: u64) {
        self.banners.remove(id);
    }

    /// Tears the context down: pending banners and matcher state are dropped.
    ///
    /// Device notifications stay registered so reminders outlive the app.
    pub fn shutdown(mut self) -> TaskStore<S> {
        self.banners.clear();
        tracing::debug!("context shut down");
        self.store
    }

    /// Shows a banner.
    pub fn notify(&mut self, title: &str, message: &str, kind: BannerKind) {
        self.banners.push(title, message, kind);
    }

    fn schedule(&mut self, task: &Task) {
        if let Some(request) = ScheduleRequest::for_task(task) {
            if let Err(e) = self.scheduler.schedule(&request) {
                tracing::warn!("{}", e);
            }
        }
    }

    fn cancel(&mut self, task: &Task) {
        if task.notification_time.is_none() {
            return;
        }
        if let Err(e) = self.scheduler.cancel(&task.id) {
            tracing::warn!("{}", e);
        }
    }
}
