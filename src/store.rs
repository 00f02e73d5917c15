use chrono::{DateTime, Local, NaiveDate, Utc};
use crate::error::{Result, StoreError};
use crate::models::Task;
use crate::reset::daily_reset;
use crate::storage::{Gateway, KeyValueStore};

/// Authoritative in-memory state for both task collections.
///
/// Every mutation is mirrored to the gateway right away. Save failures are
/// logged and otherwise ignored: memory stays ahead of disk until the next
/// successful save.
pub struct TaskStore<S: KeyValueStore> {
    gateway: Gateway<S>,
    tasks: Vec<Task>,
    daily_tasks: Vec<Task>,
    last_reset: Option<NaiveDate>,
    last_id: i64,
    /// False while an unreadable `dailyTasks` value is on disk. Saves skip
    /// the daily collection until it is explicitly changed.
    daily_writable: bool,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Loads both collections and applies the daily reset for `today`.
    ///
    /// A collection that fails to load starts empty.
    pub fn load(gateway: Gateway<S>, today: NaiveDate) -> TaskStore<S> {
        let tasks = gateway.load_tasks().unwrap_or_else(|e| {
            tracing::error!("failed to load tasks: {}", e);
            Vec::new()
        });
        let (daily_tasks, daily_writable) = match gateway.load_daily_tasks() {
            Ok(d) => (d, true),
            Err(e) => {
                tracing::error!("failed to load daily tasks: {}", e);
                (Vec::new(), false)
            }
        };
        let last_reset = gateway.load_last_reset().unwrap_or_else(|e| {
            tracing::error!("failed to load reset marker: {}", e);
            None
        });

        let mut store = TaskStore {
            gateway,
            tasks,
            daily_tasks,
            last_reset,
            last_id: 0,
            daily_writable,
        };
        store.run_daily_reset(today);
        store
    }

    /// Runs the daily reset policy. Returns true if anything was reset.
    pub fn run_daily_reset(&mut self, today: NaiveDate) -> bool {
        let Some(reset) = daily_reset(&self.daily_tasks, self.last_reset, today) else {
            return false;
        };
        tracing::info!("new day {}, resetting {} daily tasks", today, reset.len());
        self.daily_tasks = reset;
        self.last_reset = Some(today);
        if self.daily_writable {
            if let Err(e) = self.gateway.save_daily_tasks(&self.daily_tasks) {
                tracing::error!("failed to save daily tasks: {}", e);
            }
        }
        if let Err(e) = self.gateway.save_last_reset(today) {
            tracing::error!("failed to save reset marker: {}", e);
        }
        true
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn daily_tasks(&self) -> &[Task] {
        &self.daily_tasks
    }

    pub fn last_reset(&self) -> Option<NaiveDate> {
        self.last_reset
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    /// Incomplete daily tasks followed by all one-off tasks.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.daily_tasks
            .iter()
            .filter(|t| !t.completed)
            .chain(self.tasks.iter())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .chain(self.daily_tasks.iter())
            .find(|t| t.id == id)
    }

    /// Appends a one-off task.
    pub fn add_task(&mut self, title: &str, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        let task = self.new_task(title, false, reminder)?;
        self.tasks.push(task.clone());
        self.persist();
        Ok(task)
    }

    /// Appends a daily task, initially incomplete.
    pub fn add_daily_task(&mut self, title: &str, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        let task = self.new_task(title, true, reminder)?;
        self.daily_tasks.push(task.clone());
        self.daily_writable = true;
        self.persist();
        Ok(task)
    }

    /// Builds a validated daily task without storing it.
    ///
    /// Used by the settings view, which commits its working copy through
    /// [`TaskStore::reset_daily_tasks`].
    pub fn draft_daily_task(&mut self, title: &str, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        self.new_task(title, true, reminder)
    }

    /// Removes a one-off task or flags a daily one.
    ///
    /// Returns the affected task. Unknown ids are ignored.
    pub fn complete_task(&mut self, id: &str) -> Option<Task> {
        let done = if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            Some(self.tasks.remove(pos))
        } else if let Some(t) = self.daily_tasks.iter_mut().find(|t| t.id == id) {
            t.completed = true;
            Some(t.clone())
        } else {
            tracing::debug!("complete: task {} not found", id);
            None
        };
        self.persist();
        done
    }

    /// Removes a one-off task. Daily tasks are left alone.
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let removed = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .map(|pos| self.tasks.remove(pos));
        self.persist();
        removed
    }

    /// Removes a daily task.
    pub fn remove_daily_task(&mut self, id: &str) -> Option<Task> {
        let removed = self
            .daily_tasks
            .iter()
            .position(|t| t.id == id)
            .map(|pos| self.daily_tasks.remove(pos));
        self.persist();
        removed
    }

    /// Moves an entry of the [`all_tasks`](TaskStore::all_tasks) view.
    ///
    /// The reordered view is split back by `is_daily`. Completed daily tasks,
    /// which the view hides, are appended after the new daily sequence.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let mut view: Vec<Task> = self.all_tasks().into_iter().cloned().collect();
        let len = view.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }

        let moved = view.remove(from);
        view.insert(to, moved);

        let completed: Vec<Task> = self
            .daily_tasks
            .iter()
            .filter(|t| t.completed)
            .cloned()
            .collect();
        let (mut daily, tasks): (Vec<Task>, Vec<Task>) = view.into_iter().partition(|t| t.is_daily);
        daily.extend(completed);

        self.daily_tasks = daily;
        self.tasks = tasks;
        self.persist();
        Ok(())
    }

    /// Replaces the daily collection wholesale.
    pub fn reset_daily_tasks(&mut self, daily: Vec<Task>) {
        self.daily_tasks = daily;
        self.daily_writable = true;
        self.persist();
    }

    /// Clears `completed` on every daily task.
    pub fn mark_all_daily_incomplete(&mut self) {
        let cleared = self
            .daily_tasks
            .iter()
            .map(|t| Task { completed: false, ..t.clone() })
            .collect();
        self.reset_daily_tasks(cleared);
    }

    fn new_task(&mut self, title: &str, is_daily: bool, reminder: Option<DateTime<Utc>>) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation);
        }
        Ok(Task {
            id: self.next_id(),
            title: title.to_string(),
            is_daily,
            completed: false,
            created_at: Local::now().to_rfc3339(),
            notification_time: reminder,
        })
    }

    /// Millisecond timestamp, bumped past the last issued and any existing id.
    fn next_id(&mut self) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last_id + 1);
        while self.find(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }

    fn persist(&mut self) {
        let saved = if self.daily_writable {
            self.gateway.save_all(&self.tasks, &self.daily_tasks)
        } else {
            self.gateway.save_tasks(&self.tasks)
        };
        if let Err(e) = saved {
            tracing::error!("failed to save tasks: {}", e);
        }
    }
}
