use std::time::{Duration, Instant};
use chrono::{DateTime, Local, Utc};
use ratatui::widgets::TableState;
use crate::commands::parse_reminder;
use crate::config::Settings;
use crate::context::AppContext;
use crate::models::{BannerKind, Task};
use crate::notify::TerminalBell;
use crate::reminder::Ticker;
use crate::storage::{FileStore, KeyValueStore};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(PartialEq)]
pub enum ViewMode {
    Tasks,
    Settings,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub daily: bool,
    pub step: usize, // 0: Title, 1: Daily?, 2: Reminder
}

pub struct App<S: KeyValueStore = FileStore> {
    pub ctx: AppContext<S>,
    pub state: TableState,
    pub settings_state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Working copy of the daily tasks while the settings view is open.
    pub draft: Vec<Task>,
    ticker: Ticker,
}

impl App<FileStore> {
    /// Creates a new App instance and loads initial data.
    pub fn new(settings: &Settings) -> App<FileStore> {
        let ctx = AppContext::open(settings).with_haptics(Box::new(TerminalBell));
        App::with_context(ctx, settings.reminder_interval)
    }
}

impl<S: KeyValueStore> App<S> {
    pub fn with_context(ctx: AppContext<S>, reminder_interval: Duration) -> App<S> {
        let mut app = App {
            ctx,
            state: TableState::default(),
            settings_state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            draft: Vec::new(),
            ticker: Ticker::new(reminder_interval, Instant::now()),
        };
        app.clamp_selection();
        app
    }

    /// Tasks shown in the main view.
    pub fn visible(&self) -> Vec<&Task> {
        self.ctx.store().all_tasks()
    }

    fn list_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Tasks => self.visible().len(),
            ViewMode::Settings => self.draft.len(),
        }
    }

    fn current_state(&mut self) -> &mut TableState {
        match self.view_mode {
            ViewMode::Tasks => &mut self.state,
            ViewMode::Settings => &mut self.settings_state,
        }
    }

    /// Selects the next item in the current list.
    pub fn next(&mut self) {
        let len = self.list_len();
        if len == 0 { return; }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    /// Selects the previous item in the current list.
    pub fn previous(&mut self) {
        let len = self.list_len();
        if len == 0 { return; }
        let state = self.current_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    /// Keeps the selection inside the list after it shrinks or grows.
    fn clamp_selection(&mut self) {
        let len = self.list_len();
        let state = self.current_state();
        if len == 0 {
            state.select(None);
        } else if let Some(i) = state.selected() {
            if i >= len {
                state.select(Some(len - 1));
            }
        } else {
            state.select(Some(0));
        }
    }

    fn selected_task(&self) -> Option<Task> {
        let i = self.state.selected()?;
        self.visible().get(i).map(|t| (*t).clone())
    }

    /// Completes the selected task.
    pub fn complete_selected(&mut self) {
        if let Some(t) = self.selected_task() {
            self.ctx.complete_task(&t.id);
            self.clamp_selection();
        }
    }

    /// Deletes the selected one-off task. Daily tasks are removed from settings.
    pub fn delete_selected(&mut self) {
        if let Some(t) = self.selected_task() {
            if t.is_daily {
                self.ctx.notify("Daily task", "Remove daily tasks from settings (s)", BannerKind::Info);
                return;
            }
            self.ctx.delete_task(&t.id);
            self.clamp_selection();
        }
    }

    /// Moves the selected task one row up (`-1`) or down (`1`).
    pub fn move_selected(&mut self, delta: isize) {
        let Some(i) = self.state.selected() else { return };
        let len = self.visible().len();
        let Some(to) = i.checked_add_signed(delta).filter(|to| *to < len) else { return };
        match self.ctx.reorder(i, to) {
            Ok(()) => self.state.select(Some(to)),
            Err(e) => tracing::warn!("reorder failed: {}", e),
        }
    }

    /// Opens the settings view on a fresh copy of the daily tasks.
    pub fn open_settings(&mut self) {
        self.draft = self.ctx.store().daily_tasks().to_vec();
        self.view_mode = ViewMode::Settings;
        self.clamp_selection();
    }

    /// Commits the working copy and returns to the task list.
    pub fn save_settings(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        self.ctx.save_daily_tasks(draft);
        self.view_mode = ViewMode::Tasks;
        self.clamp_selection();
    }

    pub fn discard_settings(&mut self) {
        self.draft.clear();
        self.view_mode = ViewMode::Tasks;
        self.clamp_selection();
    }

    /// Removes the selected entry from the working copy.
    pub fn remove_selected_daily(&mut self) {
        if let Some(i) = self.settings_state.selected() {
            if i < self.draft.len() {
                self.draft.remove(i);
                self.clamp_selection();
            }
        }
    }

    /// Marks every daily task incomplete and commits right away.
    pub fn reset_daily(&mut self) {
        for t in self.draft.iter_mut() {
            t.completed = false;
        }
        self.ctx.save_daily_tasks(self.draft.clone());
    }

    /// Dismisses the oldest banner.
    pub fn dismiss_banner(&mut self) {
        if let Some(id) = self.ctx.banners().banners().first().map(|b| b.id) {
            self.ctx.dismiss_banner(id);
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        if self.view_mode == ViewMode::Settings {
            self.add_state.daily = true;
        }
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles input for the "Add Task" wizard.
    pub fn handle_input(&mut self) {
        match self.add_state.step {
            0 => { // Title
                if self.input_buffer.trim().is_empty() {
                    self.ctx.notify("Error", "Please enter a title", BannerKind::Warning);
                    return;
                }
                self.add_state.title = self.input_buffer.trim().to_string();
                // The settings view only adds daily tasks.
                self.add_state.step = if self.view_mode == ViewMode::Settings { 2 } else { 1 };
                self.input_buffer.clear();
            }
            1 => { // Daily?
                self.add_state.daily = matches!(self.input_buffer.trim(), "y" | "Y" | "yes");
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => { // Reminder
                let input = self.input_buffer.trim().to_string();
                let reminder = if input.is_empty() {
                    None
                } else {
                    match parse_reminder(&input) {
                        Some(r) => Some(r),
                        None => {
                            self.ctx.notify("Error", "Use HH:MM for the reminder", BannerKind::Warning);
                            return;
                        }
                    }
                };
                self.finish_add(reminder);
            }
            _ => {}
        }
    }

    fn finish_add(&mut self, reminder: Option<DateTime<Utc>>) {
        let title = self.add_state.title.clone();
        let in_settings = self.view_mode == ViewMode::Settings;
        let added = if in_settings {
            self.ctx.draft_daily_task(&title, reminder).map(|t| self.draft.push(t))
        } else if self.add_state.daily {
            self.ctx.add_daily_task(&title, reminder).map(|_| ())
        } else {
            self.ctx.add_task(&title, reminder).map(|_| ())
        };
        if let Err(e) = added {
            self.ctx.notify("Error", &e.to_string(), BannerKind::Warning);
        }
        self.cancel_input();
        self.clamp_selection();
    }

    /// How long the event loop may block before the next timer is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        let tick = self.ticker.remaining(now);
        match self.ctx.banners().next_deadline(now) {
            Some(d) => d.min(tick),
            None => tick,
        }
    }

    /// Drives the reminder tick and banner expiry.
    pub fn on_tick(&mut self, now: Instant) {
        if self.ticker.poll(now) {
            self.ctx.tick(Local::now());
        }
        self.ctx.expire_banners(now);
    }

    pub fn shutdown(self) {
        self.ctx.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::storage::{Gateway, MemoryStore};
    use crate::store::TaskStore;

    fn app() -> App<MemoryStore> {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let store = TaskStore::load(Gateway::new(MemoryStore::default()), today);
        App::with_context(AppContext::new(store, Duration::from_secs(5)), Duration::from_secs(60))
    }

    fn type_line(app: &mut App<MemoryStore>, line: &str) {
        app.input_buffer = line.to_string();
        app.handle_input();
    }

    #[test]
    fn wizard_adds_daily_task() {
        let mut app = app();
        app.start_add();
        type_line(&mut app, "stretch");
        type_line(&mut app, "y");
        type_line(&mut app, "07:30");
        assert!(app.input_mode == InputMode::Normal);
        let daily = app.ctx.store().daily_tasks();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].reminder_clock().as_deref(), Some("7:30"));
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn wizard_rejects_blank_title() {
        let mut app = app();
        app.start_add();
        type_line(&mut app, "   ");
        assert_eq!(app.add_state.step, 0);
        assert!(app.input_mode == InputMode::Adding);
        assert_eq!(app.ctx.banners().banners().last().unwrap().kind, BannerKind::Warning);
    }

    #[test]
    fn move_selected_reorders_view() {
        let mut app = app();
        app.ctx.add_task("a", None).unwrap();
        app.ctx.add_task("b", None).unwrap();
        app.state.select(Some(0));
        app.move_selected(1);
        let titles: Vec<&str> = app.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert_eq!(app.state.selected(), Some(1));
        app.move_selected(1);
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn settings_edits_apply_only_on_save() {
        let mut app = app();
        app.ctx.add_daily_task("keep", None).unwrap();
        app.ctx.add_daily_task("drop", None).unwrap();
        app.open_settings();
        app.settings_state.select(Some(1));
        app.remove_selected_daily();
        assert_eq!(app.ctx.store().daily_tasks().len(), 2);
        app.discard_settings();
        assert_eq!(app.ctx.store().daily_tasks().len(), 2);

        app.open_settings();
        app.settings_state.select(Some(1));
        app.remove_selected_daily();
        app.save_settings();
        let titles: Vec<&str> = app.ctx.store().daily_tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["keep"]);
    }

    #[test]
    fn deleting_daily_from_main_view_is_refused() {
        let mut app = app();
        app.ctx.add_daily_task("stretch", None).unwrap();
        app.state.select(Some(0));
        app.delete_selected();
        assert_eq!(app.ctx.store().daily_tasks().len(), 1);
    }
}
