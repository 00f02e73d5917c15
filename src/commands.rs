use std::io::{self, Write};
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::config::Settings;
use crate::context::AppContext;
use crate::models::Task;
use crate::storage::delete_database;

/// Parses a reminder given as `HH:MM` into today's local time at that minute.
pub fn parse_reminder(at: &str) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(at.trim(), "%H:%M").ok()?;
    resolve_local(&Local, Local::now().date_naive().and_time(time))
        .map(|t| t.with_timezone(&Utc))
}

/// Maps a wall-clock time onto `tz`. A time skipped by a DST jump moves
/// forward by an hour, the way clocks do.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// Adds a new one-off or daily task.
pub fn cmd_add(settings: &Settings, title: String, daily: bool, at: Option<String>, silent: bool) {
    let reminder = match at {
        Some(a) => match parse_reminder(&a) {
            Some(r) => Some(r),
            None => {
                if !silent { eprintln!("Invalid reminder time '{}'. Use HH:MM.", a); }
                return;
            }
        },
        None => None,
    };

    let mut ctx = AppContext::open(settings);
    let added = if daily {
        ctx.add_daily_task(&title, reminder)
    } else {
        ctx.add_task(&title, reminder)
    };
    match added {
        Ok(t) => {
            if !silent { println!("{} added (id = {})", if daily { "Daily task" } else { "Task" }, t.id); }
        }
        Err(e) => {
            if !silent { eprintln!("Cannot add task: {}", e); }
        }
    }
}

/// Completes a task: one-off tasks are removed, daily tasks flagged.
pub fn cmd_complete(settings: &Settings, id: String, silent: bool) {
    let mut ctx = AppContext::open(settings);
    match ctx.complete_task(&id) {
        Some(t) => { if !silent { println!("Task '{}' completed.", t.title); } }
        None => { if !silent { eprintln!("Task {} not found.", id); } }
    }
}

/// Deletes a one-off task.
pub fn cmd_delete(settings: &Settings, id: String, silent: bool) {
    let mut ctx = AppContext::open(settings);
    match ctx.delete_task(&id) {
        Some(t) => { if !silent { println!("Task '{}' deleted.", t.title); } }
        None => {
            if !silent {
                if ctx.store().find(&id).is_some() {
                    eprintln!("Task {} is a daily task. Use `daily remove`.", id);
                } else {
                    eprintln!("Task {} not found.", id);
                }
            }
        }
    }
}

/// Moves an entry of the task list (1-based positions, as shown by `list`).
pub fn cmd_move(settings: &Settings, from: usize, to: usize, silent: bool) {
    let mut ctx = AppContext::open(settings);
    if from == 0 || to == 0 {
        if !silent { eprintln!("Positions start at 1."); }
        return;
    }
    match ctx.reorder(from - 1, to - 1) {
        Ok(()) => { if !silent { println!("Moved task {} to position {}.", from, to); } }
        Err(e) => { if !silent { eprintln!("Cannot move task: {}", e); } }
    }
}

/// Removes a daily task.
pub fn cmd_daily_remove(settings: &Settings, id: String, silent: bool) {
    let mut ctx = AppContext::open(settings);
    match ctx.remove_daily_task(&id) {
        Some(t) => { if !silent { println!("Daily task '{}' removed.", t.title); } }
        None => { if !silent { eprintln!("Daily task {} not found.", id); } }
    }
}

/// Marks every daily task incomplete.
pub fn cmd_daily_reset(settings: &Settings, silent: bool) {
    let mut ctx = AppContext::open(settings);
    ctx.mark_all_daily_incomplete();
    if !silent { println!("Daily tasks reset."); }
}

/// Lists tasks in display order.
///
/// Completed daily tasks are hidden unless `all` is true.
pub fn cmd_list(settings: &Settings, all: bool) {
    let ctx = AppContext::open(settings);
    let store = ctx.store();
    let mut rows: Vec<&Task> = store.all_tasks();
    if all {
        rows.extend(store.daily_tasks().iter().filter(|t| t.completed));
    }
    if rows.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", task_table(&rows, true));
}

/// Lists the daily collection, completed entries included.
pub fn cmd_daily_list(settings: &Settings) {
    let ctx = AppContext::open(settings);
    let rows: Vec<&Task> = ctx.store().daily_tasks().iter().collect();
    if rows.is_empty() {
        println!("No daily tasks found.");
        return;
    }
    println!("{}", task_table(&rows, false));
}

fn task_table(tasks: &[&Task], numbered: bool) -> Table {
    let mut table = Table::new();
    let mut header = Vec::new();
    if numbered {
        header.push(Cell::new("#").add_attribute(Attribute::Bold));
    }
    header.extend([
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Reminder").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (i, t) in tasks.iter().enumerate() {
        let mut row = Vec::new();
        if numbered {
            // Completed daily tasks are not part of the movable list.
            row.push(Cell::new(if t.completed { "-".to_string() } else { (i + 1).to_string() }));
        }
        let (kind, kind_color) = if t.is_daily { ("Daily", Color::Cyan) } else { ("Once", Color::Reset) };
        let (status, status_color) = if t.completed { ("Done", Color::Green) } else { ("Pending", Color::Yellow) };
        row.extend([
            Cell::new(&t.id),
            Cell::new(&t.title),
            Cell::new(kind).fg(kind_color),
            Cell::new(t.reminder_clock().unwrap_or_default()),
            Cell::new(status).fg(status_color),
        ]);
        table.add_row(row);
    }
    table
}

/// Resets the database by deleting the state file.
pub fn cmd_reset(settings: &Settings, force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database(&settings.db_path) {
        eprintln!("Failed to reset database: {}", e);
    } else {
        tracing::info!("database reset");
        println!("Database reset successfully.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDate, Timelike};

    /// Zone that jumps from 02:00 to 03:00 every day.
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    fn winter() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn summer() -> FixedOffset {
        FixedOffset::east_opt(7200).unwrap()
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> SpringForward {
            SpringForward
        }

        fn offset_from_local_date(&self, _: &NaiveDate) -> LocalResult<FixedOffset> {
            LocalResult::Single(winter())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            match local.hour() {
                0..=1 => LocalResult::Single(winter()),
                2 => LocalResult::None,
                _ => LocalResult::Single(summer()),
            }
        }

        fn offset_from_utc_date(&self, _: &NaiveDate) -> FixedOffset {
            winter()
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if utc.hour() < 1 { winter() } else { summer() }
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 29).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn time_in_dst_gap_moves_forward() {
        let t = resolve_local(&SpringForward, at(2, 30)).unwrap();
        assert_eq!((t.hour(), t.minute()), (3, 30));
    }

    #[test]
    fn ordinary_times_are_kept() {
        let t = resolve_local(&SpringForward, at(1, 15)).unwrap();
        assert_eq!((t.hour(), t.minute()), (1, 15));
        let t = resolve_local(&SpringForward, at(18, 30)).unwrap();
        assert_eq!((t.hour(), t.minute()), (18, 30));
    }

    #[test]
    fn malformed_reminders_are_rejected() {
        assert!(parse_reminder("25:99").is_none());
        assert!(parse_reminder("soon").is_none());
        assert!(parse_reminder("7:30").is_some());
    }
}
