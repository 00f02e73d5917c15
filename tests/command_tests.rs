use daylist::commands::*;
use daylist::config::Settings;
use daylist::models::Task;
use daylist::reset::today;
use daylist::storage::{FileStore, Gateway};
use daylist::store::TaskStore;
use chrono::Duration;
use std::path::PathBuf;

// Each test gets its own state file; the directory lives until `f` returns.
fn with_test_db<F>(f: F)
where
    F: FnOnce(&Settings, PathBuf),
{
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("state.json");
    let settings = Settings::with_db_path(db_path.clone());

    f(&settings, db_path);
}

fn gateway(path: &PathBuf) -> Gateway<FileStore> {
    Gateway::new(FileStore::new(path))
}

fn load_tasks(path: &PathBuf) -> Vec<Task> {
    gateway(path).load_tasks().unwrap()
}

fn load_daily_tasks(path: &PathBuf) -> Vec<Task> {
    gateway(path).load_daily_tasks().unwrap()
}

#[test]
fn test_add_and_list() {
    with_test_db(|s, path| {
        cmd_add(s, "Write report".into(), false, None, true);
        cmd_add(s, "Stretch".into(), true, Some("7:30".into()), true);

        let tasks = load_tasks(&path);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write report");
        assert!(!tasks[0].is_daily);

        let daily = load_daily_tasks(&path);
        assert_eq!(daily.len(), 1);
        assert!(daily[0].is_daily);
        assert_eq!(daily[0].reminder_clock().as_deref(), Some("7:30"));
    });
}

#[test]
fn test_blank_title_is_rejected() {
    with_test_db(|s, path| {
        cmd_add(s, "   ".into(), false, None, true);
        cmd_add(s, "".into(), true, None, true);
        assert!(load_tasks(&path).is_empty());
        assert!(load_daily_tasks(&path).is_empty());
    });
}

#[test]
fn test_invalid_reminder_is_rejected() {
    with_test_db(|s, path| {
        cmd_add(s, "Call".into(), false, Some("25:99".into()), true);
        assert!(load_tasks(&path).is_empty());
    });
}

#[test]
fn test_complete_one_off_and_daily() {
    with_test_db(|s, path| {
        cmd_add(s, "Once".into(), false, None, true);
        cmd_add(s, "Every day".into(), true, None, true);
        let once = load_tasks(&path)[0].id.clone();
        let daily = load_daily_tasks(&path)[0].id.clone();

        cmd_complete(s, once, true);
        cmd_complete(s, daily.clone(), true);
        cmd_complete(s, "missing".into(), true);

        assert!(load_tasks(&path).is_empty());
        let daily_tasks = load_daily_tasks(&path);
        assert_eq!(daily_tasks.len(), 1);
        assert_eq!(daily_tasks[0].id, daily);
        assert!(daily_tasks[0].completed);
    });
}

#[test]
fn test_delete_leaves_daily_tasks() {
    with_test_db(|s, path| {
        cmd_add(s, "Once".into(), false, None, true);
        cmd_add(s, "Every day".into(), true, None, true);
        let daily = load_daily_tasks(&path)[0].id.clone();

        cmd_delete(s, daily.clone(), true);
        assert_eq!(load_daily_tasks(&path).len(), 1);

        cmd_daily_remove(s, daily, true);
        assert!(load_daily_tasks(&path).is_empty());

        let once = load_tasks(&path)[0].id.clone();
        cmd_delete(s, once, true);
        assert!(load_tasks(&path).is_empty());
    });
}

#[test]
fn test_move_across_collections() {
    with_test_db(|s, path| {
        cmd_add(s, "d1".into(), true, None, true);
        cmd_add(s, "t1".into(), false, None, true);
        cmd_add(s, "t2".into(), false, None, true);

        // view [d1, t1, t2]: move t2 to the top
        cmd_move(s, 3, 1, true);

        let tasks: Vec<String> = load_tasks(&path).into_iter().map(|t| t.title).collect();
        let daily: Vec<String> = load_daily_tasks(&path).into_iter().map(|t| t.title).collect();
        assert_eq!(tasks, vec!["t2", "t1"]);
        assert_eq!(daily, vec!["d1"]);

        // Out of range is refused without changes.
        cmd_move(s, 1, 9, true);
        let tasks: Vec<String> = load_tasks(&path).into_iter().map(|t| t.title).collect();
        assert_eq!(tasks, vec!["t2", "t1"]);
    });
}

#[test]
fn test_daily_reset_command() {
    with_test_db(|s, path| {
        cmd_add(s, "Stretch".into(), true, None, true);
        let id = load_daily_tasks(&path)[0].id.clone();
        cmd_complete(s, id, true);
        assert!(load_daily_tasks(&path)[0].completed);

        cmd_daily_reset(s, true);
        assert!(!load_daily_tasks(&path)[0].completed);
    });
}

#[test]
fn test_new_day_resets_on_open() {
    with_test_db(|s, path| {
        cmd_add(s, "Stretch".into(), true, None, true);
        let id = load_daily_tasks(&path)[0].id.clone();
        cmd_complete(s, id.clone(), true);

        // Pretend the last reset happened yesterday.
        gateway(&path).save_last_reset(today() - Duration::days(1)).unwrap();

        let store = TaskStore::load(gateway(&path), today());
        assert_eq!(store.daily_tasks()[0].id, id);
        assert!(!store.daily_tasks()[0].completed);
        assert_eq!(gateway(&path).load_last_reset().unwrap(), Some(today()));

        // Opening again on the same day changes nothing.
        cmd_complete(s, id, true);
        let store = TaskStore::load(gateway(&path), today());
        assert!(store.daily_tasks()[0].completed);
    });
}

#[test]
fn test_reset_deletes_state_file() {
    with_test_db(|s, path| {
        cmd_add(s, "Task".into(), false, None, true);
        assert!(path.exists());
        cmd_reset(s, true);
        assert!(!path.exists());
    });
}
