use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use crate::error::{Result, StoreError};
use crate::models::Task;

/// Key holding the one-off tasks.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the daily tasks.
pub const DAILY_TASKS_KEY: &str = "dailyTasks";
/// Key holding the last day daily tasks were reset.
pub const LAST_RESET_KEY: &str = "lastReset";

/// Format of the `lastReset` marker.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// A flat string-to-string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store backed by a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> FileStore {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let mut f = OpenOptions::new().read(true).open(&self.path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&s)?)
    }

    /// Like `read_all`, but an unparseable file is moved aside to `.bak`
    /// and treated as empty so the next write can replace it.
    fn read_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.read_all() {
            Err(StoreError::Serialization(e)) => {
                let backup = self.path.with_extension("json.bak");
                tracing::warn!(
                    "state file {} is unreadable ({}), moving it to {}",
                    self.path.display(),
                    e,
                    backup.display()
                );
                fs::rename(&self.path, &backup)?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    /// Writes to a sibling temp file, then renames it over the state file.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let s = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        f.write_all(s.as_bytes())?;
        f.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

/// In-memory store, used by tests and as a throwaway backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the two task collections and the reset marker.
///
/// Pure I/O: no validation or policy lives here.
#[derive(Debug, Clone)]
pub struct Gateway<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Gateway<S> {
    pub fn new(store: S) -> Gateway<S> {
        Gateway { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        self.load_collection(TASKS_KEY)
    }

    pub fn load_daily_tasks(&self) -> Result<Vec<Task>> {
        self.load_collection(DAILY_TASKS_KEY)
    }

    /// Returns the stored reset day, or `None` if absent or unparseable.
    pub fn load_last_reset(&self) -> Result<Option<NaiveDate>> {
        Ok(self
            .store
            .get(LAST_RESET_KEY)?
            .and_then(|s| NaiveDate::parse_from_str(&s, DAY_FORMAT).ok()))
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        self.save_collection(TASKS_KEY, tasks)
    }

    pub fn save_daily_tasks(&mut self, daily: &[Task]) -> Result<()> {
        self.save_collection(DAILY_TASKS_KEY, daily)
    }

    /// Saves both collections, one-off first.
    pub fn save_all(&mut self, tasks: &[Task], daily: &[Task]) -> Result<()> {
        self.save_tasks(tasks)?;
        self.save_daily_tasks(daily)
    }

    pub fn save_last_reset(&mut self, day: NaiveDate) -> Result<()> {
        self.store
            .set(LAST_RESET_KEY, &day.format(DAY_FORMAT).to_string())
    }

    fn load_collection(&self, key: &str) -> Result<Vec<Task>> {
        match self.store.get(key)? {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_collection(&mut self, key: &str, tasks: &[Task]) -> Result<()> {
        let s = serde_json::to_string(tasks)?;
        self.store.set(key, &s)
    }
}

/// Deletes the state file at `path`, if present.
pub fn delete_database(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(id: &str, daily: bool, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: format!("task {}", id),
            is_daily: daily,
            completed,
            created_at: "2026-10-19T08:00:00+00:00".into(),
            notification_time: Some(Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap()),
        }
    }

    #[test]
    fn file_round_trip_preserves_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let tasks = vec![sample("1", false, false), sample("2", false, false)];
        let daily = vec![sample("3", true, true)];

        let mut gw = Gateway::new(FileStore::new(&path));
        gw.save_all(&tasks, &daily).unwrap();
        gw.save_last_reset(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()).unwrap();

        let reopened = Gateway::new(FileStore::new(&path));
        assert_eq!(reopened.load_tasks().unwrap(), tasks);
        assert_eq!(reopened.load_daily_tasks().unwrap(), daily);
        assert_eq!(
            reopened.load_last_reset().unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
    }

    #[test]
    fn truncated_file_is_replaced_on_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ truncated").unwrap();

        let mut gw = Gateway::new(FileStore::new(&path));
        assert!(gw.load_tasks().is_err());
        gw.save_tasks(&[sample("1", false, false)]).unwrap();

        let reopened = Gateway::new(FileStore::new(&path));
        assert_eq!(reopened.load_tasks().unwrap(), vec![sample("1", false, false)]);
        assert_eq!(
            fs::read_to_string(dir.path().join("state.json.bak")).unwrap(),
            "{ truncated"
        );
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let gw = Gateway::new(FileStore::new(dir.path().join("absent.json")));
        assert!(gw.load_tasks().unwrap().is_empty());
        assert!(gw.load_daily_tasks().unwrap().is_empty());
        assert_eq!(gw.load_last_reset().unwrap(), None);
    }

    #[test]
    fn uses_camel_case_field_names() {
        let mut gw = Gateway::new(MemoryStore::default());
        gw.save_tasks(&[sample("1", false, false)]).unwrap();
        let raw = gw.store().entries.get(TASKS_KEY).unwrap();
        assert!(raw.contains("\"isDaily\":false"));
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"notificationTime\""));
    }

    #[test]
    fn corrupt_value_is_an_error() {
        let mut store = MemoryStore::default();
        store.set(TASKS_KEY, "not json").unwrap();
        let gw = Gateway::new(store);
        assert!(gw.load_tasks().is_err());
    }
}
