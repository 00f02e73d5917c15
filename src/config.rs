use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// How often the reminder matcher runs while the UI is open.
pub const REMINDER_INTERVAL: Duration = Duration::from_secs(60);

/// How long a banner stays on screen before it is dropped.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// Default log filter when `DAYLIST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "daylist=info";

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the key-value state file.
    pub db_path: PathBuf,
    /// Path of the log file, next to the state file.
    pub log_path: PathBuf,
    /// `tracing` filter directive.
    pub log_filter: String,
    pub reminder_interval: Duration,
    pub banner_ttl: Duration,
}

impl Settings {
    /// Resolves settings from the environment.
    ///
    /// The state file is chosen in the following order:
    /// 1. `DAYLIST_DB` environment variable.
    /// 2. `~/.local/share/daylist/state.json` (on Linux).
    /// 3. `./state.json` (fallback).
    pub fn from_env() -> Settings {
        let db_path = std::env::var("DAYLIST_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());
        let log_filter =
            std::env::var("DAYLIST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        Settings::with_db_path(db_path).with_log_filter(log_filter)
    }

    /// Settings rooted at an explicit state file, with default timings.
    pub fn with_db_path(db_path: PathBuf) -> Settings {
        let mut log_path = db_path.clone();
        log_path.set_file_name("daylist.log");
        Settings {
            db_path,
            log_path,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            reminder_interval: REMINDER_INTERVAL,
            banner_ttl: BANNER_TTL,
        }
    }

    pub fn with_log_filter(mut self, filter: String) -> Settings {
        self.log_filter = filter;
        self
    }
}

fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push("daylist");
            if !p.exists() {
                let _ = fs::create_dir_all(&p);
            }
            p.push("state.json");
            p
        }
        None => PathBuf::from("state.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_sits_next_to_state_file() {
        let s = Settings::with_db_path(PathBuf::from("/tmp/daylist/state.json"));
        assert_eq!(s.log_path, PathBuf::from("/tmp/daylist/daylist.log"));
        assert_eq!(s.reminder_interval, Duration::from_secs(60));
        assert_eq!(s.banner_ttl, Duration::from_secs(5));
    }
}
