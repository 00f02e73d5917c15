use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use crate::config::Settings;

/// Installs the global `tracing` subscriber.
///
/// Output goes to the log file next to the state file so the TUI screen is
/// never written to. `DAYLIST_LOG` overrides the filter.
pub fn init_logging(settings: &Settings) -> std::io::Result<()> {
    if let Some(dir) = settings.log_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_path)?;

    let filter = EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    // A second init (tests, repeated calls) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
