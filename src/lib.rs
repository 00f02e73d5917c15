//! # Daylist
//!
//! A terminal to-do list with one-off and daily tasks, reminder times and
//! a daily reset of completed daily tasks.
//!
//! * One-off tasks disappear when completed.
//! * Daily tasks are flagged when completed and unflagged on the first run
//!   of each new day.
//! * Reminders fire as in-app banners while the TUI is open, checked once a
//!   minute against the local clock.
//!
//! State lives in a single JSON key-value file under the local data
//! directory, overridable with `DAYLIST_DB`.

pub mod banner;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod reminder;
pub mod reset;
pub mod storage;
pub mod store;
pub mod tui;
