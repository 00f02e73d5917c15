//! # Daylist
//!
//! A terminal to-do list for the day. Keep one-off tasks and daily routines
//! side by side, set reminder times, and let daily tasks reset themselves
//! every morning.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! daylist
//! # or explicitly
//! daylist ui
//! ```
//!
//! **Task View**
//! *   `a`: Add new task (title, daily?, reminder)
//! *   `Space`: Complete selected task
//! *   `d`: Delete selected one-off task
//! *   `J` / `K`: Move selected task down / up
//! *   `s`: Open daily task settings
//! *   `x`: Dismiss the oldest banner
//! *   `q`: Quit
//!
//! **Daily Settings**
//! *   `a`: Add daily task
//! *   `d`: Remove selected daily task
//! *   `r`: Mark all daily tasks incomplete
//! *   `Enter`: Save, `Esc`: Discard
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! daylist add "Buy milk" --at 18:30
//! daylist add "Stretch" --daily --at 7:00
//! daylist list
//! daylist complete <ID>
//! daylist move 3 1
//! daylist daily reset
//! ```
//!
//! ## Data Storage
//!
//! *   Linux: `~/.local/share/daylist/state.json`
//! *   macOS: `~/Library/Application Support/daylist/state.json`
//! *   Windows: `%LOCALAPPDATA%\daylist\state.json`
//!
//! Override with `DAYLIST_DB`. Logs go to `daylist.log` in the same
//! directory; `DAYLIST_LOG` sets the filter (default `daylist=info`).

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use daylist::commands::*;
use daylist::config::Settings;
use daylist::logging::init_logging;
use daylist::tui::run_tui;

#[derive(Parser)]
#[command(name = "daylist")]
#[command(about = "Daily to-do list with reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Repeat every day
        #[arg(short, long)]
        daily: bool,
        /// Reminder time in HH:MM
        #[arg(short, long)]
        at: Option<String>,
    },
    /// List tasks in display order
    List {
        /// Also show completed daily tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Complete a task (one-off tasks are removed)
    Complete {
        id: String,
    },
    /// Delete a one-off task
    Delete {
        id: String,
    },
    /// Move a task to another position in the list
    Move {
        /// Current position (as shown by `list`)
        from: usize,
        /// New position
        to: usize,
    },
    /// Manage daily tasks
    Daily {
        #[command(subcommand)]
        command: DailyCommands,
    },
    /// Reset the database (delete all tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum DailyCommands {
    /// List daily tasks, completed ones included
    List,
    /// Remove a daily task
    Remove {
        id: String,
    },
    /// Mark every daily task incomplete
    Reset,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    if let Err(e) = init_logging(&settings) {
        eprintln!("Logging disabled: {}", e);
    }

    match cli.command {
        Some(Commands::Add { title, daily, at }) => cmd_add(&settings, title, daily, at, false),
        Some(Commands::List { all }) => cmd_list(&settings, all),
        Some(Commands::Complete { id }) => cmd_complete(&settings, id, false),
        Some(Commands::Delete { id }) => cmd_delete(&settings, id, false),
        Some(Commands::Move { from, to }) => cmd_move(&settings, from, to, false),
        Some(Commands::Daily { command }) => match command {
            DailyCommands::List => cmd_daily_list(&settings),
            DailyCommands::Remove { id } => cmd_daily_remove(&settings, id, false),
            DailyCommands::Reset => cmd_daily_reset(&settings, false),
        },
        Some(Commands::Reset { force }) => cmd_reset(&settings, force),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "daylist", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            run_tui(&settings).map_err(|e| anyhow::anyhow!("error running TUI: {}", e))?;
        }
    }
    Ok(())
}
