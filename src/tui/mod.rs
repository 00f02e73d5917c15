pub mod app;
pub mod ui;

use std::{error::Error, io, time::Instant};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use app::{App, InputMode, ViewMode};
use ui::ui;
use crate::config::Settings;

pub fn run_tui(settings: &Settings) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(settings);

    // Run loop
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("tui loop failed: {}", err);
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(app.timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    return Ok(());
                }
            }
        }

        app.on_tick(Instant::now());
    }
}

/// Applies one key press. Returns true when the user asked to quit.
fn handle_key(app: &mut App, code: KeyCode) -> bool {
    match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => match code {
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('J') => app.move_selected(1),
                KeyCode::Char('K') => app.move_selected(-1),
                KeyCode::Char(' ') => app.complete_selected(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('s') => app.open_settings(),
                KeyCode::Char('x') => app.dismiss_banner(),
                _ => {}
            },
            ViewMode::Settings => match code {
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_daily(),
                KeyCode::Char('r') => app.reset_daily(),
                KeyCode::Char('x') => app.dismiss_banner(),
                KeyCode::Enter => app.save_settings(),
                KeyCode::Esc => app.discard_settings(),
                _ => {}
            },
        },
        InputMode::Adding => match code {
            KeyCode::Enter => app.handle_input(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Char(c) => {
                app.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                app.input_buffer.pop();
            }
            _ => {}
        },
    }
    false
}
