use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::models::{Banner, BannerKind};
use crate::storage::KeyValueStore;
use super::app::{App, InputMode, ViewMode};

const BANNER_WIDTH: u16 = 40;
const BANNER_HEIGHT: u16 = 4;

pub fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Tasks => {
            let rows: Vec<Row> = app
                .visible()
                .into_iter()
                .enumerate()
                .map(|(i, t)| {
                    let style = if t.is_daily {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        Cell::from((i + 1).to_string()),
                        Cell::from(t.title.clone()),
                        Cell::from(if t.is_daily { "Daily" } else { "Once" }),
                        Cell::from(t.reminder_clock().map(|c| format!("🔔 {}", c)).unwrap_or_default()),
                    ]).style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(10),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["#", "Title", "Type", "Reminder"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Daylist - Today"))
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.state);
        }
        ViewMode::Settings => {
            let rows: Vec<Row> = app
                .draft
                .iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.title.clone()),
                        Cell::from(t.reminder_clock().unwrap_or_default()),
                        Cell::from(if t.completed { "Done" } else { "Pending" }),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Min(20),
                Constraint::Length(10),
                Constraint::Length(8),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["Title", "Reminder", "Status"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Daylist - Daily Tasks (unsaved)"))
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.settings_state);
        }
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | a: Add | Space: Done | d: Del | J/K: Move Down/Up | s: Daily Settings | x: Dismiss",
            ViewMode::Settings => "a: Add | d: Remove | r: Reset All | Enter: Save | Esc: Discard | x: Dismiss",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match (&app.view_mode, app.add_state.step) {
            (ViewMode::Settings, 0) => "Add Daily Task: Enter Title",
            (ViewMode::Settings, _) => "Add Daily Task: Reminder HH:MM (Optional)",
            (ViewMode::Tasks, 0) => "Add Task: Enter Title",
            (ViewMode::Tasks, 1) => "Add Task: Repeat Daily? (y/N)",
            (ViewMode::Tasks, _) => "Add Task: Reminder HH:MM (Optional)",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }

    render_banners(f, app.ctx.banners().banners());
}

/// Stacks banners in the top-right corner, oldest first.
fn render_banners(f: &mut Frame, banners: &[Banner]) {
    let area = f.area();
    if area.width < BANNER_WIDTH || area.height < BANNER_HEIGHT {
        return;
    }
    let x = area.x + area.width - BANNER_WIDTH;
    for (i, b) in banners.iter().enumerate() {
        let y = area.y + 1 + i as u16 * BANNER_HEIGHT;
        if y + BANNER_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, BANNER_WIDTH, BANNER_HEIGHT);
        let color = banner_color(b.kind);
        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} {}", b.kind.icon(), b.title),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(b.message.as_str()),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        f.render_widget(Clear, rect);
        f.render_widget(body, rect);
    }
}

fn banner_color(kind: BannerKind) -> Color {
    match kind {
        BannerKind::Success => Color::Green,
        BannerKind::Warning => Color::Yellow,
        BannerKind::Reminder => Color::Magenta,
        BannerKind::Info => Color::Blue,
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
