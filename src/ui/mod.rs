pub mod terminal;
pub mod input;
pub mod renderers;

use std::io;
use ratatui::{
    backend::Backend,
    widgets::{Block, Borders, Paragraph, Tabs},
    layout::{Layout, Constraint, Direction, Rect},
    style::{Style, Color, Modifier},
    Frame, Terminal,
};
use crate::types::{App, EditField, Tab};

pub use terminal::{install_panic_hook, restore_terminal, setup_terminal};

/// Main UI rendering function: tab bar, the active tab, then editor/status and help.
pub fn render_ui<B: Backend>(app: &App, terminal: &mut Terminal<B>) -> Result<(), io::Error> {
    terminal.draw(|f| render(f, app))?;
    Ok(())
}

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Active tab
            Constraint::Length(3), // Editor or status
            Constraint::Length(3), // Key help
        ])
        .split(f.size());

    render_tabs(f, app, chunks[0]);
    match app.tab {
        Tab::Learning => renderers::learning::render(f, app, chunks[1]),
        Tab::Jobs => renderers::jobs::render(f, app, chunks[1]),
    }
    if app.editor.is_some() {
        render_editor(f, app, chunks[2]);
    } else {
        render_status(f, app, chunks[2]);
    }
    render_footer(f, app, chunks[3]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|tab| tab.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Nomos"))
        .select(app.tab.index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_editor(f: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = &app.editor else {
        return;
    };
    let title = match editor.field {
        EditField::ProgressTitle | EditField::JobTitle => "Title (Enter to confirm)",
        EditField::JobRate => "Hourly rate, e.g. 25 or 25.00 (Enter to confirm)",
    };
    let input = Paragraph::new(editor.buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
    f.set_cursor(area.x + editor.buffer.chars().count() as u16 + 1, area.y + 1);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.notification {
        Some(msg) if msg.starts_with("❌") => (msg.as_str(), Style::default().fg(Color::Red)),
        Some(msg) => (msg.as_str(), Style::default().fg(Color::Green)),
        None => ("", Style::default()),
    };
    let status = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.tab {
        Tab::Learning => "q: quit | Tab: switch | a: add | Enter: start/pause | e: title | d: delete | s: save",
        Tab::Jobs => "q: quit | Tab: switch | a: add | Enter: start/pause | e: title | r: rate | d: delete",
    };
    let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

#[cfg(test)]
pub(crate) fn render_to_string(app: &App, width: u16, height: u16) -> String {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    render_ui(app, &mut terminal).expect("draw");

    let mut out = String::new();
    let buffer = terminal.backend().buffer().clone();
    for y in 0..height {
        for x in 0..width {
            out.push_str(buffer.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}
