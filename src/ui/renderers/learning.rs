use ratatui::{
    widgets::{Block, Borders, Gauge, Paragraph},
    layout::{Layout, Constraint, Direction, Rect},
    style::{Style, Color, Modifier},
    text::{Line, Span},
    Frame
};
use crate::format::format_elapsed_long;
use crate::learning::ProgressItem;
use crate::types::App;

/// Each progress item takes two lines: title, bar and time; then level and action.
const ITEM_HEIGHT: u16 = 2;

/// Render the "Learning" tab
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Progress");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.progress.is_empty() {
        let hint = Paragraph::new("No progress bars yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, inner);
        return;
    }

    let visible = (inner.height / ITEM_HEIGHT).max(1) as usize;
    let selected = app.selected_progress.min(app.progress.len() - 1);
    let offset = (selected + 1).saturating_sub(visible);

    for (slot, (index, item)) in app
        .progress
        .items()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let row = Rect {
            x: inner.x,
            y: inner.y + slot as u16 * ITEM_HEIGHT,
            width: inner.width,
            height: ITEM_HEIGHT.min(inner.height.saturating_sub(slot as u16 * ITEM_HEIGHT)),
        };
        render_item(f, item, index == selected, row);
    }
}

fn render_item(f: &mut Frame, item: &ProgressItem, selected: bool, area: Rect) {
    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Title
            Constraint::Min(10),    // Bar
            Constraint::Length(20), // Time
        ])
        .split(lines[0]);

    let title_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };
    f.render_widget(
        Paragraph::new(format!("{marker}{}", item.title)).style(title_style),
        top[0],
    );

    let percent = item.percent();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(if item.is_running() { Color::Green } else { Color::Blue }))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{percent:.1}%"));
    f.render_widget(gauge, top[1]);

    f.render_widget(
        Paragraph::new(format!(" {}", format_elapsed_long(item.elapsed()))),
        top[2],
    );

    if lines.len() > 1 && lines[1].height > 0 {
        let action = if item.is_running() { "[Pause]" } else { "[Start]" };
        let bottom = Line::from(vec![
            Span::styled(format!("  Level {}", item.level), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(action, Style::default().fg(Color::Magenta)),
        ]);
        f.render_widget(Paragraph::new(bottom), lines[1]);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Paths;
    use crate::jobs::JobBoard;
    use crate::learning::ProgressBoard;
    use crate::types::App;
    use crate::ui::render_to_string;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn shows_title_time_level_and_action() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut progress = ProgressBoard::new();
        progress.add("Rust", true, 0.0, 0, now);
        progress.add("Piano", false, 90.0, 0, now);
        progress.tick(now + Duration::seconds(30_000));
        let app = App::new(Paths::in_dir(".".into()), progress, JobBoard::new());

        let screen = render_to_string(&app, 100, 24);
        assert!(screen.contains("> Rust"));
        assert!(screen.contains("Piano"));
        assert!(screen.contains("0d, 8h, 20m, 0s"));
        assert!(screen.contains("Level 1"));
        assert!(screen.contains("[Pause]"));
        assert!(screen.contains("[Start]"));
        assert!(screen.contains("4.2%"));
    }

    #[test]
    fn empty_board_shows_hint() {
        let app = App::new(Paths::in_dir(".".into()), ProgressBoard::new(), JobBoard::new());
        assert!(render_to_string(&app, 100, 24).contains("Press 'a' to add"));
    }

    #[test]
    fn keeps_selected_item_visible() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut progress = ProgressBoard::new();
        for i in 0..30 {
            progress.add(format!("Item {i:02}"), false, 0.0, 0, now);
        }
        let mut app = App::new(Paths::in_dir(".".into()), progress, JobBoard::new());
        app.selected_progress = 29;
        let screen = render_to_string(&app, 100, 24);
        assert!(screen.contains("> Item 29"));
        assert!(!screen.contains("Item 00"));
    }
}
