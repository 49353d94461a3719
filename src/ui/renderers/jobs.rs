use ratatui::{
    widgets::{Block, Borders, Paragraph, Table, Row, Cell, TableState},
    layout::{Constraint, Rect},
    style::{Style, Color, Modifier},
    Frame
};
use crate::format::format_elapsed_short;
use crate::types::App;

/// Render the "Jobs" tab
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let title = format!("Jobs | total {}", app.jobs.total_earnings());

    if app.jobs.is_empty() {
        let hint = Paragraph::new("No jobs yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(hint, area);
        return;
    }

    let header_cells: Vec<_> = ["Title", "Time", "Value", "Earnings p/h", "Action"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        .collect();
    let header = Row::new(header_cells);

    let rows = app.jobs.rows().iter().map(|job| {
        let action_style = if job.is_running() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Magenta)
        };
        Row::new(vec![
            Cell::from(job.title.clone()),
            Cell::from(format_elapsed_short(job.elapsed())),
            Cell::from(job.earnings().to_string()),
            Cell::from(job.rate.to_string()),
            Cell::from(job.action_label()).style(action_style),
        ])
    });

    let widths = [
        Constraint::Percentage(25), // Title
        Constraint::Percentage(25), // Time
        Constraint::Percentage(17), // Value
        Constraint::Percentage(18), // Earnings p/h
        Constraint::Percentage(15), // Action
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !app.jobs.is_empty() {
        table_state.select(Some(app.selected_job.min(app.jobs.len() - 1)));
    }

    f.render_stateful_widget(table, area, &mut table_state);
}

#[cfg(test)]
mod tests {
    use crate::config::Paths;
    use crate::jobs::{JobBoard, JobItem};
    use crate::learning::ProgressBoard;
    use crate::money::Money;
    use crate::types::{App, Tab};
    use crate::ui::render_to_string;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn shows_row_values_and_action() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut jobs = JobBoard::new();
        jobs.push(JobItem::new("Website", 3600.0, Money::from_cents(1000), now));
        jobs.push(JobItem::new("Support", 0.0, Money::ZERO, now));
        jobs.toggle(1, now);
        jobs.tick(now + Duration::seconds(65));

        let mut app = App::new(Paths::in_dir(".".into()), ProgressBoard::new(), jobs);
        app.tab = Tab::Jobs;
        let screen = render_to_string(&app, 110, 24);

        assert!(screen.contains("Earnings p/h"));
        assert!(screen.contains("Website"));
        assert!(screen.contains("0d 1h 0m 0s"));
        assert!(screen.contains("$ 10.00"));
        assert!(screen.contains("0d 0h 1m 5s"));
        assert!(screen.contains("Start"));
        assert!(screen.contains("Pause"));
        assert!(screen.contains("total $ 10.00"));
    }
}
