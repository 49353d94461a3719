use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::types::{App, EditField, Tab};

/// Handle one key press. Returns true when the application should quit.
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: DateTime<Utc>) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.commit_edit();
        return true;
    }
    if app.editor.is_some() {
        handle_editing_keys(app, key.code);
        false
    } else {
        handle_normal_keys(app, key.code, now)
    }
}

/// Key events while an inline text box is open
fn handle_editing_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => {
            if let Some(editor) = app.editor.as_mut() {
                editor.buffer.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(editor) = app.editor.as_mut() {
                editor.buffer.pop();
            }
        }
        // Enter confirms; leaving the box any other way is a focus loss,
        // which commits as well.
        KeyCode::Enter | KeyCode::Esc => app.commit_edit(),
        KeyCode::Tab | KeyCode::BackTab => app.switch_tab(),
        KeyCode::Up => {
            app.commit_edit();
            app.select_previous();
        }
        KeyCode::Down => {
            app.commit_edit();
            app.select_next();
        }
        _ => {}
    }
}

fn handle_normal_keys(app: &mut App, key: KeyCode, now: DateTime<Utc>) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Tab | KeyCode::BackTab => app.switch_tab(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('a') => app.add(now),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(now),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('e') => {
            let field = match app.tab {
                Tab::Learning => EditField::ProgressTitle,
                Tab::Jobs => EditField::JobTitle,
            };
            app.begin_edit(field);
        }
        KeyCode::Char('r') if app.tab == Tab::Jobs => app.begin_edit(EditField::JobRate),
        KeyCode::Char('s') => {
            if app.save_all(now) {
                app.notify("✅ Saved");
            }
        }
        KeyCode::Esc => {
            app.notification = None;
            app.notification_time = None;
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Paths;
    use crate::jobs::JobBoard;
    use crate::learning::ProgressBoard;
    use crate::money::Money;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 0).unwrap()
    }

    fn press(app: &mut App, code: KeyCode, now: DateTime<Utc>) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE), now)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), t0());
        }
    }

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::new(
            Paths::in_dir(dir.path().to_path_buf()),
            ProgressBoard::new(),
            JobBoard::new(),
        )
    }

    #[test]
    fn add_toggle_and_rename_progress_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('a'), t0());
        press(&mut app, KeyCode::Enter, t0());
        assert!(app.progress.get(0).unwrap().is_running());

        press(&mut app, KeyCode::Char('e'), t0());
        for _ in 0.."Progress".len() {
            press(&mut app, KeyCode::Backspace, t0());
        }
        // 'q' while editing is text, not quit.
        assert!(!press(&mut app, KeyCode::Char('q'), t0()));
        type_text(&mut app, "uran");
        press(&mut app, KeyCode::Enter, t0());
        assert_eq!(app.progress.get(0).unwrap().title, "quran");

        app.tick(t0() + Duration::seconds(5));
        press(&mut app, KeyCode::Char(' '), t0() + Duration::seconds(5));
        let item = app.progress.get(0).unwrap();
        assert!(!item.is_running());
        assert_eq!(item.elapsed(), 5.0);
    }

    #[test]
    fn rate_edit_through_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Tab, t0());
        press(&mut app, KeyCode::Char('a'), t0());

        press(&mut app, KeyCode::Char('r'), t0());
        app.editor.as_mut().unwrap().buffer.clear();
        type_text(&mut app, "40.00");
        press(&mut app, KeyCode::Enter, t0());
        assert_eq!(app.jobs.get(0).unwrap().rate, Money::from_cents(4000));

        // Esc is a focus loss: the bad value is discarded, the good one kept.
        press(&mut app, KeyCode::Char('r'), t0());
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Esc, t0());
        assert!(app.editor.is_none());
        assert_eq!(app.jobs.get(0).unwrap().rate, Money::from_cents(4000));
    }

    #[test]
    fn rate_key_does_nothing_on_learning_tab() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Char('a'), t0());
        press(&mut app, KeyCode::Char('r'), t0());
        assert!(app.editor.is_none());
    }

    #[test]
    fn quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert!(press(&mut app, KeyCode::Char('q'), t0()));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key_event(&mut app, ctrl_c, t0()));
    }

    #[test]
    fn delete_key_removes_selected_job() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Tab, t0());
        press(&mut app, KeyCode::Char('a'), t0());
        press(&mut app, KeyCode::Char('a'), t0());
        press(&mut app, KeyCode::Up, t0());
        press(&mut app, KeyCode::Char('d'), t0());
        assert_eq!(app.jobs.len(), 1);
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn save_key_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Char('a'), t0());
        press(&mut app, KeyCode::Char('s'), t0());
        assert!(app.paths.progress_file.exists());
        assert!(app.paths.jobs_file.exists());
        assert_eq!(app.notification.as_deref(), Some("✅ Saved"));
    }
}
