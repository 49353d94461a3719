use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Paths;
use crate::jobs::{JobBoard, RateEdit};
use crate::learning::ProgressBoard;
use crate::store;

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Learning,
    Jobs,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Learning, Tab::Jobs];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Learning => "Learning",
            Tab::Jobs => "Jobs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Learning => 0,
            Tab::Jobs => 1,
        }
    }

    pub fn next(self) -> Tab {
        match self {
            Tab::Learning => Tab::Jobs,
            Tab::Jobs => Tab::Learning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    ProgressTitle,
    JobTitle,
    JobRate,
}

/// An open inline text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub field: EditField,
    pub index: usize,
    pub buffer: String,
}

pub struct App {
    pub paths: Paths,
    pub progress: ProgressBoard,
    pub jobs: JobBoard,
    pub tab: Tab,
    pub selected_progress: usize,
    pub selected_job: usize,
    pub editor: Option<Editor>,
    pub notification: Option<String>,
    pub notification_time: Option<Instant>,
}

impl App {
    pub fn new(paths: Paths, progress: ProgressBoard, jobs: JobBoard) -> Self {
        App {
            paths,
            progress,
            jobs,
            tab: Tab::Learning,
            selected_progress: 0,
            selected_job: 0,
            editor: None,
            notification: None,
            notification_time: None,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
        self.notification_time = Some(Instant::now());
    }

    pub fn expire_notification(&mut self) {
        if let Some(time) = self.notification_time {
            if time.elapsed() > NOTIFICATION_TTL {
                self.notification = None;
                self.notification_time = None;
            }
        }
    }

    // --- Persistence ---

    pub fn save_progress(&mut self) -> bool {
        match store::save_progress(&self.paths.progress_file, &self.progress) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "saving progress bars failed");
                self.notify(format!("❌ {e}"));
                false
            }
        }
    }

    pub fn save_jobs(&mut self) -> bool {
        match store::save_jobs(&self.paths.jobs_file, &self.jobs) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "saving jobs failed");
                self.notify(format!("❌ {e}"));
                false
            }
        }
    }

    /// Settles running job timers and writes both files.
    pub fn save_all(&mut self, now: DateTime<Utc>) -> bool {
        self.progress.tick(now);
        self.jobs.settle(now);
        let progress_ok = self.save_progress();
        let jobs_ok = self.save_jobs();
        progress_ok && jobs_ok
    }

    /// Window close: an open editor counts as a focus loss, then both
    /// boards are settled and written.
    pub fn shutdown(&mut self, now: DateTime<Utc>) -> bool {
        self.commit_edit();
        self.save_all(now)
    }

    // --- Scheduler ---

    /// The single periodic pass over both boards. Nothing is persisted here.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.progress.tick(now);
        self.jobs.tick(now);
        self.expire_notification();
    }

    // --- Selection ---

    fn current_len(&self) -> usize {
        match self.tab {
            Tab::Learning => self.progress.len(),
            Tab::Jobs => self.jobs.len(),
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.tab {
            Tab::Learning => &mut self.selected_progress,
            Tab::Jobs => &mut self.selected_job,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        let index = match self.tab {
            Tab::Learning => self.selected_progress,
            Tab::Jobs => self.selected_job,
        };
        (index < self.current_len()).then_some(index)
    }

    pub fn select_next(&mut self) {
        let len = self.current_len();
        let selected = self.selected_mut();
        if len > 0 && *selected + 1 < len {
            *selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        let selected = self.selected_mut();
        *selected = selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.current_len();
        let selected = self.selected_mut();
        if *selected >= len {
            *selected = len.saturating_sub(1);
        }
    }

    pub fn switch_tab(&mut self) {
        self.commit_edit();
        self.tab = self.tab.next();
    }

    // --- Operations on the active tab ---

    pub fn add(&mut self, now: DateTime<Utc>) {
        match self.tab {
            Tab::Learning => {
                self.selected_progress = self.progress.add_default(now);
            }
            Tab::Jobs => {
                self.selected_job = self.jobs.add(now);
                self.save_jobs();
            }
        }
    }

    pub fn toggle_selected(&mut self, now: DateTime<Utc>) {
        let Some(index) = self.selected() else {
            return;
        };
        match self.tab {
            Tab::Learning => {
                self.progress.toggle(index, now);
            }
            Tab::Jobs => {
                self.jobs.toggle(index, now);
            }
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(index) = self.selected() else {
            return;
        };
        match self.tab {
            Tab::Learning => {
                if let Some(item) = self.progress.delete(index) {
                    info!(title = %item.title, "progress item deleted");
                }
            }
            Tab::Jobs => {
                if let Some(job) = self.jobs.delete(index) {
                    info!(title = %job.title, "job deleted");
                    self.save_jobs();
                }
            }
        }
        self.clamp_selection();
    }

    // --- Inline editing ---

    pub fn begin_edit(&mut self, field: EditField) {
        self.commit_edit();
        let Some(index) = self.selected() else {
            return;
        };
        let buffer = match (self.tab, field) {
            (Tab::Learning, EditField::ProgressTitle) => self.progress.get(index).map(|i| i.title.clone()),
            (Tab::Jobs, EditField::JobTitle) => self.jobs.get(index).map(|j| j.title.clone()),
            (Tab::Jobs, EditField::JobRate) => self.jobs.get(index).map(|j| j.rate.to_input()),
            _ => None,
        };
        if let Some(buffer) = buffer {
            self.editor = Some(Editor { field, index, buffer });
        }
    }

    /// Closes the editor and applies its text. Used for both confirm and
    /// focus loss. A malformed rate is dropped without a message.
    pub fn commit_edit(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        match editor.field {
            EditField::ProgressTitle => {
                self.progress.rename(editor.index, editor.buffer);
            }
            EditField::JobTitle => {
                if self.jobs.rename(editor.index, editor.buffer) {
                    self.save_jobs();
                }
            }
            EditField::JobRate => {
                if let RateEdit::Applied(_) = self.jobs.set_rate(editor.index, &editor.buffer) {
                    self.save_jobs();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 7, 30, 0).unwrap()
    }

    fn app_in(dir: &tempfile::TempDir) -> App {
        App::new(
            Paths::in_dir(dir.path().to_path_buf()),
            ProgressBoard::new(),
            JobBoard::new(),
        )
    }

    #[test]
    fn job_mutations_save_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.tab = Tab::Jobs;

        app.add(t0());
        assert_eq!(store::load_jobs(&app.paths.jobs_file, t0()).unwrap().len(), 1);

        app.begin_edit(EditField::JobRate);
        app.editor.as_mut().unwrap().buffer = "12.50".to_string();
        app.commit_edit();
        let saved = store::load_jobs(&app.paths.jobs_file, t0()).unwrap();
        assert_eq!(saved.get(0).unwrap().rate, Money::from_cents(1250));

        app.delete_selected();
        assert!(store::load_jobs(&app.paths.jobs_file, t0()).unwrap().is_empty());
    }

    #[test]
    fn malformed_rate_edit_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.tab = Tab::Jobs;
        app.add(t0());
        app.begin_edit(EditField::JobRate);
        app.editor.as_mut().unwrap().buffer = "12.5".to_string();
        app.commit_edit();

        assert!(app.editor.is_none());
        assert!(app.notification.is_none());
        assert_eq!(app.jobs.get(0).unwrap().rate, Money::ZERO);
    }

    #[test]
    fn progress_edits_wait_for_explicit_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(t0());
        assert!(!app.paths.progress_file.exists());

        app.begin_edit(EditField::ProgressTitle);
        app.editor.as_mut().unwrap().buffer = "Guitar".to_string();
        // Switching tabs is a focus loss and commits the edit.
        app.switch_tab();
        assert_eq!(app.progress.get(0).unwrap().title, "Guitar");
        assert_eq!(app.tab, Tab::Jobs);

        assert!(app.save_all(t0()));
        let saved = store::load_progress(&app.paths.progress_file, t0()).unwrap();
        assert_eq!(saved.get(0).unwrap().title, "Guitar");
    }

    #[test]
    fn selection_is_clamped_after_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(t0());
        app.add(t0());
        assert_eq!(app.selected(), Some(1));
        app.delete_selected();
        assert_eq!(app.selected(), Some(0));
        app.delete_selected();
        assert_eq!(app.selected(), None);
        app.select_next();
        app.select_previous();
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn editing_wrong_field_for_tab_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(t0());
        app.begin_edit(EditField::JobRate);
        assert!(app.editor.is_none());
    }

    #[test]
    fn shutdown_commits_open_edit_and_settles_timers() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.add(t0());
        app.toggle_selected(t0());
        app.begin_edit(EditField::ProgressTitle);
        app.editor.as_mut().unwrap().buffer = "Piano".to_string();

        assert!(app.shutdown(t0() + chrono::Duration::seconds(90)));
        assert!(app.editor.is_none());
        let saved = store::load_progress(&app.paths.progress_file, t0()).unwrap();
        let item = saved.get(0).unwrap();
        assert_eq!(item.title, "Piano");
        assert_eq!(item.elapsed(), 90.0);
    }

    #[test]
    fn save_failure_is_reported_in_status() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // The data dir is a regular file, so no save can succeed.
        let mut app = App::new(Paths::in_dir(blocker), ProgressBoard::new(), JobBoard::new());
        assert!(!app.save_all(t0()));
        assert!(app.notification.as_deref().unwrap().starts_with("❌"));
    }
}
