use chrono::{DateTime, Utc};
use tracing::debug;

use crate::stopwatch::Stopwatch;

/// Length of one level: the bar fills once every eight hours of running time.
pub const CYCLE_SECS: f64 = 28_800.0;

pub const DEFAULT_TITLE: &str = "Progress";

/// Fill of the bar within the current cycle, in `[0, 100)`.
pub fn percent(elapsed: f64) -> f64 {
    (elapsed.max(0.0) % CYCLE_SECS) * 100.0 / CYCLE_SECS
}

/// Number of completed cycles.
pub fn level(elapsed: f64) -> u64 {
    (elapsed.max(0.0) / CYCLE_SECS).floor() as u64
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressItem {
    pub title: String,
    pub stopwatch: Stopwatch,
    pub level: u64,
}

impl ProgressItem {
    pub fn percent(&self) -> f64 {
        percent(self.stopwatch.elapsed())
    }

    pub fn elapsed(&self) -> f64 {
        self.stopwatch.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        let changed = self.stopwatch.tick(now);
        if changed {
            self.level = level(self.stopwatch.elapsed());
        }
        changed
    }
}

/// The ordered list behind the "Learning" tab.
#[derive(Debug, Clone, Default)]
pub struct ProgressBoard {
    items: Vec<ProgressItem>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ProgressItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProgressItem> {
        self.items.get(index)
    }

    /// Appends an item. A running item resumes from `elapsed` at `now`.
    ///
    /// `level` is kept as given until the first tick recomputes it, so a
    /// loaded item shows its saved level straight away.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        running: bool,
        elapsed: f64,
        level: u64,
        now: DateTime<Utc>,
    ) -> usize {
        let stopwatch = if running {
            Stopwatch::running(elapsed, now)
        } else {
            Stopwatch::new(elapsed, now)
        };
        self.items.push(ProgressItem {
            title: title.into(),
            stopwatch,
            level,
        });
        debug!(count = self.items.len(), "progress item added");
        self.items.len() - 1
    }

    pub fn add_default(&mut self, now: DateTime<Utc>) -> usize {
        self.add(DEFAULT_TITLE, false, 0.0, 0, now)
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Flips start/pause. Returns the new running state.
    pub fn toggle(&mut self, index: usize, now: DateTime<Utc>) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.stopwatch.toggle(now);
        item.refresh(now);
        debug!(index, running = item.is_running(), "progress item toggled");
        Some(item.is_running())
    }

    pub fn delete(&mut self, index: usize) -> Option<ProgressItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// One scheduler pass: advances every running item.
    pub fn tick(&mut self, now: DateTime<Utc>) -> usize {
        self.items
            .iter_mut()
            .filter(|item| item.is_running())
            .map(|item| item.refresh(now))
            .filter(|changed| *changed)
            .count()
    }
}
