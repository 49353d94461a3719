use chrono::{DateTime, Utc};
use tracing::debug;

use crate::money::Money;
use crate::stopwatch::Stopwatch;

pub const DEFAULT_TITLE: &str = "Job";

#[derive(Debug, Clone, PartialEq)]
pub struct JobItem {
    pub title: String,
    pub stopwatch: Stopwatch,
    pub rate: Money,
    earnings: Money,
}

impl JobItem {
    pub fn new(title: impl Into<String>, elapsed: f64, rate: Money, now: DateTime<Utc>) -> Self {
        let mut job = JobItem {
            title: title.into(),
            stopwatch: Stopwatch::new(elapsed, now),
            rate,
            earnings: Money::ZERO,
        };
        job.recompute_earnings();
        job
    }

    pub fn earnings(&self) -> Money {
        self.earnings
    }

    pub fn elapsed(&self) -> f64 {
        self.stopwatch.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    /// Label for the action column.
    pub fn action_label(&self) -> &'static str {
        if self.is_running() { "Pause" } else { "Start" }
    }

    fn recompute_earnings(&mut self) {
        self.earnings = self.rate.prorate(self.stopwatch.elapsed());
    }

    fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        let changed = self.stopwatch.tick(now);
        self.recompute_earnings();
        changed
    }
}

/// Outcome of committing a rate edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateEdit {
    Applied(Money),
    Rejected,
}

/// The ordered table behind the "Jobs" tab.
#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    rows: Vec<JobItem>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[JobItem] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&JobItem> {
        self.rows.get(index)
    }

    pub fn push(&mut self, job: JobItem) -> usize {
        self.rows.push(job);
        self.rows.len() - 1
    }

    /// Appends a stopped row with default title and zero rate.
    pub fn add(&mut self, now: DateTime<Utc>) -> usize {
        let index = self.push(JobItem::new(DEFAULT_TITLE, 0.0, Money::ZERO, now));
        debug!(count = self.rows.len(), "job row added");
        index
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(job) => {
                job.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Applies a user-typed rate. Malformed text leaves the row untouched.
    pub fn set_rate(&mut self, index: usize, input: &str) -> RateEdit {
        let Some(job) = self.rows.get_mut(index) else {
            return RateEdit::Rejected;
        };
        match Money::parse_rate(input) {
            Some(rate) => {
                job.rate = rate;
                job.recompute_earnings();
                RateEdit::Applied(rate)
            }
            None => {
                debug!(index, input, "rate edit rejected");
                RateEdit::Rejected
            }
        }
    }

    pub fn toggle(&mut self, index: usize, now: DateTime<Utc>) -> Option<bool> {
        let job = self.rows.get_mut(index)?;
        job.stopwatch.toggle(now);
        job.refresh(now);
        debug!(index, running = job.is_running(), "job toggled");
        Some(job.is_running())
    }

    pub fn delete(&mut self, index: usize) -> Option<JobItem> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }

    /// One scheduler pass: advances every running row and its earnings.
    pub fn tick(&mut self, now: DateTime<Utc>) -> usize {
        self.rows
            .iter_mut()
            .filter(|job| job.is_running())
            .map(|job| job.refresh(now))
            .filter(|changed| *changed)
            .count()
    }

    /// Brings running timers up to date before a save on exit.
    pub fn settle(&mut self, now: DateTime<Utc>) {
        self.tick(now);
    }

    pub fn total_earnings(&self) -> Money {
        let cents = self
            .rows
            .iter()
            .fold(0u64, |acc, job| acc.saturating_add(job.earnings().cents()));
        Money::from_cents(cents)
    }
}
