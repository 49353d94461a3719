use chrono::{DateTime, Utc};

/// Accumulated running time for one progress item or job row.
///
/// `start_reference` is the instant the stopwatch would have been started at
/// had it run without pauses, so `now - start_reference` is the total elapsed
/// time while running.
#[derive(Debug, Clone, PartialEq)]
pub struct Stopwatch {
    running: bool,
    elapsed: f64,
    start_reference: DateTime<Utc>,
}

impl Stopwatch {
    pub fn new(elapsed: f64, now: DateTime<Utc>) -> Self {
        Stopwatch {
            running: false,
            elapsed: elapsed.max(0.0),
            start_reference: now,
        }
    }

    /// A stopwatch that resumes counting from `elapsed` at `now`.
    pub fn running(elapsed: f64, now: DateTime<Utc>) -> Self {
        let mut watch = Self::new(elapsed, now);
        watch.start(now);
        watch
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.running {
            return;
        }
        self.start_reference = now - seconds_to_duration(self.elapsed);
        self.running = true;
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if !self.running {
            return;
        }
        self.tick(now);
        self.running = false;
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.running {
            self.pause(now);
        } else {
            self.start(now);
        }
    }

    /// Brings `elapsed` up to date. Returns false when stopped or when the
    /// clock has not moved forward.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running {
            return false;
        }
        let measured = (now - self.start_reference).num_milliseconds() as f64 / 1000.0;
        // Elapsed never decreases, even if the wall clock steps back.
        if measured > self.elapsed {
            self.elapsed = measured;
            true
        } else {
            false
        }
    }
}

fn seconds_to_duration(seconds: f64) -> chrono::Duration {
    chrono::Duration::milliseconds((seconds * 1000.0).round() as i64)
}
