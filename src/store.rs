//! Whole-file JSON persistence for both boards.
//!
//! Each save rewrites the full list. A missing file loads as an empty board.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::format::{format_elapsed_short, parse_elapsed_short};
use crate::jobs::{JobBoard, JobItem};
use crate::learning::ProgressBoard;
use crate::money::Money;

pub const PROGRESS_FILE: &str = "progress_bars.json";
pub const JOBS_FILE: &str = "jobs.json";

/// One entry of `progress_bars.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub title: String,
    pub value: f64,
    pub running: bool,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    pub level: Option<u64>,
}

/// One entry of `jobs.json`: title, elapsed, earnings, rate.
pub type JobRow = (String, String, String, String);

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn read_if_exists(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Writes through a sibling temp file so a failed write leaves the old file intact.
fn write_atomically(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(content)
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

pub fn progress_records(board: &ProgressBoard) -> Vec<ProgressRecord> {
    board
        .items()
        .iter()
        .map(|item| ProgressRecord {
            title: item.title.clone(),
            value: round2(item.percent()),
            running: item.is_running(),
            elapsed_time: Some(round2(item.elapsed())),
            level: Some(item.level),
        })
        .collect()
}

pub fn job_rows(board: &JobBoard) -> Vec<JobRow> {
    board
        .rows()
        .iter()
        .map(|job| {
            (
                job.title.clone(),
                format_elapsed_short(job.elapsed()),
                job.earnings().to_string(),
                job.rate.to_string(),
            )
        })
        .collect()
}

pub fn save_progress(path: &Path, board: &ProgressBoard) -> Result<(), StoreError> {
    let records = progress_records(board);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .map_err(|e| StoreError::json(path, e))?;
    write_atomically(path, &buf)?;
    info!(path = %path.display(), items = records.len(), "saved progress bars");
    Ok(())
}

pub fn load_progress(path: &Path, now: DateTime<Utc>) -> Result<ProgressBoard, StoreError> {
    let mut board = ProgressBoard::new();
    let Some(content) = read_if_exists(path)? else {
        info!(path = %path.display(), "no progress file, starting empty");
        return Ok(board);
    };
    let records: Vec<ProgressRecord> =
        serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
    for record in records {
        board.add(
            record.title,
            record.running,
            record.elapsed_time.unwrap_or(0.0),
            record.level.unwrap_or(0),
            now,
        );
    }
    info!(path = %path.display(), items = board.len(), "loaded progress bars");
    Ok(board)
}

pub fn save_jobs(path: &Path, board: &JobBoard) -> Result<(), StoreError> {
    let rows = job_rows(board);
    let content = serde_json::to_vec(&rows).map_err(|e| StoreError::json(path, e))?;
    write_atomically(path, &content)?;
    info!(path = %path.display(), rows = rows.len(), "saved jobs");
    Ok(())
}

/// A title like "42" may have been written as a bare number.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Running state is not persisted: every loaded row starts stopped.
pub fn load_jobs(path: &Path, now: DateTime<Utc>) -> Result<JobBoard, StoreError> {
    let mut board = JobBoard::new();
    let Some(content) = read_if_exists(path)? else {
        info!(path = %path.display(), "no jobs file, starting empty");
        return Ok(board);
    };
    // Older files carry a fifth "Start"/"Pause" column; anything past the
    // rate is ignored.
    let rows: Vec<Vec<serde_json::Value>> =
        serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
    for (index, row) in rows.iter().enumerate() {
        let [title, elapsed, _earnings, rate, ..] = row.as_slice() else {
            return Err(StoreError::ShortRow {
                index,
                len: row.len(),
            });
        };
        let elapsed = parse_elapsed_short(&cell_text(elapsed))? as f64;
        board.push(JobItem::new(
            cell_text(title),
            elapsed,
            Money::parse_display(&cell_text(rate)),
            now,
        ));
    }
    info!(path = %path.display(), rows = board.len(), "loaded jobs");
    Ok(board)
}

/// Removes both data files. Returns the ones that existed.
pub fn reset(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut removed = Vec::new();
    for name in [PROGRESS_FILE, JOBS_FILE] {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&path, e)),
        }
    }
    Ok(removed)
}
