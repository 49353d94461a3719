use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::store::{JOBS_FILE, PROGRESS_FILE};

#[derive(Parser, Debug)]
#[command(name = "nomos", version, about = "Learning bars and job timers in your terminal")]
pub struct Cli {
    /// Directory holding progress_bars.json and jobs.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Log file (defaults to nomos.log inside the data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Delete the saved progress bars and jobs, then exit
    #[arg(long)]
    pub reset: bool,
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(50..))]
    pub tick_ms: u64,
}

/// Resolved file locations for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub progress_file: PathBuf,
    pub jobs_file: PathBuf,
    pub log_file: PathBuf,
}

impl Paths {
    pub fn in_dir(data_dir: PathBuf) -> Self {
        Paths {
            progress_file: data_dir.join(PROGRESS_FILE),
            jobs_file: data_dir.join(JOBS_FILE),
            log_file: data_dir.join("nomos.log"),
            data_dir,
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("nomos"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Cli {
    pub fn paths(&self) -> Paths {
        let mut paths = Paths::in_dir(self.data_dir.clone().unwrap_or_else(default_data_dir));
        if let Some(log_file) = &self.log_file {
            paths.log_file = log_file.clone();
        }
        paths
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
