mod types;
mod config;
mod error;
mod format;
mod jobs;
mod learning;
mod logging;
mod money;
mod stopwatch;
mod store;
mod ui;

use clap::Parser;
use chrono::Utc;
use std::process::exit;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::thread;
use tracing::{error, info, warn};

use config::Cli;
use types::App;
use ui::terminal::Tui;

/// Drives the UI: one periodic tick for every timer, plus key presses
/// forwarded from a blocking reader thread. All state changes happen here.
async fn run(app: &mut App, terminal: &mut Tui, tick_rate: Duration) -> Result<(), io::Error> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.blocking_send(ev).is_err() {
                    // Receiver gone; the UI loop has exited
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "terminal input closed");
                break;
            }
        }
    });

    let mut ticker = tokio::time::interval(tick_rate);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ui::render_ui(app, terminal)?;

        tokio::select! {
            _ = ticker.tick() => {
                app.tick(Utc::now());
            }
            received = rx.recv() => match received {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if ui::input::handle_key_event(app, key, Utc::now()) {
                        break; // Exit condition
                    }
                }
                // Resize and other events only need a redraw
                Some(_) => {}
                None => break,
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    let cli = Cli::parse();
    let paths = cli.paths();

    // Handle reset flag first
    if cli.reset {
        match store::reset(&paths.data_dir) {
            Ok(removed) if removed.is_empty() => {
                println!("ℹ️  No saved progress bars or jobs found in {}", paths.data_dir.display());
            }
            Ok(removed) => {
                for path in removed {
                    println!("✅ Removed {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("❌ Error resetting saved data: {}", e);
                exit(1);
            }
        }
        return Ok(());
    }

    if let Err(e) = logging::init(&paths.log_file) {
        eprintln!("⚠️  Logging disabled: could not open {}: {}", paths.log_file.display(), e);
    }
    info!(data_dir = %paths.data_dir.display(), "starting nomos");

    let now = Utc::now();
    let progress = match store::load_progress(&paths.progress_file, now) {
        Ok(board) => board,
        Err(e) => {
            error!(error = %e, "could not load progress bars");
            eprintln!("❌ {}", e);
            exit(1);
        }
    };
    let jobs = match store::load_jobs(&paths.jobs_file, now) {
        Ok(board) => board,
        Err(e) => {
            error!(error = %e, "could not load jobs");
            eprintln!("❌ {}", e);
            exit(1);
        }
    };

    let mut app = App::new(paths, progress, jobs);
    ui::install_panic_hook();
    let mut terminal = ui::setup_terminal()?;
    let result = run(&mut app, &mut terminal, cli.tick_rate()).await;
    let restored = ui::restore_terminal(&mut terminal);
    if let Err(e) = &restored {
        warn!(error = %e, "could not restore terminal");
    }

    // Window-close save runs even when the terminal could not be restored
    if !app.shutdown(Utc::now()) {
        if let Some(msg) = &app.notification {
            eprintln!("{}", msg);
        }
        exit(1);
    }
    info!("saved and exiting");
    restored?;
    result
}
