//! Logging setup
//!
//! The library only emits `tracing` events; the binary installs a subscriber
//! here. Output goes to stderr (stdout carries the results) or, on request, to
//! a session log file in the user's data directory.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// verbosity flags. Calling it twice is harmless.
pub fn init_logging(verbose: bool, debug: bool, log_to_file: bool) -> anyhow::Result<()> {
    let filter = if verbose || debug {
        "docmap=debug,info"
    } else {
        "docmap=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if log_to_file {
        let log_path = get_log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "\n=== docmap session started at {} ===\n", timestamp)?;

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .try_init();
        return Ok(());
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    Ok(())
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("docmap").join("docmap.log")
    } else {
        PathBuf::from("docmap.log")
    }
}
