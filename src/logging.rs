//! `env_logger` setup.
//!
//! One-shot commands log to stderr. The TUI draws on the terminal, so while it
//! runs log lines are appended to a file instead.

use std::fs::OpenOptions;
use std::path::Path;

use crate::error::AppError;

pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
pub fn init(target: LogTarget<'_>) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match target {
        LogTarget::Stderr => {
            builder.target(env_logger::Target::Stderr);
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::config(format!("Failed to open log file '{}': {e}", path.display())))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }

    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
    Ok(())
}
