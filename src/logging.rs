use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of rotated log files
pub const LOG_PREFIX: &str = "svg-icon-components";

/// Default filter directive when `RUST_LOG` is not set.
///
/// Diagnostics stay quiet unless asked for; the summary is printed separately.
pub fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Setup logging to stderr, plus a daily rotating JSON log file when `log_dir` is given.
///
/// `RUST_LOG` overrides the level chosen from `verbose`.
///
/// # Returns
/// Guards that must be held for the duration of the program to keep logging active
pub fn setup_logging(verbose: bool, log_dir: Option<&Utf8Path>) -> Result<Vec<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    let mut guards = Vec::new();

    let (stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    guards.push(stderr_guard);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(stderr)
        .with_ansi(true)
        .with_target(false);

    let file_layer = match log_dir {
        Some(dir) => {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory: {}", dir))?;
            }

            let file_appender = rolling::daily(dir, LOG_PREFIX);
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guards.push(file_guard);

            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging initialized: verbose={}, log_dir={:?}",
        verbose,
        log_dir
    );

    Ok(guards)
}
