/// File-only tracing setup. The terminal belongs to the game, so nothing
/// is ever written to stdout or stderr while it runs.
///
/// Directory: `[log] dir` if set, else `~/.local/share/mines/logs`, else
/// the system temp dir. Filter: `RUST_LOG` if set, else `[log] level`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LogConfig};

pub const LOG_FILE: &str = "mines.log";

fn log_dir(cfg: &LogConfig) -> PathBuf {
    cfg.dir
        .clone()
        .or_else(|| config::data_dir().map(|d| d.join("logs")))
        .unwrap_or_else(std::env::temp_dir)
}

fn filter(cfg: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(cfg: &LogConfig) -> Result<WorkerGuard> {
    let dir = log_dir(cfg);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter(cfg))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}
