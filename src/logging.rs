use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Plain CLI commands: log to stderr.
    Stderr,
    /// Full-screen UI: log to a file so the terminal stays clean.
    File,
}

impl LogTarget {
    fn default_level(self) -> &'static str {
        match self {
            LogTarget::Stderr => "warn",
            LogTarget::File => "info",
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level`, which wins over the target's default.
/// Returns a guard that must stay alive for file logging to flush. Calling
/// this again after a subscriber is installed does nothing.
pub fn init(target: LogTarget, level: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or(target.default_level())))
        .unwrap_or_else(|_| EnvFilter::new(target.default_level()));

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init();
            None
        }
        LogTarget::File => {
            let dir = log_dir();
            if let Err(e) = std::fs::create_dir_all(&dir) {
                eprintln!("Failed to create log directory {:?}: {}", dir, e);
                return None;
            }
            let appender = tracing_appender::rolling::never(&dir, "deadlines.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .try_init();
            Some(guard)
        }
    }
}

/// `<local data dir>/deadlines`, falling back to the working directory.
pub fn log_dir() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("deadlines");
    p
}
