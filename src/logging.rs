//! Process-wide tracing setup for the server and the command line helper.
//!
//! The server prints compact events to stdout and mirrors them, without colours, to a log file
//! so a restarted process keeps its history. The CLI only reports warnings on stderr, which
//! leaves stdout free for extracted text and summaries.
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_VAR: &str = "RUSTYSUM_LOG_FILE";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "rustysum.log";

// Dropping the guard stops the background writer, so it lives as long as the process.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where the server mirrors its log events.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    /// File named by `RUSTYSUM_LOG_FILE`, opened for append.
    Explicit(PathBuf),
    /// `logs/rustysum.log` under the working directory.
    Default,
}

impl LogTarget {
    fn from_setting(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Self::Explicit(PathBuf::from(path)),
            _ => Self::Default,
        }
    }
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the server subscriber: `RUST_LOG` filtering (default `info`), stdout, and the log
/// file when it can be opened.
pub fn init_tracing() {
    let registry = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt::layer().with_target(false).compact());

    match open_log_file(LogTarget::from_setting(std::env::var(LOG_FILE_VAR).ok())) {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        None => registry.init(),
    }
}

/// Install a stderr-only subscriber for the command line helper (default `warn`).
pub fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// File logging is optional: failures are reported on stderr and the server runs stdout-only.
fn open_log_file(target: LogTarget) -> Option<NonBlocking> {
    let (writer, guard) = match target {
        LogTarget::Explicit(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| eprintln!("Failed to open log file {}: {err}", path.display()))
                .ok()?;
            tracing_appender::non_blocking(file)
        }
        LogTarget::Default => {
            if let Err(err) = std::fs::create_dir_all(DEFAULT_LOG_DIR) {
                eprintln!("Failed to create {DEFAULT_LOG_DIR} directory: {err}");
                return None;
            }
            tracing_appender::non_blocking(tracing_appender::rolling::never(
                DEFAULT_LOG_DIR,
                DEFAULT_LOG_FILE,
            ))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}

#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory sink for asserting on emitted events.
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        /// Plain-text subscriber writing every level into this buffer.
        pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
            let sink = self.clone();
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_ansi(false)
                .with_writer(move || sink.clone())
                .finish()
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
