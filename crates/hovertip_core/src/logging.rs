//! Tracing setup for the scheduler and the app hosting it.
//!
//! Scheduler events are split over two targets so the per-wake chatter of
//! the waiter can be turned up without flooding the log with everything else:
//! - [`SCHEDULER_TARGET`]: arm, cancel, show and clear transitions
//! - [`WAITER_TARGET`]: waiter spawn, sleep, recheck and exit
//!
//! Directive precedence is explicit directives, then `HOVERTIP_LOG`, then
//! `RUST_LOG`, then the composed default. Unparseable values fall through
//! to the next source.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Target of scheduler state transitions.
pub const SCHEDULER_TARGET: &str = "hovertip::scheduler";

/// Target of waiter lifecycle events. Silent below `info` unless opted in.
pub const WAITER_TARGET: &str = "hovertip::waiter";

/// Environment variable holding filter directives.
pub const ENV_LOG: &str = "HOVERTIP_LOG";

/// Log file name prefix inside the log directory.
const FILE_PREFIX: &str = "hovertip";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// Colored lines on stdout only.
    Terminal,
    /// Daily-rotated files in `dir`, with `info` and above mirrored to stdout.
    Files {
        /// Directory holding the rotated files.
        dir: PathBuf,
    },
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output destination.
    pub output: LogOutput,
    /// Log every waiter wake at `trace`.
    pub trace_waiter: bool,
    /// Directives that override both environment variables.
    pub directives: Option<String>,
}

impl LogConfig {
    /// Terminal output when stdout is a TTY, rolling files in `log_dir` otherwise.
    pub fn detect(log_dir: PathBuf) -> Self {
        let output = if atty::is(atty::Stream::Stdout) {
            LogOutput::Terminal
        } else {
            LogOutput::Files { dir: log_dir }
        };
        Self { output, trace_waiter: false, directives: None }
    }

    /// Log every waiter wake.
    pub fn with_waiter_tracing(mut self) -> Self {
        self.trace_waiter = true;
        self
    }

    /// Use `directives` regardless of the environment.
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    /// Directives built from this config alone.
    pub fn default_directives(&self) -> String {
        let (app, scheduler) =
            if cfg!(debug_assertions) { ("debug", "debug") } else { ("info", "warn") };
        let waiter = if self.trace_waiter { "trace" } else { "info" };
        format!(
            "warn,hovertip={app},hovertip_ui={app},hovertip_core={app},\
             {SCHEDULER_TARGET}={scheduler},{WAITER_TARGET}={waiter}"
        )
    }

    /// Resolve the effective directives, reading variables through `lookup`.
    pub fn resolve_directives<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let candidates = [self.directives.clone(), lookup(ENV_LOG), lookup("RUST_LOG")];
        candidates
            .into_iter()
            .flatten()
            .find(|directives| EnvFilter::try_new(directives).is_ok())
            .unwrap_or_else(|| self.default_directives())
    }

    fn env_filter(&self) -> EnvFilter {
        let directives = self.resolve_directives(|key| std::env::var(key).ok());
        EnvFilter::try_new(&directives)
            .unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }
}

/// Guard that must be held for the lifetime of the application.
///
/// Dropping this guard flushes pending log entries.
pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// Falls back to terminal output if the log directory cannot be used.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let dir = match &config.output {
        LogOutput::Terminal => return init_terminal(&config),
        LogOutput::Files { dir } => dir,
    };

    match init_files(&config, dir) {
        Ok(guard) => LoggingGuard { _worker_guard: Some(guard) },
        Err(e) => {
            eprintln!("Warning: cannot log to {}: {}. Using stdout only.", dir.display(), e);
            init_terminal(&config)
        }
    }
}

fn init_terminal(config: &LogConfig) -> LoggingGuard {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_ansi(true)
        .with_target(true)
        .init();

    LoggingGuard { _worker_guard: None }
}

fn init_files(config: &LogConfig, dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)?;

    // Waiter threads must never block on log I/O
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let writer = std::io::stdout.with_max_level(tracing::Level::INFO).and(non_blocking);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(config.env_filter())
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .init();

    Ok(guard)
}

/// Default log directory inside the data directory.
pub fn log_dir() -> PathBuf {
    crate::state::default_data_dir().join("logs")
}
