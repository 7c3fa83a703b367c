use std::{
    error::Error as StdError,
    fmt,
    fs::{self, OpenOptions},
    io::{self, Write},
    panic::Location,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Local};
use gmsfs_runtime::{APPEND_MODE, debug_marker_path, failure_log_name};

use crate::facade::set_create_mode;

/// One failed facade operation.
pub struct Failure<'a> {
    /// Operation label, e.g. `copy_file (open)`
    pub op: &'a str,
    pub path: &'a Path,
    pub error: &'a (dyn StdError + 'static),
    /// Call site that entered the facade. Only file, line and column are
    /// available; the calling function's name is not.
    pub caller: &'static Location<'static>,
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} path: {} stacktrace: {}:{}:{}",
            self.op,
            self.error,
            self.path.display(),
            self.caller.file(),
            self.caller.line(),
            self.caller.column()
        )
    }
}

/// Receives every failure the facade reports. Implementations must not fail
/// the operation that triggered them.
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: &Failure<'_>);
}

/// Discards failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FailureSink for NullSink {
    #[inline]
    fn record(&self, _failure: &Failure<'_>) {}
}

#[derive(Debug, Clone)]
pub struct DebugLogConfig {
    /// Directory receiving `GMSFS.<YYYYMMDD_HHMM>.log` files
    pub dir: PathBuf,
    /// When set, logging only happens while this file exists.
    /// Checked on every failure, never cached.
    pub marker: Option<PathBuf>,
}

impl Default for DebugLogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            marker: Some(debug_marker_path()),
        }
    }
}

/// Appends one line per failure to a per-minute log file.
#[derive(Debug, Clone)]
pub struct DebugLog {
    cfg: DebugLogConfig,
}

impl DebugLog {
    pub fn new(cfg: DebugLogConfig) -> Self {
        DebugLog { cfg }
    }

    /// Log into the working directory while `GMSFS.Debug` exists there.
    pub fn sentinel() -> Self {
        Self::new(DebugLogConfig::default())
    }

    /// Log into `dir` unconditionally.
    pub fn always(dir: impl Into<PathBuf>) -> Self {
        Self::new(DebugLogConfig {
            dir: dir.into(),
            marker: None,
        })
    }

    pub fn config(&self) -> &DebugLogConfig {
        &self.cfg
    }

    pub fn is_enabled(&self) -> bool {
        match &self.cfg.marker {
            None => true,
            // Only a definite "not found" disables logging.
            Some(marker) => !matches!(
                fs::metadata(marker),
                Err(e) if e.kind() == io::ErrorKind::NotFound
            ),
        }
    }

    pub fn log_path(&self, now: &DateTime<Local>) -> PathBuf {
        self.cfg.dir.join(failure_log_name(now))
    }

    fn append_line(&self, line: &str) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        set_create_mode(&mut options, APPEND_MODE);
        let mut file = options.open(self.log_path(&Local::now()))?;

        file.write_all(line.as_bytes())
    }
}

impl FailureSink for DebugLog {
    fn record(&self, failure: &Failure<'_>) {
        if !self.is_enabled() {
            return;
        }

        // Best effort: a failing log write is dropped.
        let _ = self.append_line(&format!("{failure}\r\n"));
    }
}

/// Keeps rendered failures in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

impl FailureSink for RecordingSink {
    fn record(&self, failure: &Failure<'_>) {
        let line = failure.to_string();
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
