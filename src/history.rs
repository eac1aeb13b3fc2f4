//! Append-only session log, one CSV row per session.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::format::format_compact;
use crate::session::SessionSummary;

/// Row layout of the session log; field names double as the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub date: String,
    pub task: String,
    pub elapsed_seconds: String,
    pub dings: u64,
    pub interval_seconds: String,
}

impl From<&SessionSummary> for LogEntry {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            date: summary.ended_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            task: summary.task.clone().unwrap_or_default(),
            elapsed_seconds: format!("{:.1}", summary.elapsed),
            dings: summary.ding_count,
            interval_seconds: format_compact(summary.interval),
        }
    }
}

/// Persists finished sessions. Failures never reach the session loop.
pub trait SessionLog {
    fn record(&self, summary: &SessionSummary);
}

/// Used for `--no-log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl SessionLog for NullLog {
    fn record(&self, _summary: &SessionSummary) {}
}

#[derive(Debug, Clone)]
pub struct CsvSessionLog {
    path: PathBuf,
}

impl CsvSessionLog {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(entry).map_err(io::Error::other)?;
        writer.flush()
    }
}

impl SessionLog for CsvSessionLog {
    fn record(&self, summary: &SessionSummary) {
        if let Err(e) = self.append(&LogEntry::from(summary)) {
            tracing::debug!(path = %self.path.display(), error = %e, "session log write failed");
        }
    }
}
