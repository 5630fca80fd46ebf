//! JSONL sink: append-only line-delimited JSON for maintenance events.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory
//! and written with a single `write_all` so a process tailing the file never
//! observes a partial line.
//!
//! Degradation chain:
//! 1. Primary file path
//! 2. stderr
//! 3. Silent discard (maintenance must never stop because logging failed)

#![allow(missing_docs)]

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::logger::MaintLogger;

/// Severity level for maintenance events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Event types emitted by the maintenance loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The loop started with its effective configuration.
    MaintainStart,
    /// Usage met or exceeded the threshold; cleanup is about to run.
    ThresholdExceeded,
    /// Cleanup finished and the volume was re-probed.
    SpaceCleaned,
    /// A cycle failed.
    Error,
}

/// A single structured log entry — all fields optional except `ts`, `event`,
/// `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Severity level.
    pub severity: Severity,
    /// Volume being maintained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    /// Configured usage threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Configured check interval in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    /// Volume size in whole megabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mb: Option<u64>,
    /// Used space in whole megabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_mb: Option<u64>,
    /// Megabyte-truncated used/total ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_ratio: Option<f64>,
    /// Megabytes freed by a cleanup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freed_mb: Option<u64>,
    /// DMN error code if the cycle failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
            severity,
            volume: None,
            threshold: None,
            interval_ms: None,
            total_mb: None,
            used_mb: None,
            used_ratio: None,
            freed_mb: None,
            error_code: None,
            error_message: None,
        }
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

struct WriterInner {
    state: WriterState,
    file: Option<BufWriter<File>>,
}

/// Append-only JSONL writer with graceful degradation.
pub struct JsonlWriter {
    path: PathBuf,
    inner: Mutex<WriterInner>,
}

impl JsonlWriter {
    /// Create a writer targeting `path`. The file is opened lazily on the
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(WriterInner {
                state: WriterState::Normal,
                file: None,
            }),
        }
    }

    /// Serialize and append one entry, degrading on failure.
    pub fn write_entry(&self, entry: &LogEntry) {
        let Ok(mut line) = serde_json::to_string(entry) else {
            return;
        };
        line.push('\n');

        let mut inner = self.inner.lock();
        loop {
            match inner.state {
                WriterState::Normal => {
                    if Self::append(&self.path, &mut inner.file, line.as_bytes()).is_ok() {
                        return;
                    }
                    inner.file = None;
                    inner.state = WriterState::Stderr;
                }
                WriterState::Stderr => {
                    let mut err = io::stderr().lock();
                    if err
                        .write_all(line.as_bytes())
                        .and_then(|()| err.flush())
                        .is_ok()
                    {
                        return;
                    }
                    inner.state = WriterState::Discard;
                }
                WriterState::Discard => return,
            }
        }
    }

    fn append(
        path: &Path,
        slot: &mut Option<BufWriter<File>>,
        line: &[u8],
    ) -> io::Result<()> {
        if slot.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            *slot = Some(BufWriter::new(file));
        }
        let Some(writer) = slot.as_mut() else {
            return Ok(());
        };
        writer.write_all(line)?;
        writer.flush()
    }
}

impl MaintLogger for JsonlWriter {
    fn log(&self, entry: &LogEntry) {
        self.write_entry(entry);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{EventType, JsonlWriter, LogEntry, Severity};

    #[test]
    fn entries_append_as_one_json_object_per_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("maintenance.jsonl");
        let writer = JsonlWriter::new(&path);

        writer.write_entry(&LogEntry {
            volume: Some("/".to_string()),
            threshold: Some(0.9),
            interval_ms: Some(600_000),
            ..LogEntry::new(EventType::MaintainStart, Severity::Info)
        });
        writer.write_entry(&LogEntry {
            total_mb: Some(100),
            used_mb: Some(95),
            used_ratio: Some(0.95),
            ..LogEntry::new(EventType::ThresholdExceeded, Severity::Warning)
        });

        let raw = fs::read_to_string(&path).expect("log file readable");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("valid json");
        assert_eq!(first["event"], "maintain_start");
        assert_eq!(first["severity"], "info");
        assert_eq!(first["volume"], "/");
        // Unset optional fields are omitted entirely.
        assert!(first.get("freed_mb").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).expect("valid json");
        assert_eq!(second["event"], "threshold_exceeded");
        assert_eq!(second["used_mb"], 95);
    }

    #[test]
    fn unwritable_path_degrades_without_panicking() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory cannot be opened for appending.
        let writer = JsonlWriter::new(dir.path());
        writer.write_entry(&LogEntry::new(EventType::Error, Severity::Error));
        writer.write_entry(&LogEntry::new(EventType::Error, Severity::Error));
    }

    #[test]
    fn severity_and_event_serialize_lowercase() {
        let entry = LogEntry::new(EventType::SpaceCleaned, Severity::Warning);
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("\"space_cleaned\""));
        assert!(json.contains("\"warning\""));
    }
}
