//! Structured log sinks for maintenance events.

pub mod jsonl;

use parking_lot::Mutex;

use self::jsonl::LogEntry;

/// Structured log sink accepting leveled, keyed maintenance events.
///
/// Sinks must never fail outward; a sink that cannot deliver an entry
/// degrades or drops it internally.
pub trait MaintLogger: Send + Sync {
    /// Record one entry.
    fn log(&self, entry: &LogEntry);
}

/// Default sink: drops every entry.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl MaintLogger for NoopLogger {
    fn log(&self, _entry: &LogEntry) {}
}

/// In-memory sink recording entries, for assertions in tests.
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

impl MaintLogger for MemoryLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}
