//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use disk_maintainer::prelude::*;
//! ```

// Core
pub use crate::core::config::MaintainerConfig;
pub use crate::core::errors::{CleanResult, CleanerError, MaintError, Result};

// Platform
pub use crate::platform::pal::{DiskUsage, Platform, UsedAccounting, detect_platform};

// Monitor
pub use crate::monitor::usage::UsageReading;

// Logger
pub use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
pub use crate::logger::{MaintLogger, NoopLogger};

// Daemon
pub use crate::daemon::maintainer::{Cleaner, CycleOutcome, Maintainer};
pub use crate::daemon::signals::{ShutdownHandle, ShutdownSignal};
