//! Maintenance loop: serialized check-and-clean cycles driven by a ticker.

use std::sync::Arc;

use crossbeam_channel::{select, tick};
use parking_lot::Mutex;

use crate::core::config::MaintainerConfig;
use crate::core::errors::{CleanResult, MaintError, Result};
use crate::daemon::signals::ShutdownSignal;
use crate::logger::jsonl::{EventType, LogEntry, Severity};
use crate::logger::{MaintLogger, NoopLogger};
use crate::monitor::usage::{UsageReading, freed_mb};
use crate::platform::pal::{Platform, detect_platform};

/// Caller-supplied hook that frees disk space.
///
/// The hook is the sole mechanism for actually reclaiming space (deleting
/// temp files, rotating logs, and so on); the maintainer only decides when
/// to run it. It is invoked synchronously while the cycle lock is held and
/// may block arbitrarily long; no timeout is enforced.
pub trait Cleaner: Send + Sync {
    /// Free disk space. A returned error aborts the cycle.
    fn clean(&self) -> CleanResult;
}

impl<F> Cleaner for F
where
    F: Fn() -> CleanResult + Send + Sync,
{
    fn clean(&self) -> CleanResult {
        self()
    }
}

/// Result of one successful check-and-maintain cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Usage was below the threshold; nothing was done.
    BelowThreshold {
        /// Megabyte-truncated used/total ratio observed.
        used_ratio: f64,
    },
    /// The cleanup hook ran and the volume was re-probed.
    Cleaned {
        /// Used megabytes after cleanup.
        used_mb_after: u64,
        /// Whole megabytes freed by the cleanup.
        freed_mb: u64,
    },
}

/// Keeps disk usage on one volume under a threshold.
///
/// Construction requires the cleanup hook, so a maintainer without one is
/// unrepresentable. Configuration is sanitized once here and read-only
/// afterwards.
pub struct Maintainer {
    config: MaintainerConfig,
    platform: Arc<dyn Platform>,
    cleaner: Arc<dyn Cleaner>,
    logger: Arc<dyn MaintLogger>,
    /// Serializes check-and-clean cycles; a tick never overlaps a slow
    /// cleanup still in progress.
    cycle_lock: Mutex<()>,
}

impl Maintainer {
    /// Build a maintainer with explicit collaborators.
    ///
    /// Out-of-range configuration fields are silently replaced by their
    /// documented defaults.
    #[must_use]
    pub fn new(
        config: MaintainerConfig,
        platform: Arc<dyn Platform>,
        cleaner: Arc<dyn Cleaner>,
        logger: Arc<dyn MaintLogger>,
    ) -> Self {
        Self {
            config: config.sanitized(),
            platform,
            cleaner,
            logger,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Build a maintainer against the host platform with no-op logging.
    #[must_use]
    pub fn with_defaults(config: MaintainerConfig, cleaner: Arc<dyn Cleaner>) -> Self {
        Self::new(config, detect_platform(), cleaner, Arc::new(NoopLogger))
    }

    /// Effective configuration after defaults were applied.
    #[must_use]
    pub fn config(&self) -> &MaintainerConfig {
        &self.config
    }

    /// Run the maintenance loop until `shutdown` fires.
    ///
    /// One cycle runs immediately, then one per tick of the check interval.
    /// Per-cycle failures are logged and the loop keeps going; only the
    /// shutdown signal ends it. Cancellation is observed at tick boundaries,
    /// never mid-cleanup. Blocks the calling thread.
    pub fn maintain(&self, shutdown: &ShutdownSignal) {
        self.logger.log(&LogEntry {
            volume: Some(self.config.volume.display().to_string()),
            threshold: Some(self.config.threshold),
            interval_ms: Some(self.config.check_interval_ms),
            ..LogEntry::new(EventType::MaintainStart, Severity::Info)
        });

        self.run_cycle_logged();

        // Ticker is released when the receiver drops on return.
        let ticker = tick(self.config.check_interval());
        loop {
            select! {
                recv(ticker) -> _ => self.run_cycle_logged(),
                // Both a sent unit and a disconnect (all handles dropped)
                // count as cancellation.
                recv(shutdown.receiver()) -> _ => return,
            }
        }
    }

    /// Run one check-and-maintain cycle.
    ///
    /// Public so embedders can force a check outside the timer; calls are
    /// serialized against the loop by the cycle lock.
    pub fn check_and_maintain(&self) -> Result<CycleOutcome> {
        let _guard = self.cycle_lock.lock();

        let before = UsageReading::from_usage(&self.platform.disk_usage(&self.config.volume)?);
        if before.used_ratio < self.config.threshold {
            return Ok(CycleOutcome::BelowThreshold {
                used_ratio: before.used_ratio,
            });
        }

        self.logger.log(&LogEntry {
            volume: Some(self.config.volume.display().to_string()),
            threshold: Some(self.config.threshold),
            total_mb: Some(before.total_mb),
            used_mb: Some(before.used_mb),
            used_ratio: Some(before.used_ratio),
            ..LogEntry::new(EventType::ThresholdExceeded, Severity::Warning)
        });

        self.cleaner
            .clean()
            .map_err(|source| MaintError::Clean { source })?;

        // Re-probe to measure the effect; a failure here must not report a
        // partial success.
        let after = UsageReading::from_usage(&self.platform.disk_usage(&self.config.volume)?);
        let freed = freed_mb(&before, &after);

        self.logger.log(&LogEntry {
            volume: Some(self.config.volume.display().to_string()),
            used_mb: Some(after.used_mb),
            freed_mb: Some(freed),
            ..LogEntry::new(EventType::SpaceCleaned, Severity::Info)
        });

        Ok(CycleOutcome::Cleaned {
            used_mb_after: after.used_mb,
            freed_mb: freed,
        })
    }

    fn run_cycle_logged(&self) {
        if let Err(error) = self.check_and_maintain() {
            self.logger.log(&LogEntry {
                volume: Some(self.config.volume.display().to_string()),
                error_code: Some(error.code().to_string()),
                error_message: Some(error.to_string()),
                ..LogEntry::new(EventType::Error, Severity::Error)
            });
        }
    }
}
