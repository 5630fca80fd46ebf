//! PAL trait and the statvfs-backed disk usage prober, plus test doubles.

#![allow(missing_docs)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::errors::{MaintError, Result};

/// Byte-level usage snapshot for the volume containing a probed path.
///
/// Produced fresh on every probe; never mutated in place. `used_bytes` never
/// exceeds `total_bytes`, but `available_bytes <= free_bytes` is not
/// guaranteed on every platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
}

/// How `used` is derived from raw filesystem statistics.
///
/// `free` counts every unallocated block; `available` excludes the reserved
/// pool the filesystem keeps for the superuser. The macOS accounting model
/// subtracts `available`, every other platform subtracts `free`. The two
/// disagree by exactly the reserved-block reservation, so this stays an
/// explicit strategy instead of a unified formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsedAccounting {
    /// `used = total - free` (Linux and other non-macOS platforms).
    ExcludeReserved,
    /// `used = total - available` (macOS).
    IncludeReserved,
}

impl UsedAccounting {
    /// Strategy for the platform this crate was compiled for.
    #[must_use]
    pub const fn host() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::IncludeReserved
        }
        #[cfg(not(target_os = "macos"))]
        {
            Self::ExcludeReserved
        }
    }

    /// Derive used bytes from a raw `(total, free, available)` triple.
    #[must_use]
    pub const fn used_bytes(self, total: u64, free: u64, available: u64) -> u64 {
        match self {
            Self::ExcludeReserved => total.saturating_sub(free),
            Self::IncludeReserved => total.saturating_sub(available),
        }
    }
}

impl DiskUsage {
    /// Assemble a snapshot from raw byte counts, deriving `used` with the
    /// given accounting strategy.
    #[must_use]
    pub const fn from_raw(
        total: u64,
        free: u64,
        available: u64,
        accounting: UsedAccounting,
    ) -> Self {
        Self {
            total_bytes: total,
            available_bytes: available,
            free_bytes: free,
            used_bytes: accounting.used_bytes(total, free, available),
        }
    }
}

/// OS abstraction used by the maintenance loop.
pub trait Platform: Send + Sync {
    /// Query block-level filesystem statistics for the volume containing
    /// `path`. A failed query is surfaced immediately; there are no retries.
    fn disk_usage(&self, path: &Path) -> Result<DiskUsage>;
}

/// statvfs-backed prober for Unix targets.
#[cfg(unix)]
#[derive(Debug, Default)]
pub struct UnixPlatform;

#[cfg(unix)]
impl Platform for UnixPlatform {
    // f_blocks et al. are u32 on some targets and u64 on others; everything
    // is widened to u64 before multiplying.
    #[allow(clippy::useless_conversion)]
    fn disk_usage(&self, path: &Path) -> Result<DiskUsage> {
        let stat = nix::sys::statvfs::statvfs(path).map_err(|error| MaintError::Probe {
            path: path.to_path_buf(),
            details: error.to_string(),
        })?;
        let fragment = u64::from(stat.fragment_size());
        Ok(DiskUsage::from_raw(
            u64::from(stat.blocks()).saturating_mul(fragment),
            u64::from(stat.blocks_free()).saturating_mul(fragment),
            u64::from(stat.blocks_available()).saturating_mul(fragment),
            UsedAccounting::host(),
        ))
    }
}

/// Detect the active platform implementation.
#[must_use]
pub fn detect_platform() -> Arc<dyn Platform> {
    #[cfg(unix)]
    {
        Arc::new(UnixPlatform)
    }
    #[cfg(not(unix))]
    {
        compile_error!("disk_maintainer currently supports Unix targets only")
    }
}

/// One scripted probe response for [`MockPlatform`].
#[derive(Debug, Clone)]
pub enum ProbeStep {
    /// Return this snapshot.
    Usage(DiskUsage),
    /// Fail with a probe error carrying this detail text.
    Fail(String),
}

/// In-memory mock prober for deterministic tests.
///
/// Responses are served from the script in order; once the script is
/// exhausted the final step repeats. Probe calls are counted.
#[derive(Debug)]
pub struct MockPlatform {
    script: Vec<ProbeStep>,
    cursor: AtomicUsize,
}

impl MockPlatform {
    /// Mock that answers every probe with the same snapshot.
    #[must_use]
    pub fn steady(usage: DiskUsage) -> Self {
        Self::scripted(vec![ProbeStep::Usage(usage)])
    }

    /// Mock that plays back `script` in order, repeating the last step.
    ///
    /// The script must be non-empty.
    #[must_use]
    pub fn scripted(script: Vec<ProbeStep>) -> Self {
        assert!(!script.is_empty(), "mock probe script must be non-empty");
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of probe calls served so far.
    pub fn probe_calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl Platform for MockPlatform {
    fn disk_usage(&self, path: &Path) -> Result<DiskUsage> {
        let served = self.cursor.fetch_add(1, Ordering::SeqCst);
        let step = &self.script[served.min(self.script.len() - 1)];
        match step {
            ProbeStep::Usage(usage) => Ok(*usage),
            ProbeStep::Fail(details) => Err(MaintError::Probe {
                path: path.to_path_buf(),
                details: details.clone(),
            }),
        }
    }
}
