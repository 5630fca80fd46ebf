//! Maintainer configuration: documented defaults, sanitization, TOML loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{MaintError, Result};

/// Volume maintained when none is configured.
pub const DEFAULT_VOLUME: &str = "/";
/// Used/total ratio that triggers cleanup when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.9;
/// Check interval applied when none is configured: 10 minutes.
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 600_000;

/// Configuration for a [`Maintainer`](crate::daemon::maintainer::Maintainer).
///
/// Every field has a documented default; fields left at invalid values are
/// silently replaced by [`MaintainerConfig::sanitized`] before the first
/// cycle runs. The configuration is read-only once the loop has started.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaintainerConfig {
    /// The volume to maintain.
    pub volume: PathBuf,
    /// The used/total ratio above which the cleanup hook runs.
    /// Must lie in the open interval (0, 1).
    pub threshold: f64,
    /// How often to check disk usage, in milliseconds.
    pub check_interval_ms: u64,
}

impl Default for MaintainerConfig {
    fn default() -> Self {
        Self {
            volume: PathBuf::from(DEFAULT_VOLUME),
            threshold: DEFAULT_THRESHOLD,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
        }
    }
}

impl MaintainerConfig {
    /// Replace unset or out-of-range fields with their documented defaults.
    ///
    /// Pure function over the value; process state is never consulted.
    /// An empty volume path, a threshold outside (0, 1) (including NaN),
    /// and a zero interval all fall back to the defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.volume.as_os_str().is_empty() {
            self.volume = PathBuf::from(DEFAULT_VOLUME);
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            self.threshold = DEFAULT_THRESHOLD;
        }
        if self.check_interval_ms == 0 {
            self.check_interval_ms = DEFAULT_CHECK_INTERVAL_MS;
        }
        self
    }

    /// The check interval as a [`Duration`].
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|error| MaintError::InvalidConfig {
            details: error.to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| MaintError::io(path, source))?;
        Self::from_toml_str(&raw)
    }
}
