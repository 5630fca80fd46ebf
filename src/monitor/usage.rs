//! Usage arithmetic: megabyte truncation and the used/total ratio.

use crate::platform::pal::DiskUsage;

/// One kibibyte.
pub const KB: u64 = 1 << 10;
/// One mebibyte.
pub const MB: u64 = 1 << 20;
/// One gibibyte.
pub const GB: u64 = 1 << 30;

/// Usage snapshot reduced to whole megabytes.
///
/// Both counts are truncated to whole megabytes *before* the ratio is
/// computed. The truncation is deliberately coarse: on volumes near the
/// megabyte scale the ratio can land away from the true byte-level ratio,
/// and downstream thresholds are calibrated against exactly this rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageReading {
    /// Volume size in whole megabytes.
    pub total_mb: u64,
    /// Used space in whole megabytes.
    pub used_mb: u64,
    /// `used_mb / total_mb`; `0.0` for a zero-megabyte volume.
    pub used_ratio: f64,
}

impl UsageReading {
    /// Reduce a byte-level snapshot to megabyte-truncated terms.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_usage(usage: &DiskUsage) -> Self {
        let total_mb = usage.total_bytes / MB;
        let used_mb = usage.used_bytes / MB;
        let used_ratio = if total_mb == 0 {
            0.0
        } else {
            used_mb as f64 / total_mb as f64
        };
        Self {
            total_mb,
            used_mb,
            used_ratio,
        }
    }
}

/// Whole megabytes freed between two readings taken around a cleanup.
///
/// Saturates at zero; a cleanup hook is allowed to free nothing.
#[must_use]
pub fn freed_mb(before: &UsageReading, after: &UsageReading) -> u64 {
    before.used_mb.saturating_sub(after.used_mb)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{MB, UsageReading, freed_mb};
    use crate::platform::pal::{DiskUsage, UsedAccounting};

    fn usage_mb(total_mb: u64, free_mb: u64) -> DiskUsage {
        DiskUsage::from_raw(
            total_mb * MB,
            free_mb * MB,
            free_mb * MB,
            UsedAccounting::ExcludeReserved,
        )
    }

    #[test]
    fn nearly_full_volume_reads_ninety_five_percent() {
        let reading = UsageReading::from_usage(&usage_mb(100, 5));
        assert_eq!(reading.total_mb, 100);
        assert_eq!(reading.used_mb, 95);
        assert!((reading.used_ratio - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn comfortable_volume_reads_eighty_percent() {
        let reading = UsageReading::from_usage(&usage_mb(100, 20));
        assert!((reading.used_ratio - 0.80).abs() < f64::EPSILON);
    }

    #[test]
    fn sub_megabyte_remainders_are_truncated_before_the_ratio() {
        // 100 MB + 512 KB total, 5 MB + 100 KB free. Byte-level ratio is
        // slightly below 95/100; the truncated terms still give 95/100.
        let usage = DiskUsage::from_raw(
            100 * MB + 512 * super::KB,
            5 * MB + 100 * super::KB,
            5 * MB,
            UsedAccounting::ExcludeReserved,
        );
        let reading = UsageReading::from_usage(&usage);
        assert_eq!(reading.total_mb, 100);
        assert_eq!(reading.used_mb, 95);
        assert!((reading.used_ratio - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_volume_yields_zero_ratio() {
        let reading = UsageReading::from_usage(&usage_mb(0, 0));
        assert_eq!(reading.used_ratio, 0.0);
    }

    #[test]
    fn freed_mb_is_the_truncated_difference() {
        let before = UsageReading::from_usage(&usage_mb(100, 5));
        let after = UsageReading::from_usage(&usage_mb(100, 40));
        assert_eq!(freed_mb(&before, &after), 35);
    }

    #[test]
    fn freed_mb_saturates_when_usage_grew_during_cleanup() {
        let before = UsageReading::from_usage(&usage_mb(100, 40));
        let after = UsageReading::from_usage(&usage_mb(100, 5));
        assert_eq!(freed_mb(&before, &after), 0);
    }

    proptest! {
        #[test]
        fn ratio_is_finite_and_non_negative(total in proptest::num::u64::ANY, used_frac in 0u64..=100) {
            let used = total / 100 * used_frac;
            let usage = DiskUsage {
                total_bytes: total,
                available_bytes: total - used,
                free_bytes: total - used,
                used_bytes: used,
            };
            let reading = UsageReading::from_usage(&usage);
            prop_assert!(reading.used_ratio.is_finite());
            prop_assert!(reading.used_ratio >= 0.0);
        }
    }
}
