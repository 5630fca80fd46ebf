//! Usage monitoring: megabyte-truncated readings over raw probe snapshots.

pub mod usage;
