//! Maintenance loop and cancellation plumbing.

pub mod maintainer;
pub mod signals;
