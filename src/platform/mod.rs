//! Platform abstraction: the disk usage prober and its test doubles.

pub mod pal;
