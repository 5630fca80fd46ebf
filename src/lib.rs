#![forbid(unsafe_code)]

//! disk_maintainer — an embedded disk-usage maintenance loop.
//!
//! Watches one volume and runs a caller-supplied cleanup hook whenever the
//! used/total ratio meets or exceeds a threshold. Intended to be embedded in
//! a larger service: the host supplies the hook and a cancellation signal,
//! the maintainer supplies the timer, the usage probing, and the
//! serialization that keeps checks and cleanups from overlapping.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use disk_maintainer::prelude::*;
//!
//! let maintainer = Maintainer::with_defaults(
//!     MaintainerConfig {
//!         volume: "/var".into(),
//!         threshold: 0.85,
//!         check_interval_ms: 60_000,
//!     },
//!     Arc::new(|| -> CleanResult {
//!         // Delete temp files, rotate logs, ...
//!         Ok(())
//!     }),
//! );
//!
//! let (handle, shutdown) = ShutdownSignal::new();
//! let worker = std::thread::spawn(move || maintainer.maintain(&shutdown));
//!
//! // ... later, from the host's shutdown path:
//! handle.shutdown();
//! worker.join().unwrap();
//! ```

pub mod prelude;

pub mod core;
pub mod daemon;
pub mod logger;
pub mod monitor;
pub mod platform;
