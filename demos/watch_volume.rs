//! Watch a volume and run a placeholder cleanup hook when usage crosses the
//! threshold, logging structured events to `maintenance.jsonl`.
//!
//! Usage:
//!   cargo run --example watch_volume -- /path/to/volume

use std::path::PathBuf;
use std::sync::Arc;

use disk_maintainer::prelude::*;

fn main() {
    let volume = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("/"), PathBuf::from);

    println!("maintaining {} (Ctrl-C to stop)", volume.display());

    let cleaner: Arc<dyn Cleaner> = Arc::new(|| -> CleanResult {
        // A real embedder would delete temp files or rotate logs here.
        println!("cleanup hook invoked");
        Ok(())
    });

    let maintainer = Maintainer::new(
        MaintainerConfig {
            volume,
            threshold: 0.9,
            check_interval_ms: 2_000,
        },
        detect_platform(),
        cleaner,
        Arc::new(JsonlWriter::new("maintenance.jsonl")),
    );

    let shutdown = ShutdownSignal::on_termination();
    maintainer.maintain(&shutdown);
    println!("maintenance stopped");
}
