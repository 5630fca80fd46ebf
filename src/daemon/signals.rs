//! Cancellation plumbing: shutdown channel plus an optional SIGTERM/SIGINT
//! bridge.
//!
//! The maintenance loop observes cancellation cooperatively at tick
//! boundaries; nothing here pre-empts an in-flight cleanup.

use crossbeam_channel::{Receiver, Sender, bounded};

/// Receiving side of the cancellation signal, passed to
/// [`Maintainer::maintain`](crate::daemon::maintainer::Maintainer::maintain).
pub struct ShutdownSignal {
    rx: Receiver<()>,
}

/// Sending side of the cancellation signal.
///
/// Cloneable so several owners can request shutdown. Dropping every handle
/// also cancels the loop — a host that loses the handle cannot strand the
/// maintenance thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Sender<()>,
}

impl ShutdownHandle {
    /// Request shutdown. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.tx.try_send(());
    }
}

impl ShutdownSignal {
    /// Create a fresh handle/signal pair.
    #[must_use]
    pub fn new() -> (ShutdownHandle, Self) {
        let (tx, rx) = bounded(1);
        (ShutdownHandle { tx }, Self { rx })
    }

    pub(crate) const fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

#[cfg(feature = "signals")]
impl ShutdownSignal {
    /// Signal that fires on SIGTERM or SIGINT.
    ///
    /// Registration is best-effort, matching daemon conventions: if the
    /// hooks cannot be installed the failure goes to stderr and the signal
    /// simply never fires. The returned signal still responds to the paired
    /// watcher thread exiting.
    #[must_use]
    pub fn on_termination() -> Self {
        use signal_hook::consts::{SIGINT, SIGTERM};

        let (handle, signal) = Self::new();
        match signal_hook::iterator::Signals::new([SIGTERM, SIGINT]) {
            Ok(mut signals) => {
                let spawned = std::thread::Builder::new()
                    .name("dmn-signal-watch".to_string())
                    .spawn(move || {
                        if signals.forever().next().is_some() {
                            handle.shutdown();
                        }
                    });
                if let Err(error) = spawned {
                    eprintln!("[disk_maintainer] failed to spawn signal watcher: {error}");
                }
            }
            Err(error) => {
                eprintln!("[disk_maintainer] failed to register termination signals: {error}");
                // Keep a handle alive forever so the signal stays pending
                // rather than reading as already-cancelled.
                std::mem::forget(handle);
            }
        }
        signal
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ShutdownSignal;

    #[test]
    fn shutdown_is_observable_and_idempotent() {
        let (handle, signal) = ShutdownSignal::new();
        assert!(signal.receiver().try_recv().is_err());
        handle.shutdown();
        handle.shutdown();
        assert!(signal.receiver().recv_timeout(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn dropping_every_handle_cancels() {
        let (handle, signal) = ShutdownSignal::new();
        drop(handle);
        // Disconnection surfaces as a recv error, which the loop treats as
        // cancellation.
        assert!(signal.receiver().recv_timeout(Duration::from_secs(1)).is_err());
        assert!(signal.receiver().try_recv().is_err());
    }
}
