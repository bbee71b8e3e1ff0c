//! Shutdown coordination.
//!
//! Backed by a `watch` channel holding a single flag, so a signal taken
//! after the trigger still resolves immediately.

use tokio::sync::watch;

use crate::lifecycle::signals;

/// Owner side: flips the flag once.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Subscriber side, handed to the server and background tasks.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Idempotent; later calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|stopped| !std::mem::replace(stopped, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Trigger once SIGINT/SIGTERM arrives, from a background task.
    pub fn trigger_on_os_signal(self) -> ShutdownSignal {
        let signal = self.signal();
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            self.trigger();
        });
        signal
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered, or when the owner is dropped.
    pub async fn wait(mut self) {
        // Err means the sender is gone, which also ends the server.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_signal() {
        let shutdown = Shutdown::new();
        let a = shutdown.signal();
        let b = a.clone();

        shutdown.trigger();
        assert!(shutdown.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), async {
            a.wait().await;
            b.wait().await;
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_signal_taken_after_trigger_still_fires() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), shutdown.signal().wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropping_owner_releases_waiters() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_untriggered_signal_stays_pending() {
        let shutdown = Shutdown::new();
        let pending = tokio::time::timeout(Duration::from_millis(50), shutdown.signal().wait()).await;
        assert!(pending.is_err());
        assert!(!shutdown.is_triggered());
    }
}
