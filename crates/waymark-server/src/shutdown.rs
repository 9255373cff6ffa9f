//! Graceful shutdown signal.
//!
//! ```rust
//! use waymark_server::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::new();
//! let other = shutdown.clone();
//!
//! other.trigger();
//! assert!(shutdown.is_triggered());
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// A cloneable, one-way shutdown flag.
///
/// Every clone observes the same trigger. Waiting on an already triggered
/// signal returns immediately.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a signal triggered by ctrl-c.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn ctrl_c() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("ctrl-c received"),
                Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
            }
            trigger.trigger();
        });
        signal
    }

    /// Triggers shutdown. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once triggered.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Waits until the signal is triggered.
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so this only ends on a trigger.
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
