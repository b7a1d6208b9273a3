// Shutdown signalling module
//
// The accept loop owns an explicit ShutdownSignal instead of an implicit
// process-level interrupt handler; OS signals only trigger it. Shutdown is
// therefore deterministic and testable without signal delivery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cancellation signal for the accept loop.
///
/// Cloning shares the underlying signal.
#[derive(Clone)]
pub struct ShutdownSignal {
    notify: Arc<Notify>,
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request shutdown. Idempotent: repeated calls are no-ops.
    pub fn trigger(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is requested. Returns immediately if it already
    /// has been.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register the waiter before re-checking the flag so a trigger
        // between check and await cannot be lost
        notified.as_mut().enable();
        if self.requested.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Install OS signal handlers that trigger graceful shutdown (Unix).
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop (Ctrl+C) |
#[cfg(unix)]
pub fn install(shutdown: &ShutdownSignal) {
    use tokio::signal::unix::{signal, SignalKind};

    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
        shutdown.trigger();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn install(shutdown: &ShutdownSignal) {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown.trigger();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_is_idempotent() {
        let shutdown = ShutdownSignal::new();
        assert!(!shutdown.is_triggered());

        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        // Already triggered: wait must return immediately
        shutdown.wait().await;
    }

    #[tokio::test]
    async fn test_wait_wakes_on_trigger() {
        let shutdown = ShutdownSignal::new();
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.wait().await })
        };

        shutdown.trigger();
        waiter.await.unwrap();
    }
}
