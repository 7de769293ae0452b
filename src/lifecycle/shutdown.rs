//! Stop coordination shared by the gateway and the backend services.
//!
//! A [`Shutdown`] is held by whoever decides when to stop (the signal
//! handler, or a test). Each server holds a [`Draining`] and stops
//! accepting connections once it resolves, then finishes in-flight requests.

use tokio::sync::watch;

/// Owner side of the stop flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A handle that resolves once [`trigger`](Self::trigger) runs, even if
    /// it was taken after the trigger.
    pub fn subscribe(&self) -> Draining {
        Draining {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every server holding a [`Draining`] to stop. Idempotent.
    pub fn trigger(&self) {
        let first = !self.tx.send_replace(true);
        if first {
            tracing::debug!(servers = self.tx.receiver_count(), "Stop requested");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Servers still waiting on the flag.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Server side of the stop flag.
#[derive(Debug)]
pub struct Draining {
    rx: watch::Receiver<bool>,
}

impl Draining {
    /// Resolve when a stop was requested or every [`Shutdown`] was dropped.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
