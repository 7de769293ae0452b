//! Request limits.
//!
//! # Responsibilities
//! - Cap requests processed at once (optional)
//! - Cap inbound body size (optional, enforced by a body limit layer)
//!
//! # Design Decisions
//! - Both caps are off by default; unbounded use is an accepted risk
//! - Over the concurrency cap, requests wait for a slot instead of failing
//! - Oversized bodies with a known length are rejected with 413 before routing

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Optional global cap on in-flight proxied requests.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyCap {
    slots: Option<Arc<Semaphore>>,
    max: Option<usize>,
}

impl ConcurrencyCap {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            slots: max.map(|n| Arc::new(Semaphore::new(n))),
            max,
        }
    }

    /// Wait for a slot. The returned permit releases it on drop.
    /// Returns `None` when uncapped.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let slots = self.slots.as_ref()?;
        // The semaphore is never closed.
        slots.clone().acquire_owned().await.ok()
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Free slots, or `None` when uncapped.
    pub fn available(&self) -> Option<usize> {
        self.slots.as_ref().map(|s| s.available_permits())
    }
}
