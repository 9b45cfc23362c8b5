//! Concurrency gate for detail-page fetches
//!
//! Wraps a semaphore so the cap travels with the scraper that owns it instead
//! of living in process-wide state. Independent scrapers get independent gates.

use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Limits how many fetches run at the same time
#[derive(Debug, Clone)]
pub struct FetchGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl FetchGate {
    /// Creates a gate admitting at most `capacity` holders (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a free slot
    ///
    /// The slot is released when the returned permit is dropped. Returns
    /// `None` only if the gate has been closed.
    pub async fn acquire(&self) -> Option<SemaphorePermit<'_>> {
        self.semaphore.acquire().await.ok()
    }
}
