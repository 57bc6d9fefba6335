use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Requests issued across every worker of a run.
#[derive(Debug, Default)]
pub struct RequestCounter {
    issued: AtomicU64,
}

impl RequestCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn load(&self) -> u64 {
        self.issued.load(Ordering::Acquire)
    }

    /// Counts a request that is not subject to a ceiling.
    pub fn record(&self) {
        self.issued.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns a reserved slot that did not turn into a request.
    pub fn release(&self) {
        let released = self
            .issued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(1)
            });
        if released.is_err() {
            debug!("Request counter released below zero");
        }
    }

    /// Reserves one request slot below `limit`; `0` means unlimited.
    ///
    /// Concurrent callers never push the count past `limit`.
    pub fn try_reserve(&self, limit: u64) -> bool {
        self.issued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if limit != 0 && current >= limit {
                    return None;
                }
                current.checked_add(1)
            })
            .is_ok()
    }
}
