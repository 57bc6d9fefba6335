use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed set of URLs shared by the list-replay workers.
///
/// Filled once, never refilled; every URL is handed out to exactly one
/// caller of [`UrlQueue::take`].
#[derive(Debug)]
pub struct UrlQueue {
    items: Vec<String>,
    cursor: AtomicUsize,
}

impl UrlQueue {
    #[must_use]
    pub const fn new(items: Vec<String>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Takes the next URL without blocking; `None` once drained.
    pub fn take(&self) -> Option<&str> {
        let len = self.items.len();
        let idx = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |idx| {
                if idx < len { idx.checked_add(1) } else { None }
            })
            .ok()?;
        self.items.get(idx).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len()
            .saturating_sub(self.cursor.load(Ordering::Acquire))
    }
}
