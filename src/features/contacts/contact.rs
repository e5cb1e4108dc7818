use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type ContactId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
}

impl Contact {
    pub fn new(id: ContactId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Hands out contact ids. Injected so tests get predictable ids.
#[derive(Debug, Clone)]
pub struct ContactIdGenerator {
    next: Arc<AtomicU64>,
}

impl ContactIdGenerator {
    /// Ids 1, 2, 3, ...
    pub fn incrementing() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: ContactId) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    pub fn next_id(&self) -> ContactId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ContactIdGenerator {
    fn default() -> Self {
        Self::incrementing()
    }
}
