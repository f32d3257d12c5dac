//! Request sequencing for "latest response wins" flows.
//!
//! A debounced search may leave an older request in flight when a newer one
//! starts. Each request takes a [`Ticket`]; only the holder of the most
//! recently issued ticket may apply its response.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket newer than every ticket issued so far.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Run `apply` only if `ticket` has not been superseded.
    pub fn apply_if_latest<R>(&self, ticket: Ticket, apply: impl FnOnce() -> R) -> Option<R> {
        if self.is_latest(ticket) {
            Some(apply())
        } else {
            tracing::debug!(
                "Discarding stale response for ticket {} (latest {})",
                ticket.0,
                self.latest.load(Ordering::SeqCst)
            );
            None
        }
    }
}
