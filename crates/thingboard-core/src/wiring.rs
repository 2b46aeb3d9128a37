//! Generation tokens guarding superseded async wiring sequences.
//!
//! Connecting a device is a multi-step async affair (fetch the description,
//! subscribe to affordances, add the cards). When a newer connection attempt
//! or a canvas teardown begins, every step of the older sequence must
//! recognize its own staleness and perform no further mutation. Each
//! sequence takes a [`Ticket`] at start and checks it before each side
//! effect; a stale ticket aborts without error.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter for async wiring sequences.
#[derive(Debug, Default)]
pub struct Wiring {
    latest: AtomicU64,
}

/// The generation a wiring sequence started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Wiring {
    /// Create a counter at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new wiring sequence, superseding all earlier ones.
    pub fn begin(&self) -> Ticket {
        Ticket {
            generation: self.latest.fetch_add(1, Ordering::AcqRel) + 1,
        }
    }

    /// Whether a sequence's ticket is still the latest.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.latest.load(Ordering::Acquire)
    }

    /// Invalidate every outstanding ticket without starting a sequence,
    /// e.g. on canvas teardown.
    pub fn supersede(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ticket_is_current() {
        let wiring = Wiring::new();
        let ticket = wiring.begin();
        assert!(wiring.is_current(ticket));
    }

    #[test]
    fn test_newer_sequence_stales_older_ticket() {
        let wiring = Wiring::new();
        let first = wiring.begin();
        let second = wiring.begin();

        assert!(!wiring.is_current(first));
        assert!(wiring.is_current(second));
    }

    #[test]
    fn test_supersede_invalidates_everything() {
        let wiring = Wiring::new();
        let ticket = wiring.begin();
        wiring.supersede();
        assert!(!wiring.is_current(ticket));
    }
}
