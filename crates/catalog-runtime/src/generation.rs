//! # Generation Tokens
//!
//! Overlapping asynchronous requests are told apart with monotonically
//! increasing tickets. Only the most recently issued ticket is current; a
//! result carrying an older ticket is stale and must be discarded. This gives
//! logical cancellation without cancelling the underlying I/O.

use std::fmt;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets and remembers which one is current.
#[derive(Debug, Default)]
pub struct Generation {
    latest: u64,
    settled: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Records that the current ticket's result was committed.
    ///
    /// Returns `false` (and records nothing) for a stale ticket.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settled = ticket.0;
        true
    }

    /// `true` while the current ticket has not been settled.
    pub fn in_flight(&self) -> bool {
        self.settled < self.latest
    }

    pub fn latest(&self) -> Option<Ticket> {
        (self.latest > 0).then_some(Ticket(self.latest))
    }
}
