//! Ordered batch release
//!
//! Responses for consecutive turns may arrive out of order. Each request takes
//! a ticket when it is issued; a submitted batch is held until every earlier
//! ticket has been submitted or abandoned, then released in ticket order.

use crate::types::Ticket;
use std::collections::BTreeMap;
use tracing::debug;

/// Reorder buffer keyed by ticket
#[derive(Debug)]
pub struct BatchSequencer<T> {
    next_ticket: Ticket,
    next_release: Ticket,
    held: BTreeMap<Ticket, Option<T>>,
}

impl<T> BatchSequencer<T> {
    pub fn new() -> Self {
        Self {
            next_ticket: 0,
            next_release: 0,
            held: BTreeMap::new(),
        }
    }

    /// Reserve the next position in the release order.
    pub fn issue(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Hand in the batch for `ticket`; returns every batch now releasable, in order.
    ///
    /// Tickets that were never issued, already released, or already submitted are ignored.
    pub fn submit(&mut self, ticket: Ticket, batch: T) -> Vec<T> {
        self.fill(ticket, Some(batch))
    }

    /// Give up on `ticket` (its request failed) so later batches are not blocked.
    pub fn abandon(&mut self, ticket: Ticket) -> Vec<T> {
        self.fill(ticket, None)
    }

    fn fill(&mut self, ticket: Ticket, slot: Option<T>) -> Vec<T> {
        if ticket < self.next_release || ticket >= self.next_ticket || self.held.contains_key(&ticket)
        {
            debug!(ticket, "Ignoring unexpected batch ticket");
            return Vec::new();
        }
        self.held.insert(ticket, slot);

        let mut released = Vec::new();
        while let Some(slot) = self.held.remove(&self.next_release) {
            self.next_release += 1;
            released.extend(slot);
        }
        released
    }
}

impl<T> Default for BatchSequencer<T> {
    fn default() -> Self {
        Self::new()
    }
}
