//! Storage seams for the lifecycle engine
//!
//! Two traits split the persistence contract: [`TicketRepository`] is
//! ordinary record CRUD, [`NumberSequence`] is the day-scoped sequence
//! coordination (prefix lock plus max-suffix read) the allocator needs.
//! [`super::FileStorage`] implements both; tests substitute in-memory
//! doubles to inject uniqueness conflicts.

use std::sync::Arc;

use crate::core::{Ticket, TicketId, TicketNumber};
use crate::error::Result;

/// Ticket record storage
///
/// `insert` enforces the global uniqueness constraint on ticket numbers:
/// a collision must surface as [`crate::error::InquiryDeskError::DuplicateNumber`]
/// with nothing persisted, so the caller can recompute and retry the whole
/// creation.
pub trait TicketRepository: Send + Sync {
    /// Persist a brand-new ticket (with any embedded initial message)
    fn insert(&self, ticket: &Ticket) -> Result<()>;

    /// Persist changes to an existing ticket
    fn save(&self, ticket: &Ticket) -> Result<()>;

    /// Load, mutate, and persist a ticket under its per-ticket write lock
    ///
    /// The lock is held across the whole load-modify-save, so concurrent
    /// mutators of one ticket serialize instead of overwriting each
    /// other's committed rows. When the closure errors nothing is
    /// persisted. Returns the ticket as saved.
    fn mutate(
        &self,
        id: &TicketId,
        f: &mut dyn FnMut(&mut Ticket) -> Result<()>,
    ) -> Result<Ticket>;

    /// Load a ticket by ID
    fn load(&self, id: &TicketId) -> Result<Ticket>;

    /// Load all tickets
    fn load_all(&self) -> Result<Vec<Ticket>>;

    /// Check existence without loading
    fn exists(&self, id: &TicketId) -> Result<bool>;

    /// Look a ticket up by its human-readable number
    fn find_by_number(&self, number: &TicketNumber) -> Result<Option<Ticket>>;
}

/// Day-scoped number sequence coordination
///
/// The guard returned by [`NumberSequence::lock_prefix`] is the
/// write-intent lock over all numbers sharing a day prefix. It must be
/// held from the max-suffix read through the ticket insert and is
/// released on drop. It must not block readers, updates, or other-day
/// allocations.
pub trait NumberSequence: Send + Sync {
    /// Lock guard type; releases the prefix on drop
    type Guard;

    /// Acquire the write-intent lock for a day prefix
    fn lock_prefix(&self, prefix: &str) -> Result<Self::Guard>;

    /// Highest suffix already issued under a prefix, if any
    ///
    /// Always re-reads storage; implementations must not cache the last
    /// issued value across calls, since a trusted stale "next value"
    /// would reintroduce the read-then-insert race the lock prevents.
    fn max_suffix(&self, prefix: &str) -> Result<Option<u32>>;
}

impl<T: TicketRepository + ?Sized> TicketRepository for Arc<T> {
    fn insert(&self, ticket: &Ticket) -> Result<()> {
        (**self).insert(ticket)
    }

    fn save(&self, ticket: &Ticket) -> Result<()> {
        (**self).save(ticket)
    }

    fn mutate(
        &self,
        id: &TicketId,
        f: &mut dyn FnMut(&mut Ticket) -> Result<()>,
    ) -> Result<Ticket> {
        (**self).mutate(id, f)
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        (**self).load(id)
    }

    fn load_all(&self) -> Result<Vec<Ticket>> {
        (**self).load_all()
    }

    fn exists(&self, id: &TicketId) -> Result<bool> {
        (**self).exists(id)
    }

    fn find_by_number(&self, number: &TicketNumber) -> Result<Option<Ticket>> {
        (**self).find_by_number(number)
    }
}

impl<T: NumberSequence + ?Sized> NumberSequence for Arc<T> {
    type Guard = T::Guard;

    fn lock_prefix(&self, prefix: &str) -> Result<Self::Guard> {
        (**self).lock_prefix(prefix)
    }

    fn max_suffix(&self, prefix: &str) -> Result<Option<u32>> {
        (**self).max_suffix(prefix)
    }
}
