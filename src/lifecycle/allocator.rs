//! Ticket number allocation
//!
//! Allocation serializes same-day writers through the storage layer's
//! prefix lock, re-reads the highest issued suffix under that lock, and
//! composes the next number. The lock guard travels with the returned
//! [`Allocation`] so it stays held through the ticket insert and releases
//! when the allocation is dropped.
//!
//! The lock alone is not trusted for correctness: the storage uniqueness
//! constraint is the second line of defense, and the create path retries
//! the whole transaction on a duplicate (see
//! [`super::TicketLifecycle::create`]).

use chrono::NaiveDate;
use tracing::debug;

use crate::core::TicketNumber;
use crate::error::Result;
use crate::storage::NumberSequence;

/// A freshly computed number plus the day lock protecting it
///
/// Dropping the allocation releases the prefix lock; keep it alive until
/// the ticket insert has completed.
#[derive(Debug)]
pub struct Allocation<G> {
    /// The composed ticket number
    pub number: TicketNumber,
    /// Write-intent lock over the day prefix, released on drop
    pub guard: G,
}

/// Computes the next unused ticket number for a day
#[derive(Debug)]
pub struct TicketNumberAllocator<'a, S> {
    sequence: &'a S,
}

impl<'a, S: NumberSequence> TicketNumberAllocator<'a, S> {
    /// Create an allocator over a number sequence
    pub const fn new(sequence: &'a S) -> Self {
        Self { sequence }
    }

    /// Allocate the next number for `day`
    ///
    /// Reads the maximum existing suffix for the day prefix under the
    /// prefix lock; no existing suffix means 1, otherwise max + 1. A next
    /// suffix past 9999 fails with `NumberOverflow` before anything is
    /// written. The sequence is always re-read from storage — no value is
    /// cached across calls.
    pub fn allocate(&self, day: NaiveDate) -> Result<Allocation<S::Guard>> {
        let prefix = TicketNumber::prefix_for(day);
        let guard = self.sequence.lock_prefix(&prefix)?;
        let next = self
            .sequence
            .max_suffix(&prefix)?
            .map_or(1, |max| max + 1);
        let number = TicketNumber::compose(day, next)?;
        debug!(%number, "allocated ticket number");
        Ok(Allocation { number, guard })
    }
}
