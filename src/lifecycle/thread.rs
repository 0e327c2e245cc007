//! Append-only message threads
//!
//! [`MessageThread`] is a pure append primitive: it loads the owning
//! ticket, pushes one immutable row, and saves. It performs no
//! cross-entity validation (staff existence, email preconditions) — that
//! is the lifecycle caller's job. Appends never mutate the ticket's own
//! fields; the thread only grows.

use tracing::debug;

use crate::core::{Message, MessageKind, TicketId};
use crate::error::Result;
use crate::storage::TicketRepository;

/// Append-only view over a ticket's message log
#[derive(Debug)]
pub struct MessageThread<'a, R: ?Sized> {
    store: &'a R,
}

impl<'a, R: TicketRepository + ?Sized> MessageThread<'a, R> {
    /// Create a thread handle over a repository
    pub const fn new(store: &'a R) -> Self {
        Self { store }
    }

    /// Append one message to the ticket's thread
    ///
    /// Authorship rules are carried by [`MessageKind`]; append order is
    /// the only ordering guarantee this component owns. The push happens
    /// under the ticket's write lock, so concurrent appenders extend the
    /// thread instead of overwriting each other's rows.
    pub fn append(
        &self,
        ticket_id: &TicketId,
        kind: MessageKind,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Message> {
        let message = Message::new(*ticket_id, kind, subject, body);
        let row = message.clone();
        self.store.mutate(ticket_id, &mut |ticket| {
            ticket.messages.push(row.clone());
            Ok(())
        })?;
        debug!(
            ticket = %ticket_id,
            message = %message.id,
            kind = %message.message_type,
            "appended message"
        );
        Ok(message)
    }

    /// The thread ordered newest-first for display
    pub fn read_newest_first(&self, ticket_id: &TicketId) -> Result<Vec<Message>> {
        let ticket = self.store.load(ticket_id)?;
        Ok(ticket.thread_newest_first())
    }
}
