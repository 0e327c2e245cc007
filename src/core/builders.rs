//! Builder for assembling tickets
//!
//! Used by the lifecycle create path once a number has been allocated,
//! and by tests that need tickets in specific states.

use chrono::{DateTime, Utc};

use super::message::Message;
use super::number::TicketNumber;
use super::ticket::{CategoryId, Channel, Priority, StaffId, Status, Ticket, TicketId};
use crate::error::{InquiryDeskError, Result};

/// Builder for creating [`Ticket`] instances
#[derive(Debug, Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    number: Option<TicketNumber>,
    channel: Option<Channel>,
    category_id: Option<CategoryId>,
    customer_name: Option<String>,
    customer_email: Option<String>,
    order_number: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    assigned_staff_id: Option<StaffId>,
    internal_notes: Option<String>,
    messages: Vec<Message>,
    created_at: Option<DateTime<Utc>>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub const fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the allocated ticket number
    #[must_use]
    pub fn number(mut self, number: TicketNumber) -> Self {
        self.number = Some(number);
        self
    }

    /// Set the intake channel
    #[must_use]
    pub const fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Set the category reference
    #[must_use]
    pub const fn category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the customer name
    #[must_use]
    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Set the customer email
    #[must_use]
    pub fn customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    /// Set the order number
    #[must_use]
    pub fn order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// Set the status (defaults to pending)
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority (defaults to medium)
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the assigned staff member
    #[must_use]
    pub const fn assigned_staff_id(mut self, staff_id: StaffId) -> Self {
        self.assigned_staff_id = Some(staff_id);
        self
    }

    /// Set internal notes
    #[must_use]
    pub fn internal_notes(mut self, notes: impl Into<String>) -> Self {
        self.internal_notes = Some(notes.into());
        self
    }

    /// Seed the message thread
    #[must_use]
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Set `created_at` (defaults to now)
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the ticket
    ///
    /// Number, channel, and a non-empty customer name are required; status
    /// and priority fall back to their defaults. Channel-dependent field
    /// rules are the lifecycle's concern, not the builder's.
    pub fn build(self) -> Result<Ticket> {
        let number = self
            .number
            .ok_or_else(|| InquiryDeskError::custom("ticket number is required"))?;
        let channel = self
            .channel
            .ok_or_else(|| InquiryDeskError::custom("ticket channel is required"))?;
        let customer_name = self
            .customer_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| InquiryDeskError::custom("customer name is required"))?;

        let created_at = self.created_at.unwrap_or_else(Utc::now);

        Ok(Ticket {
            id: self.id.unwrap_or_default(),
            number,
            channel,
            category_id: self.category_id.unwrap_or_default(),
            customer_name,
            customer_email: self.customer_email,
            order_number: self.order_number,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            assigned_staff_id: self.assigned_staff_id,
            internal_notes: self.internal_notes,
            messages: self.messages,
            created_at,
            updated_at: created_at,
        })
    }
}
