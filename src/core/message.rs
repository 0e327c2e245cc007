//! Messages attached to a ticket's thread
//!
//! A message row is immutable after creation; the thread only grows.
//! Authorship is encoded in [`MessageKind`] so an unauthored staff reply
//! or an authored customer message cannot be constructed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::{StaffId, TicketId};

/// Unique identifier for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random message ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored message type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// The inquiry that opened the ticket (customer-authored)
    InitialInquiry,
    /// A follow-up from the customer
    CustomerReply,
    /// A staff answer, always authored
    StaffReply,
}

impl MessageType {
    /// The stable string value persisted and exposed to callers
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitialInquiry => "initial_inquiry",
            Self::CustomerReply => "customer_reply",
            Self::StaffReply => "staff_reply",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of message is being appended, with authorship built in
///
/// Customer-authored kinds carry no staff reference; a staff reply cannot
/// exist without one. This is the only way to construct a [`Message`], so
/// the type/author pairing rules hold by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    InitialInquiry,
    CustomerReply,
    StaffReply(StaffId),
}

impl MessageKind {
    /// The stored type tag for this kind
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::InitialInquiry => MessageType::InitialInquiry,
            Self::CustomerReply => MessageType::CustomerReply,
            Self::StaffReply(_) => MessageType::StaffReply,
        }
    }

    /// The author for this kind, if staff-authored
    #[must_use]
    pub const fn author(&self) -> Option<StaffId> {
        match self {
            Self::InitialInquiry | Self::CustomerReply => None,
            Self::StaffReply(staff) => Some(*staff),
        }
    }
}

/// One immutable row in a ticket's message thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: MessageId,
    /// Owning ticket; never changes
    pub ticket_id: TicketId,
    /// Author for staff replies, `None` for customer-authored rows
    pub author_staff_id: Option<StaffId>,
    /// Type tag
    pub message_type: MessageType,
    /// Subject line
    pub subject: String,
    /// Body text
    pub body: String,
    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message row for the given ticket
    #[must_use]
    pub fn new(
        ticket_id: TicketId,
        kind: MessageKind,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            ticket_id,
            author_staff_id: kind.author(),
            message_type: kind.message_type(),
            subject: subject.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}
