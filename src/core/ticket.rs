//! Ticket domain types
//!
//! A [`Ticket`] is one customer inquiry: its intake channel, customer
//! details, triage fields, and the embedded message thread. Tickets are
//! created once (atomically with their allocated number and optional
//! initial message), mutated in place by field updates and message
//! appends, and never deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use super::number::TicketNumber;
use crate::error::InquiryDeskError;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random ID
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InquiryDeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|_| {
                    InquiryDeskError::custom(format!(
                        concat!("invalid ", stringify!($name), ": {}"),
                        s
                    ))
                })
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a ticket
    TicketId
}
uuid_id! {
    /// Reference to a staff user (lifecycle external to this crate)
    StaffId
}
uuid_id! {
    /// Reference to an inquiry category (lifecycle external to this crate)
    CategoryId
}

macro_rules! string_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// The stable string value persisted and exposed to callers
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InquiryDeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(InquiryDeskError::custom(format!(
                        concat!(
                            "invalid ",
                            stringify!($name),
                            " '{}', expected one of:",
                            $(" ", $value),+
                        ),
                        other
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// How the inquiry reached us
    ///
    /// Form tickets always carry a customer email and an initial message;
    /// phone tickets (staff-logged calls) may omit both.
    Channel {
        Form => "form",
        Phone => "phone",
    }
}

string_enum! {
    /// Current handling state
    ///
    /// This is a "current value" attribute, not a workflow: any status may
    /// move to any other status directly, closed back to pending included.
    Status {
        Pending => "pending",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

string_enum! {
    /// Triage priority, equally unconstrained between values
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A customer support ticket with its embedded message thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Opaque unique identifier, assigned at creation
    pub id: TicketId,
    /// Human-readable date-scoped number; globally unique, immutable
    pub number: TicketNumber,
    /// Intake channel
    pub channel: Channel,
    /// Category active at creation time
    pub category_id: CategoryId,
    /// Customer name (never empty)
    pub customer_name: String,
    /// Customer email; always present on form tickets
    pub customer_email: Option<String>,
    /// Free-text order reference
    pub order_number: Option<String>,
    /// Current status
    pub status: Status,
    /// Current priority
    pub priority: Priority,
    /// Assigned staff member, if any
    pub assigned_staff_id: Option<StaffId>,
    /// Staff-only notes
    pub internal_notes: Option<String>,
    /// Message thread, in append order
    pub messages: Vec<Message>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// The thread ordered newest-first for display
    ///
    /// Ties on `created_at` keep later appends first, so a reply made in
    /// the same instant as an earlier message still sorts above it.
    #[must_use]
    pub fn thread_newest_first(&self) -> Vec<Message> {
        let mut thread = self.messages.clone();
        thread.reverse();
        thread.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        thread
    }

    /// Mark the ticket as mutated now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
