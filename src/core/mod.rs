//! Core domain types: tickets, messages, and ticket numbers

pub mod builders;
pub mod message;
pub mod number;
pub mod ticket;

pub use builders::TicketBuilder;
pub use message::{Message, MessageId, MessageKind, MessageType};
pub use number::{MAX_DAILY_SUFFIX, TicketNumber};
pub use ticket::{CategoryId, Channel, Priority, StaffId, Status, Ticket, TicketId};
