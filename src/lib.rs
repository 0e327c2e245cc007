//! inquiry-desk - Customer inquiry ticketing for small support teams
//!
//! This crate provides the ticket lifecycle engine behind a support desk:
//! - Date-scoped human-readable ticket numbers (`INQ-YYYYMMDD-NNNN`)
//! - Channel-aware intake for public form submissions and staff-logged calls
//! - Append-only message threads on every ticket
//! - Notification intents emitted only after the triggering write commits

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::map_unwrap_or)]

//! # Concurrent Safety
//!
//! Ticket number allocation is safe under concurrent creation. Same-day
//! writers serialize on a per-day lock file, the number sequence is
//! re-read under that lock, and a storage-level uniqueness constraint
//! backs the lock up; a constraint violation retries the whole creation
//! with a freshly computed number.
//!
//! # Example
//!
//! ```rust,ignore
//! use inquiry_desk::lifecycle::{ChannelIntake, CreateTicket, TicketLifecycle};
//! use inquiry_desk::storage::FileStorage;
//!
//! let storage = FileStorage::new(".inquiry-desk");
//! storage.init()?;
//!
//! let ticket = lifecycle.create(CreateTicket {
//!     intake: ChannelIntake::Form {
//!         customer_email: "taro@example.com".into(),
//!         subject: "Where is my order?".into(),
//!         body: "Ordered two weeks ago, nothing arrived.".into(),
//!     },
//!     category_id,
//!     customer_name: "Yamada Taro".into(),
//!     order_number: Some("ORD-1234".into()),
//!     staff_entry: None,
//! })?;
//! assert!(ticket.number.as_str().starts_with("INQ-"));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{InquiryDeskError, Result};
