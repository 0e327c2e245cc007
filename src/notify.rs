//! Outbound notification intents
//!
//! The lifecycle engine decides *that* and *what* to notify; transport is
//! someone else's problem. Intents are handed to a [`NotificationSink`]
//! only after the triggering write has committed, so a failed create can
//! never leak a "ticket received" mail.

use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

use crate::core::TicketNumber;

/// Which template the transport layer should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Acknowledgement that a form inquiry was received
    Received,
    /// A staff reply was posted to the thread
    ReplySent,
}

/// A structured "send X to Y" request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationIntent {
    /// Template selector
    pub kind: NotificationKind,
    /// Recipient email address
    pub to: String,
    /// The ticket the notification concerns
    pub ticket_number: TicketNumber,
    /// Subject of the triggering message
    pub subject: String,
    /// Body of the triggering message
    pub body: String,
}

/// Receiver boundary for notification intents
///
/// Implementations must not fail the triggering operation: by the time an
/// intent is emitted the write has already committed.
pub trait NotificationSink: Send + Sync {
    /// Hand off one intent for delivery
    fn deliver(&self, intent: NotificationIntent);
}

/// Sink that logs intents through `tracing`
///
/// Stand-in transport for deployments that wire real delivery elsewhere.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, intent: NotificationIntent) {
        info!(
            kind = ?intent.kind,
            to = %intent.to,
            ticket = %intent.ticket_number,
            subject = %intent.subject,
            "notification intent"
        );
    }
}

/// Sink that records every intent for later inspection
///
/// Used by tests asserting on emission counts and addressing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    intents: Mutex<Vec<NotificationIntent>>,
}

impl RecordingSink {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far
    #[must_use]
    pub fn delivered(&self) -> Vec<NotificationIntent> {
        self.intents.lock().expect("sink poisoned").clone()
    }

    /// Number of intents delivered so far
    #[must_use]
    pub fn count(&self) -> usize {
        self.intents.lock().expect("sink poisoned").len()
    }
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, intent: NotificationIntent) {
        self.intents.lock().expect("sink poisoned").push(intent);
    }
}
