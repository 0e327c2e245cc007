//! Output formatting for CLI results
//!
//! Human-readable text with optional color by default, machine-readable
//! JSON behind `--json`.

use colored::Colorize;
use serde::Serialize;

use crate::core::{Message, Ticket};
use crate::error::Result;

/// Formats command output according to the global flags
pub struct OutputFormatter {
    json: bool,
    no_color: bool,
}

impl OutputFormatter {
    /// Create a formatter from the `--json` and `--no-color` flags
    #[must_use]
    pub const fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    /// Whether JSON output was requested
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.json {
            return;
        }
        if self.no_color {
            println!("{message}");
        } else {
            println!("{}", message.green());
        }
    }

    /// Print an informational message
    pub fn info(&self, message: &str) {
        if self.json {
            return;
        }
        println!("{message}");
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        if self.no_color {
            eprintln!("Error: {message}");
        } else {
            eprintln!("{} {message}", "Error:".red().bold());
        }
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a one-line ticket summary
    pub fn ticket_line(&self, ticket: &Ticket) {
        if self.json {
            return;
        }
        if self.no_color {
            println!(
                "{}  [{}/{}]  {}  ({})",
                ticket.number, ticket.status, ticket.priority, ticket.customer_name, ticket.channel,
            );
        } else {
            println!(
                "{}  [{}/{}]  {}  ({})",
                ticket.number.to_string().cyan(),
                ticket.status.to_string().yellow(),
                ticket.priority,
                ticket.customer_name,
                ticket.channel,
            );
        }
    }

    /// Print a ticket's full detail block
    pub fn ticket_detail(&self, ticket: &Ticket) {
        if self.json {
            return;
        }
        self.info(&format!("Number:    {}", ticket.number));
        self.info(&format!("ID:        {}", ticket.id));
        self.info(&format!("Channel:   {}", ticket.channel));
        self.info(&format!("Status:    {}", ticket.status));
        self.info(&format!("Priority:  {}", ticket.priority));
        self.info(&format!("Customer:  {}", ticket.customer_name));
        if let Some(email) = &ticket.customer_email {
            self.info(&format!("Email:     {email}"));
        }
        if let Some(order) = &ticket.order_number {
            self.info(&format!("Order:     {order}"));
        }
        if let Some(staff) = &ticket.assigned_staff_id {
            self.info(&format!("Assignee:  {staff}"));
        }
        if let Some(notes) = &ticket.internal_notes {
            self.info(&format!("Notes:     {notes}"));
        }
        self.info(&format!("Created:   {}", ticket.created_at.format("%Y-%m-%d %H:%M:%S UTC")));
        self.info(&format!("Updated:   {}", ticket.updated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    /// Print a message thread, newest first
    pub fn thread(&self, messages: &[Message]) {
        if self.json {
            return;
        }
        if messages.is_empty() {
            self.info("No messages.");
            return;
        }
        for message in messages {
            let author = message
                .author_staff_id
                .map_or_else(|| "customer".to_string(), |id| format!("staff {id}"));
            self.info(&format!(
                "--- {} | {} | {}",
                message.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                message.message_type,
                author,
            ));
            self.info(&format!("    {}", message.subject));
            self.info(&format!("    {}", message.body));
        }
    }
}
