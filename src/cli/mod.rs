//! Command-line interface
//!
//! Argument definitions live here; the business logic sits in
//! [`handlers`], one module per command, all funneling through the
//! lifecycle engine rather than touching storage directly.

pub mod handlers;
pub mod output;

use clap::{Parser, Subcommand};

pub use output::OutputFormatter;

/// Customer inquiry ticketing for small support teams
#[derive(Parser)]
#[command(name = "inquiry-desk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "INQUIRY_DESK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the ticket data directory
    Init,

    /// Create a ticket from a form submission or a logged phone call
    Create {
        /// Intake channel (form or phone)
        #[arg(long, default_value = "form")]
        channel: String,

        /// Customer name
        #[arg(long)]
        name: String,

        /// Customer email (required for form tickets)
        #[arg(long)]
        email: Option<String>,

        /// Subject of the initial message
        #[arg(long)]
        subject: Option<String>,

        /// Body of the initial message
        #[arg(long)]
        body: Option<String>,

        /// Category ID
        #[arg(long)]
        category: String,

        /// Related order number
        #[arg(long)]
        order_number: Option<String>,

        /// Record staff-entry fields (status, priority, assignment, notes)
        #[arg(long)]
        staff_entry: bool,

        /// Initial status (staff entry only)
        #[arg(long, default_value = "pending")]
        status: String,

        /// Initial priority (staff entry only)
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Assign to a staff member by ID (staff entry only)
        #[arg(long)]
        assign: Option<String>,

        /// Internal notes (staff entry only)
        #[arg(long)]
        notes: Option<String>,
    },

    /// List tickets, newest first
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,

        /// Limit the number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one ticket and its message thread
    Show {
        /// Ticket ID or ticket number (e.g. INQ-20250115-0001)
        ticket: String,
    },

    /// Update a ticket's status, priority, assignment, or notes
    Update {
        /// Ticket ID or ticket number
        ticket: String,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// New priority
        #[arg(long)]
        priority: Option<String>,

        /// Assign to a staff member by ID, or "none" to unassign
        #[arg(long)]
        assign: Option<String>,

        /// Replace internal notes, or "none" to clear them
        #[arg(long)]
        notes: Option<String>,
    },

    /// Post a staff reply (notifies the customer)
    Reply {
        /// Ticket ID or ticket number
        ticket: String,

        /// Authoring staff member ID
        #[arg(long)]
        staff: String,

        /// Reply subject
        #[arg(long)]
        subject: String,

        /// Reply body
        #[arg(long)]
        body: String,
    },

    /// Append a customer follow-up message
    Message {
        /// Ticket ID or ticket number
        ticket: String,

        /// Message subject
        #[arg(long)]
        subject: String,

        /// Message body
        #[arg(long)]
        body: String,
    },
}
