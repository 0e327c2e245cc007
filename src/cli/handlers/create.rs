//! Handler for the `create` command
//!
//! Maps CLI flags onto the channel-dependent intake types before handing
//! off to the lifecycle engine.

use crate::cli::output::OutputFormatter;
use crate::core::{CategoryId, Channel, Priority, StaffId, Status};
use crate::error::Result;
use crate::lifecycle::{ChannelIntake, CreateTicket, StaffEntry};

use super::common::HandlerContext;

/// Parameters for creating a ticket
pub struct CreateParams {
    pub channel: String,
    pub name: String,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub category: String,
    pub order_number: Option<String>,
    pub staff_entry: Option<StaffEntryParams>,
}

/// Staff-entry flags, present only with `--staff-entry`
pub struct StaffEntryParams {
    pub status: String,
    pub priority: String,
    pub assign: Option<String>,
    pub notes: Option<String>,
}

pub fn handle_create_command(
    params: CreateParams,
    config_path: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let context = HandlerContext::new(config_path)?;
    let input = build_input(params)?;
    let ticket = context.lifecycle.create(input)?;

    if formatter.is_json() {
        formatter.json(&ticket)?;
    } else {
        formatter.success(&format!("Created ticket {}", ticket.number));
        formatter.ticket_detail(&ticket);
    }
    Ok(())
}

fn build_input(params: CreateParams) -> Result<CreateTicket> {
    let channel: Channel = params.channel.parse()?;
    let category_id: CategoryId = params.category.parse()?;

    let intake = match channel {
        Channel::Form => ChannelIntake::Form {
            customer_email: params.email.unwrap_or_default(),
            subject: params.subject.unwrap_or_default(),
            body: params.body.unwrap_or_default(),
        },
        Channel::Phone => ChannelIntake::Phone {
            customer_email: params.email,
            subject: params.subject,
            body: params.body,
        },
    };

    let staff_entry = params
        .staff_entry
        .map(|entry| -> Result<StaffEntry> {
            Ok(StaffEntry {
                status: entry.status.parse::<Status>()?,
                priority: entry.priority.parse::<Priority>()?,
                assigned_staff_id: entry
                    .assign
                    .map(|id| id.parse::<StaffId>())
                    .transpose()?,
                internal_notes: entry.notes,
            })
        })
        .transpose()?;

    Ok(CreateTicket {
        intake,
        category_id,
        customer_name: params.name,
        order_number: params.order_number,
        staff_entry,
    })
}
