//! Handler for the `update` command
//!
//! The literal value `none` on `--assign` or `--notes` clears the field;
//! omitting the flag leaves it untouched.

use crate::cli::output::OutputFormatter;
use crate::core::{Priority, StaffId, Status};
use crate::error::Result;
use crate::lifecycle::TicketUpdate;

use super::common::HandlerContext;

pub fn handle_update_command(
    reference: &str,
    status: Option<&str>,
    priority: Option<&str>,
    assign: Option<&str>,
    notes: Option<&str>,
    config_path: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let context = HandlerContext::new(config_path)?;
    let id = context.resolve_ticket(reference)?;

    let update = TicketUpdate {
        status: status.map(str::parse::<Status>).transpose()?,
        priority: priority.map(str::parse::<Priority>).transpose()?,
        assigned_staff_id: assign
            .map(|value| {
                if value.eq_ignore_ascii_case("none") {
                    Ok(None)
                } else {
                    value.parse::<StaffId>().map(Some)
                }
            })
            .transpose()?,
        internal_notes: notes.map(|value| {
            if value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(value.to_string())
            }
        }),
    };

    let ticket = context.lifecycle.update_fields(&id, update)?;

    if formatter.is_json() {
        formatter.json(&ticket)?;
    } else {
        formatter.success(&format!("Updated ticket {}", ticket.number));
        formatter.ticket_detail(&ticket);
    }
    Ok(())
}
