//! Handler for the `list` command

use crate::cli::output::OutputFormatter;
use crate::core::{Priority, Status};
use crate::error::Result;

use super::common::HandlerContext;

pub fn handle_list_command(
    status: Option<&str>,
    priority: Option<&str>,
    limit: Option<usize>,
    config_path: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let context = HandlerContext::new(config_path)?;
    let status = status.map(str::parse::<Status>).transpose()?;
    let priority = priority.map(str::parse::<Priority>).transpose()?;

    let mut tickets = context.lifecycle.list()?;
    tickets.retain(|ticket| {
        status.is_none_or(|s| ticket.status == s) && priority.is_none_or(|p| ticket.priority == p)
    });
    if let Some(limit) = limit {
        tickets.truncate(limit);
    }

    if formatter.is_json() {
        formatter.json(&tickets)?;
    } else if tickets.is_empty() {
        formatter.info("No tickets found.");
    } else {
        for ticket in &tickets {
            formatter.ticket_line(ticket);
        }
        formatter.info(&format!("\n{} ticket(s)", tickets.len()));
    }
    Ok(())
}
