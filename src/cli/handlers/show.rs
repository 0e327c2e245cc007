//! Handler for the `show` command

use crate::cli::output::OutputFormatter;
use crate::error::Result;

use super::common::HandlerContext;

pub fn handle_show_command(
    reference: &str,
    config_path: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let context = HandlerContext::new(config_path)?;
    let id = context.resolve_ticket(reference)?;
    let ticket = context.lifecycle.get(&id)?;
    let thread = context.lifecycle.thread(&id)?;

    if formatter.is_json() {
        formatter.json(&ticket)?;
    } else {
        formatter.ticket_detail(&ticket);
        formatter.info("");
        formatter.thread(&thread);
    }
    Ok(())
}
