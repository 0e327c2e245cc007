//! Handler for the `reply` command

use crate::cli::output::OutputFormatter;
use crate::core::StaffId;
use crate::error::Result;

use super::common::HandlerContext;

pub fn handle_reply_command(
    reference: &str,
    staff: &str,
    subject: &str,
    body: &str,
    config_path: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let context = HandlerContext::new(config_path)?;
    let id = context.resolve_ticket(reference)?;
    let staff_id: StaffId = staff.parse()?;

    let message = context.lifecycle.reply(&id, subject, body, staff_id)?;

    if formatter.is_json() {
        formatter.json(&message)?;
    } else {
        formatter.success(&format!("Reply posted ({})", message.id));
    }
    Ok(())
}
