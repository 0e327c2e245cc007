//! Handler for the `message` command (customer follow-up)

use crate::cli::output::OutputFormatter;
use crate::error::Result;

use super::common::HandlerContext;

pub fn handle_message_command(
    reference: &str,
    subject: &str,
    body: &str,
    config_path: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let context = HandlerContext::new(config_path)?;
    let id = context.resolve_ticket(reference)?;

    let message = context
        .lifecycle
        .append_customer_message(&id, subject, body)?;

    if formatter.is_json() {
        formatter.json(&message)?;
    } else {
        formatter.success(&format!("Message added ({})", message.id));
    }
    Ok(())
}
