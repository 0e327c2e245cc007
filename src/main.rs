//! inquiry-desk - Customer inquiry ticketing CLI
//!
//! Entry point: parses command-line arguments and dispatches to the
//! command handlers.

use clap::Parser;
use inquiry_desk::cli::{Cli, Commands, OutputFormatter, handlers};
use inquiry_desk::error::{InquiryDeskError, Result};
use std::process;

fn main() {
    let cli = Cli::parse();

    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Init => handlers::handle_init_command(config, formatter),
        Commands::Create {
            channel,
            name,
            email,
            subject,
            body,
            category,
            order_number,
            staff_entry,
            status,
            priority,
            assign,
            notes,
        } => {
            let staff_entry = staff_entry.then_some(handlers::StaffEntryParams {
                status,
                priority,
                assign,
                notes,
            });
            handlers::handle_create_command(
                handlers::CreateParams {
                    channel,
                    name,
                    email,
                    subject,
                    body,
                    category,
                    order_number,
                    staff_entry,
                },
                config,
                formatter,
            )
        },
        Commands::List {
            status,
            priority,
            limit,
        } => handlers::handle_list_command(
            status.as_deref(),
            priority.as_deref(),
            limit,
            config,
            formatter,
        ),
        Commands::Show { ticket } => handlers::handle_show_command(&ticket, config, formatter),
        Commands::Update {
            ticket,
            status,
            priority,
            assign,
            notes,
        } => handlers::handle_update_command(
            &ticket,
            status.as_deref(),
            priority.as_deref(),
            assign.as_deref(),
            notes.as_deref(),
            config,
            formatter,
        ),
        Commands::Reply {
            ticket,
            staff,
            subject,
            body,
        } => handlers::handle_reply_command(&ticket, &staff, &subject, &body, config, formatter),
        Commands::Message {
            ticket,
            subject,
            body,
        } => handlers::handle_message_command(&ticket, &subject, &body, config, formatter),
    }
}

/// Format errors for the terminal, field-by-field for validation failures
fn handle_error(error: &InquiryDeskError, formatter: &OutputFormatter) {
    match error {
        InquiryDeskError::Validation(errors) => {
            formatter.error("validation failed");
            for (field, messages) in errors.iter() {
                for message in messages {
                    formatter.error(&format!("  {field}: {message}"));
                }
            }
        },
        _ => formatter.error(&error.to_string()),
    }

    if formatter.is_json() {
        let fields = match error {
            InquiryDeskError::Validation(errors) => {
                serde_json::to_value(errors).unwrap_or(serde_json::Value::Null)
            },
            _ => serde_json::Value::Null,
        };
        let _ = formatter.json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "fields": fields,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let _cli = Cli::parse_from(["inquiry-desk", "init"]);
        let _cli = Cli::parse_from(["inquiry-desk", "list"]);
        let _cli = Cli::parse_from([
            "inquiry-desk",
            "create",
            "--name",
            "Yamada Taro",
            "--category",
            "0c7e4d2e-1111-4a5b-9d0e-2f3a4b5c6d7e",
        ]);
        let _cli = Cli::parse_from(["inquiry-desk", "show", "INQ-20250115-0001"]);
    }
}
