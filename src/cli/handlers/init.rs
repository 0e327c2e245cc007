//! Handler for the `init` command

use crate::cli::output::OutputFormatter;
use crate::error::Result;
use crate::storage::FileStorage;

use super::common::HandlerContext;

/// Create the ticket data directory from configuration; idempotent
pub fn handle_init_command(config_path: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let config = HandlerContext::load_config(config_path)?;
    let storage = FileStorage::new(&config.storage.path);
    let already = storage.is_initialized();
    storage.init()?;

    if formatter.is_json() {
        formatter.json(&serde_json::json!({
            "status": "ok",
            "path": config.storage.path,
            "already_initialized": already,
        }))?;
    } else if already {
        formatter.info(&format!(
            "Data directory '{}' already initialized",
            config.storage.path.display()
        ));
    } else {
        formatter.success(&format!(
            "Initialized data directory '{}'",
            config.storage.path.display()
        ));
    }
    Ok(())
}
