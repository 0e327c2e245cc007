//! Shared handler plumbing

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::core::{TicketId, TicketNumber};
use crate::error::{InquiryDeskError, Result};
use crate::lifecycle::{CategoryDirectory, StaffDirectory, TicketLifecycle};
use crate::notify::{LogSink, NotificationSink};
use crate::storage::FileStorage;

/// Common context for all handler operations
pub struct HandlerContext {
    pub config: Arc<Config>,
    pub lifecycle: TicketLifecycle<FileStorage>,
}

impl HandlerContext {
    /// Build the engine from configuration
    ///
    /// Fails with a hint toward `init` when the data directory is absent.
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = Arc::new(Self::load_config(config_path)?);
        let storage = FileStorage::new(&config.storage.path);
        if !storage.is_initialized() {
            return Err(InquiryDeskError::custom(format!(
                "data directory '{}' is not initialized; run 'inquiry-desk init' first",
                config.storage.path.display()
            )));
        }

        let lifecycle = TicketLifecycle::new(
            storage,
            Arc::clone(&config) as Arc<dyn CategoryDirectory>,
            Arc::clone(&config) as Arc<dyn StaffDirectory>,
            Arc::new(LogSink) as Arc<dyn NotificationSink>,
        );
        Ok(Self { config, lifecycle })
    }

    pub(crate) fn load_config(config_path: Option<&str>) -> Result<Config> {
        match config_path {
            Some(path) => Config::load_from(Path::new(path)),
            None => Config::load_or_default(),
        }
    }

    /// Resolve a ticket reference: a UUID or a ticket number
    pub fn resolve_ticket(&self, reference: &str) -> Result<TicketId> {
        if let Ok(id) = reference.parse::<TicketId>() {
            return Ok(id);
        }
        if let Ok(number) = TicketNumber::parse(reference) {
            if let Some(ticket) = self.lifecycle.find_by_number(&number)? {
                return Ok(ticket.id);
            }
        }
        Err(InquiryDeskError::TicketNotFound {
            id: reference.to_string(),
        })
    }
}
