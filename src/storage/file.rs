//! File-backed ticket storage
//!
//! Layout under the storage root:
//!
//! ```text
//! tickets/<ticket-id>.yaml   one document per ticket, messages embedded
//! numbers/<ticket-number>    empty marker files, the uniqueness index
//! locks/<day-prefix>.lock    day-scoped write-intent locks
//! ```
//!
//! A ticket and its initial message live in one YAML document written via
//! temp-file + rename, which is what makes creation all-or-nothing. The
//! `numbers/` index is claimed with `create_new`, so a racing writer that
//! slipped past the day lock still cannot commit a duplicate number.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::lock::LockFile;
use super::repository::{NumberSequence, TicketRepository};
use crate::core::{Ticket, TicketId, TicketNumber};
use crate::error::{InquiryDeskError, Result};

/// File-backed implementation of the storage seams
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a handle rooted at `root`
    ///
    /// Call [`FileStorage::init`] (or the CLI `init` command) before
    /// first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage directory structure; idempotent
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.tickets_dir())?;
        fs::create_dir_all(self.numbers_dir())?;
        fs::create_dir_all(self.locks_dir())?;
        Ok(())
    }

    /// The storage root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the storage layout exists at the root
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.tickets_dir().is_dir() && self.numbers_dir().is_dir() && self.locks_dir().is_dir()
    }

    fn tickets_dir(&self) -> PathBuf {
        self.root.join("tickets")
    }

    fn numbers_dir(&self) -> PathBuf {
        self.root.join("numbers")
    }

    fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    fn ticket_path(&self, id: &TicketId) -> PathBuf {
        self.tickets_dir().join(format!("{id}.yaml"))
    }

    // UUID names cannot collide with the day-prefix lock names
    fn ticket_lock_path(&self, id: &TicketId) -> PathBuf {
        self.locks_dir().join(format!("{id}.lock"))
    }

    /// Write a ticket document atomically (temp file + rename)
    fn write_ticket(&self, ticket: &Ticket) -> Result<()> {
        let yaml = serde_yaml::to_string(ticket)?;
        let path = self.ticket_path(&ticket.id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Claim a number in the uniqueness index
    ///
    /// `create_new` makes the claim atomic: a second claimant gets
    /// `AlreadyExists`, surfaced as `DuplicateNumber`. Claims are never
    /// released — a claim whose ticket write failed becomes a tolerated
    /// gap in the day's sequence, never a reusable number.
    fn claim_number(&self, number: &TicketNumber) -> Result<()> {
        let path = self.numbers_dir().join(number.as_str());
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(InquiryDeskError::DuplicateNumber {
                    number: number.to_string(),
                })
            },
            Err(err) => Err(err.into()),
        }
    }
}

impl TicketRepository for FileStorage {
    fn insert(&self, ticket: &Ticket) -> Result<()> {
        self.claim_number(&ticket.number)?;
        if self.ticket_path(&ticket.id).exists() {
            return Err(InquiryDeskError::custom(format!(
                "ticket {} already exists",
                ticket.id
            )));
        }
        self.write_ticket(ticket)?;
        debug!(ticket = %ticket.id, number = %ticket.number, "inserted ticket");
        Ok(())
    }

    fn save(&self, ticket: &Ticket) -> Result<()> {
        if !self.ticket_path(&ticket.id).exists() {
            return Err(InquiryDeskError::TicketNotFound {
                id: ticket.id.to_string(),
            });
        }
        self.write_ticket(ticket)
    }

    fn mutate(
        &self,
        id: &TicketId,
        f: &mut dyn FnMut(&mut Ticket) -> Result<()>,
    ) -> Result<Ticket> {
        let _guard = LockFile::acquire_default(self.ticket_lock_path(id))?;
        let mut ticket = self.load(id)?;
        f(&mut ticket)?;
        self.write_ticket(&ticket)?;
        Ok(ticket)
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        let path = self.ticket_path(id);
        let yaml = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                InquiryDeskError::TicketNotFound { id: id.to_string() }
            } else {
                err.into()
            }
        })?;
        Ok(serde_yaml::from_str(&yaml)?)
    }

    fn load_all(&self) -> Result<Vec<Ticket>> {
        let mut tickets = Vec::new();
        for entry in fs::read_dir(self.tickets_dir())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let yaml = fs::read_to_string(&path)?;
                tickets.push(serde_yaml::from_str(&yaml)?);
            }
        }
        Ok(tickets)
    }

    fn exists(&self, id: &TicketId) -> Result<bool> {
        Ok(self.ticket_path(id).exists())
    }

    fn find_by_number(&self, number: &TicketNumber) -> Result<Option<Ticket>> {
        let tickets = self.load_all()?;
        Ok(tickets.into_iter().find(|t| &t.number == number))
    }
}

impl NumberSequence for FileStorage {
    type Guard = LockFile;

    fn lock_prefix(&self, prefix: &str) -> Result<Self::Guard> {
        let name = format!("{}.lock", prefix.trim_end_matches('-'));
        LockFile::acquire_default(self.locks_dir().join(name))
    }

    fn max_suffix(&self, prefix: &str) -> Result<Option<u32>> {
        let mut max = None;
        for entry in fs::read_dir(self.numbers_dir())? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(prefix) {
                continue;
            }
            // Stray files that are not ticket numbers are ignored
            if let Ok(number) = TicketNumber::parse(name) {
                max = max.max(Some(number.suffix()));
            }
        }
        Ok(max)
    }
}
