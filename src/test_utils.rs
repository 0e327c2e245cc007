//! Shared unit-test fixtures
//!
//! [`TestDesk`] wires a [`TicketLifecycle`] over an in-memory store with a
//! recording notification sink and fixed category/staff registries.
//! [`MemoryStore`] can inject uniqueness conflicts and storage failures
//! that are hard to provoke through the real file backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::{CategoryId, StaffId, Ticket, TicketId, TicketNumber};
use crate::error::{InquiryDeskError, Result};
use crate::lifecycle::{
    CategoryDirectory, CategoryState, ChannelIntake, CreateTicket, StaffDirectory, TicketLifecycle,
};
use crate::notify::RecordingSink;
use crate::storage::{NumberSequence, TicketRepository};

/// In-memory storage double implementing both storage seams
///
/// Inserts honor the number uniqueness constraint like the file backend;
/// `inject_duplicate_conflicts` and `inject_io_errors` queue failures for
/// the next inserts to exercise the create retry loop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: Mutex<HashMap<TicketId, Ticket>>,
    duplicate_conflicts: AtomicU32,
    io_errors: AtomicU32,
    lock_timeouts: AtomicU32,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` inserts with a uniqueness violation
    pub fn inject_duplicate_conflicts(&self, n: u32) {
        self.duplicate_conflicts.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` inserts with an I/O error
    pub fn inject_io_errors(&self, n: u32) {
        self.io_errors.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` prefix-lock acquisitions with a timeout
    pub fn inject_lock_timeouts(&self, n: u32) {
        self.lock_timeouts.store(n, Ordering::SeqCst);
    }

    fn take_injected(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl TicketRepository for MemoryStore {
    fn insert(&self, ticket: &Ticket) -> Result<()> {
        if Self::take_injected(&self.io_errors) {
            return Err(InquiryDeskError::Io(std::io::Error::other(
                "injected storage failure",
            )));
        }
        if Self::take_injected(&self.duplicate_conflicts) {
            return Err(InquiryDeskError::DuplicateNumber {
                number: ticket.number.to_string(),
            });
        }

        let mut tickets = self.tickets.lock().expect("store poisoned");
        if tickets.values().any(|t| t.number == ticket.number) {
            return Err(InquiryDeskError::DuplicateNumber {
                number: ticket.number.to_string(),
            });
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    fn save(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets = self.tickets.lock().expect("store poisoned");
        if !tickets.contains_key(&ticket.id) {
            return Err(InquiryDeskError::TicketNotFound {
                id: ticket.id.to_string(),
            });
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    fn mutate(
        &self,
        id: &TicketId,
        f: &mut dyn FnMut(&mut Ticket) -> Result<()>,
    ) -> Result<Ticket> {
        // The map mutex doubles as the per-ticket write lock
        let mut tickets = self.tickets.lock().expect("store poisoned");
        let ticket = tickets
            .get_mut(id)
            .ok_or_else(|| InquiryDeskError::TicketNotFound { id: id.to_string() })?;
        f(ticket)?;
        Ok(ticket.clone())
    }

    fn load(&self, id: &TicketId) -> Result<Ticket> {
        self.tickets
            .lock()
            .expect("store poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| InquiryDeskError::TicketNotFound { id: id.to_string() })
    }

    fn load_all(&self) -> Result<Vec<Ticket>> {
        Ok(self
            .tickets
            .lock()
            .expect("store poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn exists(&self, id: &TicketId) -> Result<bool> {
        Ok(self.tickets.lock().expect("store poisoned").contains_key(id))
    }

    fn find_by_number(&self, number: &TicketNumber) -> Result<Option<Ticket>> {
        Ok(self
            .tickets
            .lock()
            .expect("store poisoned")
            .values()
            .find(|t| t.number == *number)
            .cloned())
    }
}

impl NumberSequence for MemoryStore {
    // Single-process map behind a mutex, nothing further to lock
    type Guard = ();

    fn lock_prefix(&self, prefix: &str) -> Result<Self::Guard> {
        if Self::take_injected(&self.lock_timeouts) {
            return Err(InquiryDeskError::LockTimeout {
                path: format!("{}.lock", prefix.trim_end_matches('-')),
            });
        }
        Ok(())
    }

    fn max_suffix(&self, prefix: &str) -> Result<Option<u32>> {
        Ok(self
            .tickets
            .lock()
            .expect("store poisoned")
            .values()
            .filter(|t| t.number.day_prefix() == prefix)
            .map(|t| t.number.suffix())
            .max())
    }
}

/// Fixed category/staff registries for tests
#[derive(Debug, Default)]
pub struct StaticDirectory {
    pub active_categories: Vec<CategoryId>,
    pub inactive_categories: Vec<CategoryId>,
    pub staff: Vec<StaffId>,
}

impl CategoryDirectory for StaticDirectory {
    fn category_state(&self, id: &CategoryId) -> Result<CategoryState> {
        if self.active_categories.contains(id) {
            Ok(CategoryState::Active)
        } else if self.inactive_categories.contains(id) {
            Ok(CategoryState::Inactive)
        } else {
            Ok(CategoryState::NotFound)
        }
    }
}

impl StaffDirectory for StaticDirectory {
    fn staff_exists(&self, id: &StaffId) -> Result<bool> {
        Ok(self.staff.contains(id))
    }
}

/// A fully wired lifecycle engine over [`MemoryStore`]
pub struct TestDesk {
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub category: CategoryId,
    pub inactive_category: CategoryId,
    pub staff: StaffId,
    pub lifecycle: TicketLifecycle<Arc<MemoryStore>>,
}

impl TestDesk {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::new());
        let category = CategoryId::new();
        let inactive_category = CategoryId::new();
        let staff = StaffId::new();

        let directory = Arc::new(StaticDirectory {
            active_categories: vec![category],
            inactive_categories: vec![inactive_category],
            staff: vec![staff],
        });

        let lifecycle = TicketLifecycle::new(
            Arc::clone(&store),
            directory.clone() as Arc<dyn CategoryDirectory>,
            directory as Arc<dyn StaffDirectory>,
            Arc::clone(&sink) as Arc<dyn crate::notify::NotificationSink>,
        );

        Self {
            store,
            sink,
            category,
            inactive_category,
            staff,
            lifecycle,
        }
    }

    /// A valid form submission against the active category
    #[must_use]
    pub fn form_input(&self, email: &str, subject: &str, body: &str) -> CreateTicket {
        CreateTicket {
            intake: ChannelIntake::Form {
                customer_email: email.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            },
            category_id: self.category,
            customer_name: "Yamada Taro".to_string(),
            order_number: None,
            staff_entry: None,
        }
    }

    /// A staff-logged phone ticket against the active category
    #[must_use]
    pub fn phone_input(
        &self,
        email: Option<&str>,
        subject: Option<&str>,
        body: Option<&str>,
    ) -> CreateTicket {
        CreateTicket {
            intake: ChannelIntake::Phone {
                customer_email: email.map(String::from),
                subject: subject.map(String::from),
                body: body.map(String::from),
            },
            category_id: self.category,
            customer_name: "Sato Hanako".to_string(),
            order_number: None,
            staff_entry: None,
        }
    }
}

impl Default for TestDesk {
    fn default() -> Self {
        Self::new()
    }
}
