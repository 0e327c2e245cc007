//! The ticket lifecycle engine
//!
//! [`TicketLifecycle`] owns ticket creation (number allocation inside the
//! same transaction, channel-dependent validation, optional initial
//! message), partial field updates, and reply/customer-message appends,
//! and emits notification intents after the triggering write commits.
//!
//! Category and staff lookups go through the [`CategoryDirectory`] and
//! [`StaffDirectory`] collaborator traits; their CRUD lives outside this
//! crate.

pub mod allocator;
pub mod thread;
pub mod validate;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::core::{
    CategoryId, Channel, Message, MessageKind, Priority, StaffId, Status, Ticket, TicketBuilder,
    TicketId, TicketNumber,
};
use crate::error::{InquiryDeskError, Result, ValidationErrors};
use crate::notify::{NotificationIntent, NotificationKind, NotificationSink};
use crate::storage::{NumberSequence, TicketRepository};

pub use allocator::{Allocation, TicketNumberAllocator};
pub use thread::MessageThread;

/// Total creation attempts before allocation is declared failed
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// Category lookup result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryState {
    Active,
    Inactive,
    NotFound,
}

/// Category existence/active-state check (CRUD external to this crate)
pub trait CategoryDirectory: Send + Sync {
    fn category_state(&self, id: &CategoryId) -> Result<CategoryState>;
}

/// Staff-user existence check (CRUD external to this crate)
pub trait StaffDirectory: Send + Sync {
    fn staff_exists(&self, id: &StaffId) -> Result<bool>;
}

/// Channel-dependent intake fields
///
/// The variant carries the channel's requirements in its shape: a form
/// submission cannot be represented without email, subject, and body,
/// while a staff-logged phone call may omit all three.
#[derive(Debug, Clone)]
pub enum ChannelIntake {
    /// Public form submission
    Form {
        customer_email: String,
        subject: String,
        body: String,
    },
    /// Staff-logged phone call
    Phone {
        customer_email: Option<String>,
        subject: Option<String>,
        body: Option<String>,
    },
}

impl ChannelIntake {
    /// The stored channel for this intake
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Form { .. } => Channel::Form,
            Self::Phone { .. } => Channel::Phone,
        }
    }
}

/// Privileged staff-entry fields on creation
///
/// The public form path never carries these; the staff path supplies all
/// of them explicitly (mirroring the staff intake form).
#[derive(Debug, Clone)]
pub struct StaffEntry {
    pub status: Status,
    pub priority: Priority,
    pub assigned_staff_id: Option<StaffId>,
    pub internal_notes: Option<String>,
}

/// Input to [`TicketLifecycle::create`]
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub intake: ChannelIntake,
    pub category_id: CategoryId,
    pub customer_name: String,
    pub order_number: Option<String>,
    pub staff_entry: Option<StaffEntry>,
}

/// Partial update for [`TicketLifecycle::update_fields`]
///
/// Outer `None` means "leave untouched". For assignment and notes the
/// inner option distinguishes explicit clearing (`Some(None)`, e.g.
/// unassignment) from absence.
#[derive(Debug, Clone, Default)]
pub struct TicketUpdate {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assigned_staff_id: Option<Option<StaffId>>,
    pub internal_notes: Option<Option<String>>,
}

/// The lifecycle engine
///
/// Generic over the storage seam so tests can inject conflict and failure
/// behavior; collaborator boundaries are trait objects.
pub struct TicketLifecycle<R> {
    store: R,
    categories: Arc<dyn CategoryDirectory>,
    staff: Arc<dyn StaffDirectory>,
    notifier: Arc<dyn NotificationSink>,
}

impl<R: TicketRepository + NumberSequence> TicketLifecycle<R> {
    /// Create an engine over a storage backend and its collaborators
    pub fn new(
        store: R,
        categories: Arc<dyn CategoryDirectory>,
        staff: Arc<dyn StaffDirectory>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            categories,
            staff,
            notifier,
        }
    }

    /// Create a ticket dated today
    pub fn create(&self, input: CreateTicket) -> Result<Ticket> {
        self.create_on(input, Utc::now().date_naive())
    }

    /// Create a ticket with its number allocated for the given day
    ///
    /// Number allocation, the ticket insert, and the optional initial
    /// message are one all-or-nothing unit. A storage uniqueness
    /// violation retries the whole unit with a freshly computed number,
    /// up to [`MAX_ALLOCATION_ATTEMPTS`] total attempts; any other
    /// storage error aborts immediately. Callers must not re-invoke
    /// create on failure — the internal retry is the only one, which
    /// keeps customer-facing side effects single-shot.
    pub fn create_on(&self, input: CreateTicket, day: NaiveDate) -> Result<Ticket> {
        let input = normalize_intake(input);
        self.validate_create(&input)?;

        let prefix = TicketNumber::prefix_for(day);
        let allocator = TicketNumberAllocator::new(&self.store);

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let allocation = match allocator.allocate(day) {
                Ok(allocation) => allocation,
                // A lock/transaction timeout takes the same fatal
                // allocation route as retry exhaustion
                Err(InquiryDeskError::LockTimeout { .. }) => {
                    return Err(InquiryDeskError::AllocationFailed {
                        prefix,
                        attempts: attempt,
                    });
                },
                Err(err) => return Err(err),
            };

            let ticket = assemble_ticket(&input, allocation.number.clone())?;
            match self.store.insert(&ticket) {
                Ok(()) => {
                    drop(allocation);
                    info!(ticket = %ticket.id, number = %ticket.number, channel = %ticket.channel, "created ticket");
                    self.emit_received(&ticket);
                    return Ok(ticket);
                },
                Err(InquiryDeskError::DuplicateNumber { number }) => {
                    warn!(attempt, %number, "ticket number collided, recomputing");
                },
                Err(err) => return Err(err),
            }
        }

        warn!(%prefix, attempts = MAX_ALLOCATION_ATTEMPTS, "ticket number allocation exhausted");
        Err(InquiryDeskError::AllocationFailed {
            prefix,
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Apply a partial update; absent fields stay untouched
    ///
    /// Any status/priority value may replace any other: these are current
    /// values, not a workflow with forbidden edges. Updates emit no
    /// notifications.
    pub fn update_fields(&self, id: &TicketId, update: TicketUpdate) -> Result<Ticket> {
        if let Some(Some(staff_id)) = &update.assigned_staff_id {
            if !self.staff.staff_exists(staff_id)? {
                return Err(InquiryDeskError::field("staff_id", "is unknown"));
            }
        }

        // Applied under the ticket's write lock so a concurrent append
        // cannot be overwritten by this load-modify-save
        let ticket = self.store.mutate(id, &mut |ticket| {
            if let Some(status) = update.status {
                ticket.status = status;
            }
            if let Some(priority) = update.priority {
                ticket.priority = priority;
            }
            if let Some(assignment) = update.assigned_staff_id {
                ticket.assigned_staff_id = assignment;
            }
            if let Some(notes) = &update.internal_notes {
                ticket.internal_notes = notes.clone();
            }
            ticket.touch();
            Ok(())
        })?;

        info!(ticket = %ticket.id, status = %ticket.status, priority = %ticket.priority, "updated ticket fields");
        Ok(ticket)
    }

    /// Append a staff reply and emit a `reply_sent` intent
    ///
    /// The ticket must have a customer email on file; a phone ticket
    /// without one cannot receive an emailed reply, and that surfaces as
    /// a field-level error on `customer_email` even though the field is
    /// ticket state rather than caller input.
    pub fn reply(
        &self,
        id: &TicketId,
        subject: &str,
        body: &str,
        staff_id: StaffId,
    ) -> Result<Message> {
        let ticket = self.store.load(id)?;

        let mut errors = ValidationErrors::new();
        validate::require(&mut errors, "subject", subject);
        validate::max_chars(&mut errors, "subject", subject, validate::SUBJECT_MAX);
        validate::require(&mut errors, "body", body);
        errors.into_result()?;

        if !self.staff.staff_exists(&staff_id)? {
            return Err(InquiryDeskError::field("staff_id", "is unknown"));
        }
        let to = require_customer_email(&ticket)?;

        let message =
            MessageThread::new(&self.store).append(id, MessageKind::StaffReply(staff_id), subject, body)?;

        self.notifier.deliver(NotificationIntent {
            kind: NotificationKind::ReplySent,
            to,
            ticket_number: ticket.number.clone(),
            subject: message.subject.clone(),
            body: message.body.clone(),
        });
        Ok(message)
    }

    /// Append a customer follow-up message
    ///
    /// Same registered-email precondition as [`TicketLifecycle::reply`],
    /// surfaced the same way; emits no notification (customer
    /// self-service).
    pub fn append_customer_message(
        &self,
        id: &TicketId,
        subject: &str,
        body: &str,
    ) -> Result<Message> {
        let ticket = self.store.load(id)?;

        let mut errors = ValidationErrors::new();
        validate::require(&mut errors, "subject", subject);
        validate::max_chars(&mut errors, "subject", subject, validate::SUBJECT_MAX);
        validate::require(&mut errors, "body", body);
        errors.into_result()?;

        require_customer_email(&ticket)?;

        MessageThread::new(&self.store).append(id, MessageKind::CustomerReply, subject, body)
    }

    /// Load one ticket
    pub fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.store.load(id)
    }

    /// Look a ticket up by its human-readable number
    pub fn find_by_number(&self, number: &TicketNumber) -> Result<Option<Ticket>> {
        self.store.find_by_number(number)
    }

    /// All tickets, newest first
    pub fn list(&self) -> Result<Vec<Ticket>> {
        let mut tickets = self.store.load_all()?;
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    /// The ticket's thread, newest first
    pub fn thread(&self, id: &TicketId) -> Result<Vec<Message>> {
        MessageThread::new(&self.store).read_newest_first(id)
    }

    fn validate_create(&self, input: &CreateTicket) -> Result<()> {
        let mut errors = ValidationErrors::new();

        validate::require(&mut errors, "customer_name", &input.customer_name);
        validate::max_chars(
            &mut errors,
            "customer_name",
            &input.customer_name,
            validate::CUSTOMER_NAME_MAX,
        );
        if let Some(order_number) = &input.order_number {
            validate::max_chars(
                &mut errors,
                "order_number",
                order_number,
                validate::ORDER_NUMBER_MAX,
            );
        }

        match &input.intake {
            ChannelIntake::Form {
                customer_email,
                subject,
                body,
            } => {
                validate::require(&mut errors, "customer_email", customer_email);
                if !customer_email.trim().is_empty() {
                    validate::email_shape(&mut errors, "customer_email", customer_email);
                    validate::max_chars(
                        &mut errors,
                        "customer_email",
                        customer_email,
                        validate::CUSTOMER_EMAIL_MAX,
                    );
                }
                validate::require(&mut errors, "subject", subject);
                validate::max_chars(&mut errors, "subject", subject, validate::SUBJECT_MAX);
                validate::require(&mut errors, "body", body);
            },
            ChannelIntake::Phone {
                customer_email,
                subject,
                ..
            } => {
                if let Some(email) = customer_email {
                    validate::email_shape(&mut errors, "customer_email", email);
                    validate::max_chars(
                        &mut errors,
                        "customer_email",
                        email,
                        validate::CUSTOMER_EMAIL_MAX,
                    );
                }
                if let Some(subject) = subject {
                    validate::max_chars(&mut errors, "subject", subject, validate::SUBJECT_MAX);
                }
            },
        }

        match self.categories.category_state(&input.category_id)? {
            CategoryState::Active => {},
            CategoryState::Inactive => errors.add("category_id", "is not active"),
            CategoryState::NotFound => errors.add("category_id", "is unknown"),
        }

        if let Some(entry) = &input.staff_entry {
            if let Some(staff_id) = &entry.assigned_staff_id {
                if !self.staff.staff_exists(staff_id)? {
                    errors.add("staff_id", "is unknown");
                }
            }
        }

        errors.into_result()
    }

    /// Emit the post-commit "ticket received" intent for form tickets
    ///
    /// Phone-originated tickets never produce one, message or not.
    fn emit_received(&self, ticket: &Ticket) {
        if ticket.channel != Channel::Form {
            return;
        }
        let (Some(to), Some(initial)) = (&ticket.customer_email, ticket.messages.first()) else {
            return;
        };
        self.notifier.deliver(NotificationIntent {
            kind: NotificationKind::Received,
            to: to.clone(),
            ticket_number: ticket.number.clone(),
            subject: initial.subject.clone(),
            body: initial.body.clone(),
        });
    }
}

/// Treat whitespace-only optional phone intake fields as absent
fn normalize_intake(mut input: CreateTicket) -> CreateTicket {
    input.order_number = validate::normalize(input.order_number);
    input.intake = match input.intake {
        ChannelIntake::Phone {
            customer_email,
            subject,
            body,
        } => ChannelIntake::Phone {
            customer_email: validate::normalize(customer_email),
            subject: validate::normalize(subject),
            body: validate::normalize(body),
        },
        form => form,
    };
    input
}

/// Build the ticket (and embedded initial message) for one insert attempt
fn assemble_ticket(input: &CreateTicket, number: TicketNumber) -> Result<Ticket> {
    let id = TicketId::new();
    let mut builder = TicketBuilder::new()
        .id(id)
        .number(number)
        .channel(input.intake.channel())
        .category_id(input.category_id)
        .customer_name(input.customer_name.clone());

    if let Some(order_number) = &input.order_number {
        builder = builder.order_number(order_number.clone());
    }

    let initial = match &input.intake {
        ChannelIntake::Form {
            customer_email,
            subject,
            body,
        } => {
            builder = builder.customer_email(customer_email.clone());
            Some(Message::new(id, MessageKind::InitialInquiry, subject.clone(), body.clone()))
        },
        ChannelIntake::Phone {
            customer_email,
            subject,
            body,
        } => {
            if let Some(email) = customer_email {
                builder = builder.customer_email(email.clone());
            }
            // A call note needs both halves; a lone subject or body is dropped
            match (subject, body) {
                (Some(subject), Some(body)) => Some(Message::new(
                    id,
                    MessageKind::InitialInquiry,
                    subject.clone(),
                    body.clone(),
                )),
                _ => None,
            }
        },
    };

    if let Some(message) = initial {
        builder = builder.messages(vec![message]);
    }

    if let Some(entry) = &input.staff_entry {
        builder = builder.status(entry.status).priority(entry.priority);
        if let Some(staff_id) = entry.assigned_staff_id {
            builder = builder.assigned_staff_id(staff_id);
        }
        if let Some(notes) = &entry.internal_notes {
            builder = builder.internal_notes(notes.clone());
        }
    }

    builder.build()
}

/// The registered-email precondition shared by reply and customer append
fn require_customer_email(ticket: &Ticket) -> Result<String> {
    ticket
        .customer_email
        .clone()
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| {
            InquiryDeskError::field("customer_email", "ticket has no customer email on file")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MessageType;
    use crate::error::InquiryDeskError;
    use crate::test_utils::TestDesk;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_form_create_appends_initial_message_and_notifies() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();

        assert_eq!(ticket.channel, Channel::Form);
        assert_eq!(ticket.customer_email.as_deref(), Some("a@b.com"));
        assert_eq!(ticket.messages.len(), 1);
        let initial = &ticket.messages[0];
        assert_eq!(initial.message_type, MessageType::InitialInquiry);
        assert_eq!(initial.subject, "S");
        assert_eq!(initial.body, "B");
        assert!(initial.author_staff_id.is_none());

        let intents = desk.sink.delivered();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].kind, NotificationKind::Received);
        assert_eq!(intents[0].to, "a@b.com");
        assert_eq!(intents[0].ticket_number, ticket.number);
        assert_eq!(intents[0].subject, "S");
        assert_eq!(intents[0].body, "B");
    }

    #[test]
    fn test_form_create_defaults_status_and_priority() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();
        assert_eq!(ticket.status, Status::Pending);
        assert_eq!(ticket.priority, Priority::Medium);
        assert!(ticket.assigned_staff_id.is_none());
        assert!(ticket.internal_notes.is_none());
    }

    #[test]
    fn test_form_create_requires_email_subject_body() {
        let desk = TestDesk::new();
        let err = desk
            .lifecycle
            .create(desk.form_input("", "", ""))
            .unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("customer_email"));
        assert!(errors.contains("subject"));
        assert!(errors.contains("body"));
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_form_create_rejects_malformed_email() {
        let desk = TestDesk::new();
        let err = desk
            .lifecycle
            .create(desk.form_input("not-an-email", "S", "B"))
            .unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("customer_email"));
    }

    #[test]
    fn test_phone_create_with_nothing_optional() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.phone_input(None, None, None))
            .unwrap();

        assert_eq!(ticket.channel, Channel::Phone);
        assert!(ticket.customer_email.is_none());
        assert!(ticket.messages.is_empty());
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_phone_create_with_call_note_but_no_email() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.phone_input(None, Some("S"), Some("B")))
            .unwrap();

        assert_eq!(ticket.messages.len(), 1);
        assert_eq!(ticket.messages[0].message_type, MessageType::InitialInquiry);
        // No address to send to, and phone tickets never notify anyway
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_phone_create_never_emits_received_even_with_email() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.phone_input(Some("a@b.com"), Some("S"), Some("B")))
            .unwrap();
        assert_eq!(ticket.messages.len(), 1);
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_phone_create_drops_a_lone_subject() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.phone_input(None, Some("S"), None))
            .unwrap();
        assert!(ticket.messages.is_empty());
    }

    #[test]
    fn test_unknown_and_inactive_categories_are_field_errors() {
        let desk = TestDesk::new();

        let mut input = desk.form_input("a@b.com", "S", "B");
        input.category_id = CategoryId::new();
        let err = desk.lifecycle.create(input).unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.messages("category_id").unwrap(), &["is unknown".to_string()]);

        let mut input = desk.form_input("a@b.com", "S", "B");
        input.category_id = desk.inactive_category;
        let err = desk.lifecycle.create(input).unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.messages("category_id").unwrap(),
            &["is not active".to_string()]
        );
    }

    #[test]
    fn test_staff_entry_sets_privileged_fields() {
        let desk = TestDesk::new();
        let mut input = desk.phone_input(None, None, None);
        input.staff_entry = Some(StaffEntry {
            status: Status::InProgress,
            priority: Priority::Urgent,
            assigned_staff_id: Some(desk.staff),
            internal_notes: Some("called twice".to_string()),
        });

        let ticket = desk.lifecycle.create(input).unwrap();
        assert_eq!(ticket.status, Status::InProgress);
        assert_eq!(ticket.priority, Priority::Urgent);
        assert_eq!(ticket.assigned_staff_id, Some(desk.staff));
        assert_eq!(ticket.internal_notes.as_deref(), Some("called twice"));
    }

    #[test]
    fn test_staff_entry_with_unknown_assignee_is_rejected() {
        let desk = TestDesk::new();
        let mut input = desk.phone_input(None, None, None);
        input.staff_entry = Some(StaffEntry {
            status: Status::Pending,
            priority: Priority::Medium,
            assigned_staff_id: Some(StaffId::new()),
            internal_notes: None,
        });

        let err = desk.lifecycle.create(input).unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("staff_id"));
    }

    #[test]
    fn test_same_day_numbers_are_sequential() {
        let desk = TestDesk::new();
        let first = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap();
        let second = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap();
        assert_eq!(first.number.as_str(), "INQ-20250115-0001");
        assert_eq!(second.number.as_str(), "INQ-20250115-0002");
    }

    #[test]
    fn test_different_days_reset_without_colliding() {
        let desk = TestDesk::new();
        let first = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap();
        let second = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(16))
            .unwrap();
        assert_eq!(first.number.suffix(), 1);
        assert_eq!(second.number.suffix(), 1);
        assert_ne!(first.number, second.number);
    }

    #[test]
    fn test_create_retries_through_injected_conflicts() {
        let desk = TestDesk::new();
        desk.store.inject_duplicate_conflicts(3);

        let ticket = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap();
        assert_eq!(ticket.number.as_str(), "INQ-20250115-0001");
        // Side effects fired exactly once despite the internal retries
        assert_eq!(desk.sink.count(), 1);
    }

    #[test]
    fn test_create_gives_up_on_the_fifth_consecutive_conflict() {
        let desk = TestDesk::new();
        desk.store.inject_duplicate_conflicts(5);

        let err = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap_err();
        assert!(matches!(
            err,
            InquiryDeskError::AllocationFailed { attempts: 5, .. }
        ));
        assert_eq!(desk.sink.count(), 0);
        assert!(desk.lifecycle.list().unwrap().is_empty());
    }

    #[test]
    fn test_prefix_lock_timeout_is_a_fatal_allocation_failure() {
        let desk = TestDesk::new();
        desk.store.inject_lock_timeouts(1);

        let err = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap_err();
        assert!(matches!(
            err,
            InquiryDeskError::AllocationFailed { attempts: 1, .. }
        ));
        assert!(desk.lifecycle.list().unwrap().is_empty());
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_non_uniqueness_storage_errors_abort_immediately() {
        let desk = TestDesk::new();
        desk.store.inject_io_errors(1);

        let err = desk
            .lifecycle
            .create_on(desk.form_input("a@b.com", "S", "B"), day(15))
            .unwrap_err();
        assert!(matches!(err, InquiryDeskError::Io(_)));
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();

        let updated = desk
            .lifecycle
            .update_fields(
                &ticket.id,
                TicketUpdate {
                    status: Some(Status::InProgress),
                    ..TicketUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.priority, ticket.priority);
        assert_eq!(updated.assigned_staff_id, ticket.assigned_staff_id);

        let reloaded = desk.lifecycle.get(&ticket.id).unwrap();
        assert_eq!(reloaded.status, Status::InProgress);
        assert_eq!(reloaded.priority, Priority::Medium);
    }

    #[test]
    fn test_update_distinguishes_unassignment_from_absence() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();

        let assigned = desk
            .lifecycle
            .update_fields(
                &ticket.id,
                TicketUpdate {
                    assigned_staff_id: Some(Some(desk.staff)),
                    ..TicketUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(assigned.assigned_staff_id, Some(desk.staff));

        // Absent field leaves the assignment alone
        let untouched = desk
            .lifecycle
            .update_fields(
                &ticket.id,
                TicketUpdate {
                    priority: Some(Priority::High),
                    ..TicketUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(untouched.assigned_staff_id, Some(desk.staff));

        // Explicit null unassigns
        let unassigned = desk
            .lifecycle
            .update_fields(
                &ticket.id,
                TicketUpdate {
                    assigned_staff_id: Some(None),
                    ..TicketUpdate::default()
                },
            )
            .unwrap();
        assert!(unassigned.assigned_staff_id.is_none());
    }

    #[test]
    fn test_any_status_may_move_to_any_other() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();

        for status in [Status::Closed, Status::Pending, Status::Resolved, Status::InProgress] {
            let updated = desk
                .lifecycle
                .update_fields(
                    &ticket.id,
                    TicketUpdate {
                        status: Some(status),
                        ..TicketUpdate::default()
                    },
                )
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[test]
    fn test_update_unknown_ticket_is_not_found() {
        let desk = TestDesk::new();
        let err = desk
            .lifecycle
            .update_fields(&TicketId::new(), TicketUpdate::default())
            .unwrap_err();
        assert!(matches!(err, InquiryDeskError::TicketNotFound { .. }));
    }

    #[test]
    fn test_reply_appends_and_notifies() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();

        let message = desk
            .lifecycle
            .reply(&ticket.id, "Re: S", "Answer", desk.staff)
            .unwrap();
        assert_eq!(message.message_type, MessageType::StaffReply);
        assert_eq!(message.author_staff_id, Some(desk.staff));

        let thread = desk.lifecycle.thread(&ticket.id).unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].id, message.id, "newest message first");

        let intents = desk.sink.delivered();
        assert_eq!(intents.len(), 2, "received + reply_sent");
        assert_eq!(intents[1].kind, NotificationKind::ReplySent);
        assert_eq!(intents[1].to, "a@b.com");
        assert_eq!(intents[1].subject, "Re: S");
        assert_eq!(intents[1].body, "Answer");
    }

    #[test]
    fn test_reply_without_email_on_file_names_the_field() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.phone_input(None, Some("S"), Some("B")))
            .unwrap();

        let err = desk
            .lifecycle
            .reply(&ticket.id, "Re", "Answer", desk.staff)
            .unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("customer_email"));

        // Nothing appended, nothing emitted
        assert_eq!(desk.lifecycle.thread(&ticket.id).unwrap().len(), 1);
        assert_eq!(desk.sink.count(), 0);
    }

    #[test]
    fn test_reply_requires_known_staff_author() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();

        let err = desk
            .lifecycle
            .reply(&ticket.id, "Re", "Answer", StaffId::new())
            .unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("staff_id"));
        assert_eq!(desk.lifecycle.thread(&ticket.id).unwrap().len(), 1);
    }

    #[test]
    fn test_customer_message_appends_without_notifying() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.form_input("a@b.com", "S", "B"))
            .unwrap();
        let emitted_before = desk.sink.count();

        let message = desk
            .lifecycle
            .append_customer_message(&ticket.id, "More info", "Details")
            .unwrap();
        assert_eq!(message.message_type, MessageType::CustomerReply);
        assert!(message.author_staff_id.is_none());
        assert_eq!(desk.sink.count(), emitted_before);
    }

    #[test]
    fn test_customer_message_requires_email_on_file() {
        let desk = TestDesk::new();
        let ticket = desk
            .lifecycle
            .create(desk.phone_input(None, None, None))
            .unwrap();

        let err = desk
            .lifecycle
            .append_customer_message(&ticket.id, "S", "B")
            .unwrap_err();
        let InquiryDeskError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("customer_email"));
        assert!(desk.lifecycle.thread(&ticket.id).unwrap().is_empty());
    }

    #[test]
    fn test_list_is_newest_first() {
        let desk = TestDesk::new();
        let first = desk
            .lifecycle
            .create(desk.phone_input(None, None, None))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = desk
            .lifecycle
            .create(desk.phone_input(None, None, None))
            .unwrap();

        let listed = desk.lifecycle.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
