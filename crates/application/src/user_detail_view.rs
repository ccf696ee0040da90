//! Headless view-model for the admin console's user detail page.
//!
//! Holds the locally editable copy of one user record, seeds it from the query
//! port, and pushes edits through the update port. Every read is tagged with the
//! generation and sequence it was issued under so responses that arrive after an
//! identifier change, unmount, or a newer read are dropped instead of clobbering
//! the form.

use std::sync::{Arc, Mutex, MutexGuard};

use opsdesk_core::{AppError, AppResult};
use opsdesk_domain::{FieldView, FormField, UserDetailForm, UserId, UserRecord};
use serde::Serialize;
use tracing::debug;

use crate::{AccessTokenStore, Notifier, UserQueryService, UserUpdateService};

mod activation;
mod submission;


/// Page heading.
pub const USER_DETAIL_TITLE: &str = "Users Details";

/// Label of the submit button.
pub const USER_DETAIL_SUBMIT_LABEL: &str = "Update";

/// Toast shown after an acknowledged update.
pub const UPDATE_SUCCESS_MESSAGE: &str = "User updated successfully";

/// Toast shown after any failed update.
pub const UPDATE_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

/// Lifecycle phase of a mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    /// No record has been seeded yet.
    Uninitialized,
    /// Fields mirror the last fetched record.
    Loaded,
    /// At least one field was edited since the last seed.
    Editing,
    /// An update request is in flight.
    Submitting,
    /// Fields were re-seeded by the read that follows an acknowledged update.
    Reconciled,
}

impl ViewPhase {
    /// Returns stable display value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loaded => "loaded",
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Reconciled => "reconciled",
        }
    }
}

/// What happened to a completed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The record was seeded into the form.
    Applied,
    /// The view moved on while the read was in flight; the response was dropped.
    Discarded,
}

/// Result of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The update returned `200 OK` and a success toast was shown.
    Updated {
        /// Whether the follow-up read re-seeded the form.
        refreshed: bool,
    },
    /// The update returned a 2xx status other than `200`; nothing was shown.
    Unacknowledged {
        /// Raw status code.
        status: u16,
    },
    /// The update failed and an error toast was shown. Fields keep their edits.
    Failed,
}

/// Rendered state of the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetailSnapshot {
    /// User the view is bound to.
    pub user_id: Option<UserId>,
    /// Current lifecycle phase.
    pub phase: ViewPhase,
    /// Fields in display order.
    pub fields: Vec<FieldView>,
}

impl UserDetailSnapshot {
    /// Returns the rendered state of one field.
    #[must_use]
    pub fn field(&self, field: FormField) -> Option<&FieldView> {
        self.fields.iter().find(|view| view.field() == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadTrigger {
    Activation,
    Reconcile,
}

#[derive(Debug, Clone, Copy)]
struct ReadTicket {
    user_id: UserId,
    generation: u64,
    sequence: u64,
    trigger: ReadTrigger,
}

#[derive(Debug)]
struct ViewState {
    user_id: Option<UserId>,
    generation: u64,
    issued_reads: u64,
    applied_read: u64,
    form: UserDetailForm,
    record: Option<UserRecord>,
    phase: ViewPhase,
}

impl ViewState {
    fn new() -> Self {
        Self {
            user_id: None,
            generation: 0,
            issued_reads: 0,
            applied_read: 0,
            form: UserDetailForm::new(),
            record: None,
            phase: ViewPhase::Uninitialized,
        }
    }

    fn reset_form(&mut self) {
        self.form = UserDetailForm::new();
        self.record = None;
        self.phase = ViewPhase::Uninitialized;
    }

    fn issue_read(&mut self, user_id: UserId, trigger: ReadTrigger) -> ReadTicket {
        self.issued_reads = self.issued_reads.saturating_add(1);
        ReadTicket {
            user_id,
            generation: self.generation,
            sequence: self.issued_reads,
            trigger,
        }
    }

    fn accepts(&self, ticket: &ReadTicket) -> bool {
        ticket.generation == self.generation
            && self.user_id == Some(ticket.user_id)
            && ticket.sequence > self.applied_read
    }
}

/// View-model for viewing and editing one user.
pub struct UserDetailView {
    query_service: Arc<dyn UserQueryService>,
    update_service: Arc<dyn UserUpdateService>,
    token_store: Arc<dyn AccessTokenStore>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ViewState>,
}

impl UserDetailView {
    /// Creates an unmounted view.
    #[must_use]
    pub fn new(
        query_service: Arc<dyn UserQueryService>,
        update_service: Arc<dyn UserUpdateService>,
        token_store: Arc<dyn AccessTokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            query_service,
            update_service,
            token_store,
            notifier,
            state: Mutex::new(ViewState::new()),
        }
    }

    /// Replaces one editable field with the user's input.
    pub fn edit(&self, field: FormField, value: impl Into<String>) -> AppResult<()> {
        let mut state = self.lock_state()?;
        state.form.set(field, value)?;
        state.phase = ViewPhase::Editing;

        Ok(())
    }

    /// Renders the current form.
    pub fn snapshot(&self) -> AppResult<UserDetailSnapshot> {
        let state = self.lock_state()?;

        Ok(UserDetailSnapshot {
            user_id: state.user_id,
            phase: state.phase,
            fields: state.form.field_views(),
        })
    }

    /// Returns the record that last seeded the form.
    pub fn record(&self) -> AppResult<Option<UserRecord>> {
        Ok(self.lock_state()?.record.clone())
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> AppResult<ViewPhase> {
        Ok(self.lock_state()?.phase)
    }

    /// Unmounts the view. Responses still in flight are dropped when they land.
    pub fn deactivate(&self) -> AppResult<()> {
        let mut state = self.lock_state()?;
        state.generation = state.generation.saturating_add(1);
        state.user_id = None;
        state.reset_form();
        debug!(generation = state.generation, "user detail view deactivated");

        Ok(())
    }

    async fn run_read(&self, ticket: ReadTicket) -> AppResult<ReadOutcome> {
        let response = match ticket.trigger {
            ReadTrigger::Activation => self.query_service.fetch_user(ticket.user_id).await,
            ReadTrigger::Reconcile => self.query_service.refetch_user(ticket.user_id).await,
        }?;

        let mut state = self.lock_state()?;
        if !state.accepts(&ticket) {
            debug!(
                user_id = %ticket.user_id,
                generation = ticket.generation,
                sequence = ticket.sequence,
                current_generation = state.generation,
                applied_sequence = state.applied_read,
                "discarding stale user read"
            );
            return Ok(ReadOutcome::Discarded);
        }

        state.form.seed_from(&response);
        state.record = Some(response);
        state.applied_read = ticket.sequence;
        state.phase = match ticket.trigger {
            ReadTrigger::Activation => ViewPhase::Loaded,
            ReadTrigger::Reconcile => ViewPhase::Reconciled,
        };

        Ok(ReadOutcome::Applied)
    }

    fn lock_state(&self) -> AppResult<MutexGuard<'_, ViewState>> {
        self.state
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock view state: {error}")))
    }
}
