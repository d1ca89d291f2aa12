//! Directory controller.
//!
//! Owns one page of remote user records plus the edit and delete workflows that act on
//! it. Every remote call goes through [`DirectoryApi`]; results are folded into state
//! here and nowhere else.
//!
//! ## Page loads
//!
//! Overlapping loads follow [`PageLoadPolicy`]:
//! - `LatestRequestWins`: each load supersedes the previous one. The superseded call
//!   returns `Ok(())` without touching state.
//! - `LastResponseWins`: loads run to completion and whichever resolves last is shown.
//!
//! ## Pending actions
//!
//! Edit and delete each have one [`PendingAction`] slot. Confirming moves the slot from
//! `Open` to `Submitting` with a compare-and-set, so a second confirmation while the
//! first is outstanding is refused before any request goes out.
//!
//! ## Cancellation
//!
//! Dropping a `load_page` or `confirm_*` future part way through is safe: guards release
//! the load bookkeeping and put the slot back to what it was before the submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use flume::Receiver;
use log::{debug, error, info};
use roster_states::{LatestTask, Notifier, StateCell, StateReader, TaskId};

use crate::config::PageLoadPolicy;
use crate::error::{DirectoryError, RemoteAction, RemoteError};
use crate::session::SessionStore;

use super::api::{DirectoryApi, DirectoryApiError};
use super::notification::Notification;
use super::state::{ActionKind, PageState, PendingAction};
use super::types::{ListUsersResponse, UserId, UserRecord};

#[derive(Debug)]
struct ControllerInner {
    session: SessionStore,
    api: DirectoryApi,
    policy: PageLoadPolicy,
    page: StateCell<PageState>,
    editing: StateCell<PendingAction>,
    deleting: StateCell<PendingAction>,
    notifier: Notifier<Notification>,
    loads: LatestTask,
    /// Outstanding loads under `LastResponseWins`.
    outstanding: AtomicUsize,
}

/// How a load is accounted for, per [`PageLoadPolicy`].
#[derive(Debug, Clone, Copy)]
enum LoadTicket {
    Latest(TaskId),
    Counted,
}

/// One page load's claim on `loading`. Released exactly once, on completion or on drop.
struct LoadGuard<'a> {
    inner: &'a ControllerInner,
    ticket: LoadTicket,
    page: u32,
    done: bool,
}

impl<'a> LoadGuard<'a> {
    fn start(inner: &'a ControllerInner, ticket: LoadTicket, page: u32) -> Self {
        inner.page.update(|state| state.loading = true);
        Self {
            inner,
            ticket,
            page,
            done: false,
        }
    }

    /// Fold `response` (if any) into the page and release the load. Returns `false` when
    /// a newer load owns the page.
    fn finish(mut self, response: Option<ListUsersResponse>) -> bool {
        self.done = true;
        self.release(response)
    }

    fn release(&self, response: Option<ListUsersResponse>) -> bool {
        let inner = self.inner;
        let page = self.page;
        match self.ticket {
            LoadTicket::Latest(id) => {
                inner.loads.finish(id);
                inner.page.update_if(|state| {
                    if !inner.loads.is_latest(id) {
                        return false;
                    }
                    if let Some(response) = response {
                        state.apply_page(page, response, Utc::now());
                    }
                    state.loading = false;
                    true
                })
            }
            LoadTicket::Counted => {
                inner.outstanding.fetch_sub(1, Ordering::SeqCst);
                inner.page.update(|state| {
                    if let Some(response) = response {
                        state.apply_page(page, response, Utc::now());
                    }
                    state.loading = inner.outstanding.load(Ordering::SeqCst) > 0;
                });
                true
            }
        }
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            debug!("DirectoryController: load of page {} dropped", self.page);
            self.release(None);
        }
    }
}

/// A slot claimed for submission. Unless settled, it goes back to `restore`.
struct SlotGuard<'a> {
    slot: &'a StateCell<PendingAction>,
    kind: ActionKind,
    restore: Option<PendingAction>,
}

impl<'a> SlotGuard<'a> {
    fn new(slot: &'a StateCell<PendingAction>, kind: ActionKind, restore: PendingAction) -> Self {
        Self {
            slot,
            kind,
            restore: Some(restore),
        }
    }

    fn settle(mut self, next: PendingAction) {
        self.restore = None;
        self.slot.set(next);
    }

    fn rollback(mut self) {
        if let Some(previous) = self.restore.take() {
            self.slot.set(previous);
        }
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            debug!("DirectoryController: {} submission dropped", self.kind);
            self.slot.set(previous);
        }
    }
}

/// Cheaply cloneable handle; clones share state.
#[derive(Debug, Clone)]
pub struct DirectoryController {
    inner: Arc<ControllerInner>,
}

impl DirectoryController {
    pub fn new(session: SessionStore, api: DirectoryApi, policy: PageLoadPolicy) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                session,
                api,
                policy,
                page: StateCell::default(),
                editing: StateCell::default(),
                deleting: StateCell::default(),
                notifier: Notifier::new(),
                loads: LatestTask::new("load_page"),
                outstanding: AtomicUsize::new(0),
            }),
        }
    }

    pub fn policy(&self) -> PageLoadPolicy {
        self.inner.policy
    }

    fn require_session(&self) -> Result<String, DirectoryError> {
        self.inner
            .session
            .bearer()
            .ok_or(DirectoryError::Unauthorized)
    }

    /// Fetch page `page` (1-based) and replace the current page with it.
    pub async fn load_page(&self, page: u32) -> Result<(), DirectoryError> {
        let bearer = self.require_session()?;
        if page == 0 {
            return Err(DirectoryError::InvalidPage(page));
        }

        info!("DirectoryController: loading page {page}");

        let inner = &*self.inner;
        let (ticket, cancel) = match inner.policy {
            PageLoadPolicy::LatestRequestWins => {
                let handle = inner.loads.begin();
                (
                    LoadTicket::Latest(handle.id()),
                    Some(handle.cancellation_token()),
                )
            }
            PageLoadPolicy::LastResponseWins => {
                inner.outstanding.fetch_add(1, Ordering::SeqCst);
                (LoadTicket::Counted, None)
            }
        };
        let guard = LoadGuard::start(inner, ticket, page);

        let request = inner.api.list_users(Some(&bearer), page);
        let result = match cancel {
            Some(cancel) => tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                result = request => Some(result),
            },
            None => Some(request.await),
        };

        let Some(result) = result else {
            guard.finish(None);
            debug!("DirectoryController: load of page {page} superseded");
            return Ok(());
        };

        match result {
            Ok(response) => {
                if guard.finish(Some(response)) {
                    info!("DirectoryController: page {page} loaded");
                } else {
                    debug!("DirectoryController: discarding stale response for page {page}");
                }
                Ok(())
            }
            Err(e) => {
                if !guard.finish(None) {
                    debug!("DirectoryController: ignoring failure of superseded load: {e}");
                    return Ok(());
                }
                Err(self.remote_failure(RemoteAction::Load, e))
            }
        }
    }

    /// Reload the page currently shown.
    pub async fn refresh(&self) -> Result<(), DirectoryError> {
        let page = self.inner.page.with(|state| state.current_page);
        self.load_page(page).await
    }

    fn slot(&self, kind: ActionKind) -> &StateCell<PendingAction> {
        match kind {
            ActionKind::Edit => &self.inner.editing,
            ActionKind::Delete => &self.inner.deleting,
        }
    }

    fn open(&self, kind: ActionKind, record: &UserRecord) -> Result<(), DirectoryError> {
        self.require_session()?;

        let mut in_flight = false;
        self.slot(kind).update_if(|slot| {
            if slot.is_submitting() {
                in_flight = true;
                return false;
            }
            *slot = PendingAction::Open(record.clone());
            true
        });

        if in_flight {
            return Err(DirectoryError::ActionInFlight(kind));
        }
        debug!("DirectoryController: {kind} opened for user {}", record.id);
        Ok(())
    }

    fn cancel(&self, kind: ActionKind) -> bool {
        let mut idle = false;
        self.slot(kind).update_if(|slot| match slot {
            PendingAction::Submitting(_) => false,
            PendingAction::Idle => {
                idle = true;
                false
            }
            PendingAction::Open(_) => {
                *slot = PendingAction::Idle;
                idle = true;
                true
            }
        });
        idle
    }

    /// Open the edit dialog on a copy of `record`, replacing any other open target.
    pub fn begin_edit(&self, record: &UserRecord) -> Result<(), DirectoryError> {
        self.open(ActionKind::Edit, record)
    }

    /// Open the delete confirmation for `record`, replacing any other open target.
    pub fn begin_delete(&self, record: &UserRecord) -> Result<(), DirectoryError> {
        self.open(ActionKind::Delete, record)
    }

    /// Close the edit dialog. Returns `false` while a submission is in flight.
    pub fn cancel_edit(&self) -> bool {
        self.cancel(ActionKind::Edit)
    }

    /// Close the delete confirmation. Returns `false` while a submission is in flight.
    pub fn cancel_delete(&self) -> bool {
        self.cancel(ActionKind::Delete)
    }

    /// Submit the open edit with the operator's changes.
    ///
    /// On success the record is replaced in place; on failure the dialog stays open on
    /// the original record.
    pub async fn confirm_edit(&self, updated: UserRecord) -> Result<(), DirectoryError> {
        let bearer = self.require_session()?;
        let kind = ActionKind::Edit;

        let mut claimed = Err(DirectoryError::NoPendingAction(kind));
        self.inner.editing.update_if(|slot| {
            let decision = match &*slot {
                PendingAction::Idle => Err(DirectoryError::NoPendingAction(kind)),
                PendingAction::Submitting(_) => Err(DirectoryError::ActionInFlight(kind)),
                PendingAction::Open(open) if open.id != updated.id => {
                    Err(DirectoryError::ActionMismatch {
                        kind,
                        expected: open.id,
                        got: updated.id,
                    })
                }
                PendingAction::Open(open) => Ok(open.clone()),
            };
            let submitting = decision.is_ok();
            if submitting {
                *slot = PendingAction::Submitting(updated.clone());
            }
            claimed = decision;
            submitting
        });
        let original = claimed?;
        let guard = SlotGuard::new(&self.inner.editing, kind, PendingAction::Open(original));

        info!("DirectoryController: updating user {}", updated.id);

        match self.inner.api.update_user(Some(&bearer), &updated).await {
            Ok(()) => {
                let replaced = self
                    .inner
                    .page
                    .update_if(|state| state.replace_record(&updated));
                if !replaced {
                    debug!(
                        "DirectoryController: user {} no longer on the current page",
                        updated.id
                    );
                }
                guard.settle(PendingAction::Idle);
                self.inner.notifier.notify(Notification::success(
                    "User updated",
                    format!(
                        "{} {} has been updated.",
                        updated.first_name, updated.last_name
                    ),
                ));
                Ok(())
            }
            Err(e) => {
                guard.rollback();
                Err(self.remote_failure(RemoteAction::Update, e))
            }
        }
    }

    /// Delete user `id`.
    ///
    /// The target is the open delete confirmation, or else the record on the current
    /// page. With neither, there is nothing to delete and the call succeeds without a
    /// request, so repeating a delete is harmless.
    pub async fn confirm_delete(&self, id: UserId) -> Result<(), DirectoryError> {
        let bearer = self.require_session()?;
        let kind = ActionKind::Delete;
        let on_page = self.inner.page.with(|state| state.record(id).cloned());

        let mut claimed = Ok(None);
        self.inner.deleting.update_if(|slot| {
            let decision = match &*slot {
                PendingAction::Submitting(_) => Err(DirectoryError::ActionInFlight(kind)),
                PendingAction::Open(open) if open.id != id => Err(DirectoryError::ActionMismatch {
                    kind,
                    expected: open.id,
                    got: id,
                }),
                PendingAction::Open(open) => Ok(Some(open.clone())),
                PendingAction::Idle => Ok(on_page),
            };
            match decision {
                Ok(Some(target)) => {
                    claimed = Ok(Some(std::mem::replace(
                        slot,
                        PendingAction::Submitting(target),
                    )));
                    true
                }
                other => {
                    claimed = other.map(|_| None);
                    false
                }
            }
        });

        let Some(previous) = claimed? else {
            debug!("DirectoryController: user {id} already gone, nothing to delete");
            return Ok(());
        };
        let guard = SlotGuard::new(&self.inner.deleting, kind, previous);

        info!("DirectoryController: deleting user {id}");

        match self.inner.api.delete_user(Some(&bearer), id).await {
            Ok(()) => {
                self.inner.page.update_if(|state| state.remove_record(id));
                guard.settle(PendingAction::Idle);
                self.inner.notifier.notify(Notification::success(
                    "User deleted",
                    "User has been removed successfully.",
                ));
                Ok(())
            }
            Err(e) => {
                guard.rollback();
                Err(self.remote_failure(RemoteAction::Delete, e))
            }
        }
    }

    fn remote_failure(&self, action: RemoteAction, e: DirectoryApiError) -> DirectoryError {
        error!("DirectoryController: failed to {action}: {e}");
        self.inner
            .notifier
            .notify(Notification::error(action.failure_message()));
        RemoteError::new(action, e.message).into()
    }

    pub fn page(&self) -> PageState {
        self.inner.page.get()
    }

    pub fn subscribe_page(&self) -> StateReader<PageState> {
        self.inner.page.subscribe()
    }

    pub fn editing(&self) -> PendingAction {
        self.inner.editing.get()
    }

    pub fn deleting(&self) -> PendingAction {
        self.inner.deleting.get()
    }

    pub fn subscribe_editing(&self) -> StateReader<PendingAction> {
        self.inner.editing.subscribe()
    }

    pub fn subscribe_deleting(&self) -> StateReader<PendingAction> {
        self.inner.deleting.subscribe()
    }

    /// Each notification is delivered to exactly one receiver.
    pub fn notifications(&self) -> Receiver<Notification> {
        self.inner.notifier.receiver()
    }

    /// Take every notification emitted so far.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.inner.notifier.drain()
    }
}
