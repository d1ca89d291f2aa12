//! State owned by the directory controller.
//!
//! `PageState` mirrors exactly one remote page. `PendingAction` is the per-dialog state
//! machine for edit and delete:
//!
//! ```text
//! Idle -> Open -> Submitting -> Idle   (success)
//!                            -> Open   (failure)
//!         Open -> Idle                 (cancel)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use roster_states::State;

use super::types::{ListUsersResponse, UserId, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub total: u32,
    /// Server order of the current page.
    pub records: Vec<UserRecord>,
    /// True while a page fetch is outstanding.
    pub loading: bool,
    pub last_fetch: Option<DateTime<Utc>>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            per_page: 0,
            total: 0,
            records: Vec::new(),
            loading: false,
            last_fetch: None,
        }
    }
}

impl State for PageState {
    const NAME: &'static str = "page";
}

impl PageState {
    /// Replace the whole page with a server response. Never merges.
    ///
    /// `page` is the page that was requested; the echoed `response.page` is not trusted.
    pub fn apply_page(&mut self, page: u32, response: ListUsersResponse, now: DateTime<Utc>) {
        if response.page != page {
            log::debug!(
                "PageState: server answered page {} for a request of page {page}",
                response.page
            );
        }
        self.current_page = page;
        self.total_pages = response.total_pages;
        self.per_page = response.per_page;
        self.total = response.total;
        self.records = response.data;
        self.last_fetch = Some(now);
    }

    /// Replace the record with the same id in place. Returns false when it is not on
    /// this page.
    pub fn replace_record(&mut self, updated: &UserRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == updated.id) {
            Some(slot) => {
                *slot = updated.clone();
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`. Returns false when it was already absent.
    pub fn remove_record(&mut self, id: UserId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn record(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based page numbers for a pagination control.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + use<> {
        1..=self.total_pages.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Edit,
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        })
    }
}

/// One dialog's worth of operator intent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    Idle,
    /// Dialog is showing a copy of the target record.
    Open(UserRecord),
    /// Confirmation sent; waiting for the remote call to resolve.
    Submitting(UserRecord),
}

impl State for PendingAction {
    const NAME: &'static str = "pending_action";
}

impl PendingAction {
    pub fn target(&self) -> Option<&UserRecord> {
        match self {
            Self::Idle => None,
            Self::Open(record) | Self::Submitting(record) => Some(record),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The re-submit control should be disabled while this is true.
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting(_))
    }
}
