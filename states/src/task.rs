//! Task generations for latest-only async work.
//!
//! - `TaskId`: names a piece of async work by kind and generation
//! - `TaskHandle`: pairs a `TaskId` with a `CancellationToken`
//! - `LatestTask`: hands out increasing generations for one kind of work and cancels
//!   the previous handle whenever a new one begins
//!
//! # Usage
//!
//! ```ignore
//! let loads = LatestTask::new("load_page");
//! let handle = loads.begin();
//!
//! tokio::select! {
//!     _ = handle.cancellation_token().cancelled() => { /* superseded */ }
//!     result = fetch() => {
//!         if loads.is_latest(handle.id()) {
//!             // apply result
//!         }
//!     }
//! }
//! loads.finish(handle.id());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Identifier for one run of a kind of async work.
///
/// Higher generations were started later, which is how stale results are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    kind: &'static str,
    generation: u64,
}

impl TaskId {
    pub fn new(kind: &'static str, generation: u64) -> Self {
        Self { kind, generation }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to a running task with cooperative cancellation.
///
/// Cancelling does not abort anything by itself; the task must select on
/// `cancellation_token().cancelled()` or poll `is_cancelled()`.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Tracks the newest task of one kind.
#[derive(Debug)]
pub struct LatestTask {
    kind: &'static str,
    generation: AtomicU64,
    current: Mutex<Option<TaskHandle>>,
}

impl LatestTask {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Start a new generation, cancelling the one in flight (if any).
    pub fn begin(&self) -> TaskHandle {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = TaskHandle::new(
            TaskId::new(self.kind, generation),
            CancellationToken::new(),
        );

        if let Some(previous) = self.current.lock().replace(handle.clone()) {
            log::debug!(
                "LatestTask<{}>: generation {} supersedes {}",
                self.kind,
                generation,
                previous.id().generation()
            );
            previous.cancel();
        }

        handle
    }

    pub fn is_latest(&self, id: TaskId) -> bool {
        self.generation.load(Ordering::SeqCst) == id.generation()
    }

    /// Forget `id` if it is still the current task.
    pub fn finish(&self, id: TaskId) {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|handle| handle.id() == id) {
            *current = None;
        }
    }
}
