//! Observable state cells.
//!
//! A [`StateCell`] owns a value and publishes every change to its readers. Reads are
//! level-triggered: a [`StateReader`] created at any point sees the latest value, and
//! `changed()` resolves once per observed transition rather than once per write.
//!
//! Writers mutate the value in a single step (`set`, `update`, `update_if`), so readers
//! never see a partially applied change.

use tokio::sync::watch;

use crate::Error;

/// Marker for values that can live in a [`StateCell`].
pub trait State: Clone + Send + Sync + 'static {
    /// Short name used in log lines.
    const NAME: &'static str = "state";
}

/// Owner side of a piece of observable state.
#[derive(Debug)]
pub struct StateCell<T: State> {
    send: watch::Sender<T>,
}

impl<T: State + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> StateCell<T>
where
    T: State,
{
    pub fn new(initial: T) -> Self {
        let (send, _) = watch::channel(initial);
        Self { send }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.send.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.send.borrow())
    }

    /// Replace the value and notify readers.
    pub fn set(&self, value: T) {
        self.send.send_replace(value);
        log::trace!("StateCell<{}>: replaced", T::NAME);
    }

    /// Mutate the value in place and notify readers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.send.send_modify(f);
        log::trace!("StateCell<{}>: updated", T::NAME);
    }

    /// Mutate the value in place; readers are only notified when `f` returns `true`.
    ///
    /// The closure runs under the cell's write lock, which makes this the
    /// compare-and-set primitive for state machines built on top of a cell.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let modified = self.send.send_if_modified(f);
        if modified {
            log::trace!("StateCell<{}>: updated", T::NAME);
        }
        modified
    }

    pub fn subscribe(&self) -> StateReader<T> {
        StateReader {
            recv: self.send.subscribe(),
        }
    }
}

/// Read side of a [`StateCell`].
#[derive(Debug, Clone)]
pub struct StateReader<T: State> {
    recv: watch::Receiver<T>,
}

impl<T> StateReader<T>
where
    T: State,
{
    /// Clone of the latest value, marking it as seen.
    pub fn read(&mut self) -> T {
        self.recv.borrow_and_update().clone()
    }

    /// Whether a value newer than the last `read`/`changed` is available.
    pub fn has_changed(&self) -> bool {
        self.recv.has_changed().unwrap_or(false)
    }

    /// Wait for the next transition and return the value it produced.
    ///
    /// Several writes between two calls collapse into one wake-up carrying the
    /// latest value.
    pub async fn changed(&mut self) -> Result<T, Error> {
        self.recv
            .changed()
            .await
            .map_err(|_closed| Error::closed(T::NAME))?;
        Ok(self.recv.borrow_and_update().clone())
    }
}
